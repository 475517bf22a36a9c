//! Whole-image pixel filters.
//!
//! DESIGN
//! ======
//! Grayscale and invert are per-pixel and run in place on a copy of the
//! source. Sharpen is a 3×3 convolution: every output pixel is computed from
//! the untouched source buffer into a fresh buffer, so no output write can
//! feed a later neighbourhood read.
//!
//! Alpha is never computed. Every filter copies it through from the source
//! pixel at the same offset.
//!
//! EDGES
//! =====
//! Neighbour coordinates are clamped to `[0, W-1] x [0, H-1]` (replicate
//! edge). Nothing wraps and nothing is zero-padded.

#[cfg(test)]
#[path = "filter_test.rs"]
mod filter_test;

use std::fmt;
use std::str::FromStr;

use crate::error::CanvasError;
use crate::pixels::{CHANNELS, PixelBuffer};

/// A 3×3 convolution kernel, row-major, `kernel[dy][dx]` with the center at `[1][1]`.
pub type Kernel = [[i32; 3]; 3];

/// Sharpen: center 5, orthogonal neighbours −1, corners 0.
pub const SHARPEN: Kernel = [[0, -1, 0], [-1, 5, -1], [0, -1, 0]];

/// A named whole-image filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    /// Replace R, G, B with their unweighted average.
    Grayscale,
    /// Replace each of R, G, B with `255 - value`.
    Invert,
    /// Convolve with [`SHARPEN`] (the "enhance quality" pass).
    Sharpen,
}

impl Filter {
    /// Canonical filter name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Grayscale => "grayscale",
            Self::Invert => "invert",
            Self::Sharpen => "sharpen",
        }
    }

    /// Apply the filter, returning a new buffer of the same dimensions.
    #[must_use]
    pub fn apply(self, src: &PixelBuffer) -> PixelBuffer {
        match self {
            Self::Grayscale => {
                let mut out = src.clone();
                grayscale(&mut out);
                out
            }
            Self::Invert => {
                let mut out = src.clone();
                invert(&mut out);
                out
            }
            Self::Sharpen => convolve(src, &SHARPEN),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Filter {
    type Err = CanvasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "grayscale" => Ok(Self::Grayscale),
            "invert" => Ok(Self::Invert),
            "sharpen" | "enhance" => Ok(Self::Sharpen),
            other => Err(CanvasError::UnknownFilter(other.to_owned())),
        }
    }
}

/// In-place grayscale: R, G, B become their average, rounded to nearest.
pub fn grayscale(buf: &mut PixelBuffer) {
    for px in buf.data_mut().chunks_exact_mut(CHANNELS) {
        let sum = u16::from(px[0]) + u16::from(px[1]) + u16::from(px[2]);
        // A third never lands on .5, so +1 then floor is round-to-nearest.
        let avg = ((sum + 1) / 3) as u8;
        px[0] = avg;
        px[1] = avg;
        px[2] = avg;
    }
}

/// In-place invert of R, G, B.
pub fn invert(buf: &mut PixelBuffer) {
    for px in buf.data_mut().chunks_exact_mut(CHANNELS) {
        px[0] = 255 - px[0];
        px[1] = 255 - px[1];
        px[2] = 255 - px[2];
    }
}

/// Convolve the color channels of `src` with `kernel`.
///
/// Each output R/G/B is the kernel-weighted sum over the 3×3 neighbourhood,
/// clamped to `[0, 255]`. Alpha is copied from the source pixel. Neighbours
/// outside the image are clamped to the nearest edge pixel.
#[must_use]
pub fn convolve(src: &PixelBuffer, kernel: &Kernel) -> PixelBuffer {
    let width = src.width() as usize;
    let height = src.height() as usize;
    let input = src.data();
    let mut out = PixelBuffer::new(src.width(), src.height());
    let output = out.data_mut();

    for y in 0..height {
        for x in 0..width {
            let out_idx = (y * width + x) * CHANNELS;
            let mut acc = [0_i32; 3];
            for (ky, row) in kernel.iter().enumerate() {
                let sy = clamp_coord(y, ky, height);
                for (kx, &weight) in row.iter().enumerate() {
                    if weight == 0 {
                        continue;
                    }
                    let sx = clamp_coord(x, kx, width);
                    let in_idx = (sy * width + sx) * CHANNELS;
                    for (c, sum) in acc.iter_mut().enumerate() {
                        *sum += weight * i32::from(input[in_idx + c]);
                    }
                }
            }
            for (c, sum) in acc.iter().enumerate() {
                output[out_idx + c] = (*sum).clamp(0, 255) as u8;
            }
            output[out_idx + 3] = input[out_idx + 3];
        }
    }

    out
}

/// Source coordinate for kernel tap `k` (0..3) around `pos`, clamped to `[0, len-1]`.
fn clamp_coord(pos: usize, k: usize, len: usize) -> usize {
    (pos + k).saturating_sub(1).min(len.saturating_sub(1))
}
