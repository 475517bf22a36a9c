//! RGBA pixel buffer.
//!
//! A flat, row-major sequence of 8-bit RGBA components, four per pixel, the
//! same layout a 2D context hands out from `getImageData`. The length
//! invariant (`width * height * 4`) is checked at construction and cannot be
//! broken afterwards: the raw bytes are only exposed as a fixed-length slice.

#[cfg(test)]
#[path = "pixels_test.rs"]
mod pixels_test;

use crate::color::Rgba;
use crate::error::CanvasError;

/// Number of bytes per pixel.
pub const CHANNELS: usize = 4;

/// An owned RGBA8 image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// A fully transparent buffer.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Rgba::TRANSPARENT)
    }

    /// A buffer with every pixel set to `color`.
    #[must_use]
    pub fn filled(width: u32, height: u32, color: Rgba) -> Self {
        let data = color.to_array().repeat(pixel_count(width, height));
        Self { width, height, data }
    }

    /// Wrap raw RGBA bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::BufferSize`] if `data.len() != width * height * 4`.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self, CanvasError> {
        let expected = pixel_count(width, height) * CHANNELS;
        if data.len() != expected {
            return Err(CanvasError::BufferSize { expected, actual: data.len() });
        }
        Ok(Self { width, height, data })
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable access to the components. The slice length is fixed, so the
    /// size invariant holds.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    #[must_use]
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Byte offset of pixel `(x, y)`, or `None` outside the buffer.
    #[must_use]
    pub fn offset(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * CHANNELS)
    }

    /// The RGBA components of pixel `(x, y)`.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let i = self.offset(x, y)?;
        Some([self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]])
    }

    /// Overwrite pixel `(x, y)`. Out-of-bounds writes are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if let Some(i) = self.offset(x, y) {
            self.data[i..i + CHANNELS].copy_from_slice(&rgba);
        }
    }
}

fn pixel_count(width: u32, height: u32) -> usize {
    width as usize * height as usize
}
