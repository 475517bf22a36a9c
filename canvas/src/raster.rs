//! Software surface: rasterizes onto a [`tiny_skia::Pixmap`].
//!
//! Anti-aliasing is off, so a pixel is either painted or not and solid fills
//! come back exact. Fills composite with source-over, the 2D context default.
//! The pixmap stores premultiplied alpha; [`Raster::pixels`] hands out the
//! straight-alpha [`PixelBuffer`] the rest of the crate works with.
//!
//! Glyphs are not rasterized: text runs are recorded in
//! [`Raster::text_runs`] so callers can still observe what was written and
//! where.
//!
//! Every destination rectangle is clipped to the surface before anything is
//! drawn, so an oversized or far off-screen image costs no more than the
//! pixels it actually covers.

#[cfg(test)]
#[path = "raster_test.rs"]
mod raster_test;

use tiny_skia::{
    BlendMode, ColorU8, FillRule, FilterQuality, LineCap, Paint, PathBuilder, Pattern, Pixmap, Rect, SpreadMode,
    Stroke, Transform,
};

use crate::color::Rgba;
use crate::consts::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::error::CanvasError;
use crate::pixels::{CHANNELS, PixelBuffer};
use crate::surface::{Surface, TextStyle};

/// A text run recorded by [`Raster::fill_text`].
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub style: TextStyle,
}

/// In-memory RGBA surface.
#[derive(Debug, Clone)]
pub struct Raster {
    width: u32,
    height: u32,
    /// `None` when either side is zero; tiny-skia has no empty pixmaps.
    pixmap: Option<Pixmap>,
    text_runs: Vec<TextRun>,
}

impl Default for Raster {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}

impl Raster {
    /// A transparent surface of the given size.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, pixmap: Pixmap::new(width, height), text_runs: Vec::new() }
    }

    /// A surface holding a copy of `pixels`.
    #[must_use]
    pub fn from_pixels(pixels: &PixelBuffer) -> Self {
        let mut raster = Self::new(pixels.width(), pixels.height());
        if let Some(pixmap) = raster.pixmap.as_mut() {
            load(pixmap, pixels);
        }
        raster
    }

    /// A straight-alpha snapshot of the current pixels.
    #[must_use]
    pub fn pixels(&self) -> PixelBuffer {
        let mut out = PixelBuffer::new(self.width, self.height);
        if let Some(pixmap) = &self.pixmap {
            for (dst, src) in out.data_mut().chunks_exact_mut(CHANNELS).zip(pixmap.pixels()) {
                let c = src.demultiply();
                dst.copy_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
            }
        }
        out
    }

    /// Text drawn so far, in draw order.
    #[must_use]
    pub fn text_runs(&self) -> &[TextRun] {
        &self.text_runs
    }

    /// `(x, y, width, height)` normalized to positive extents and clipped to
    /// the surface. `None` when nothing of it is visible.
    fn clip(&self, x: f64, y: f64, width: f64, height: f64) -> Option<Rect> {
        let (left, right) = if width < 0.0 { (x + width, x) } else { (x, x + width) };
        let (top, bottom) = if height < 0.0 { (y + height, y) } else { (y, y + height) };
        let bounds = Rect::from_xywh(0.0, 0.0, self.width as f32, self.height as f32)?;
        let rect = Rect::from_ltrb(left as f32, top as f32, right as f32, bottom as f32)?.intersect(&bounds)?;
        (rect.width() > 0.0 && rect.height() > 0.0).then_some(rect)
    }
}

/// Copy straight-alpha `pixels` into a pixmap of the same size.
fn load(pixmap: &mut Pixmap, pixels: &PixelBuffer) {
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(pixels.data().chunks_exact(CHANNELS)) {
        *dst = ColorU8::from_rgba(src[0], src[1], src[2], src[3]).premultiply();
    }
}

fn solid(color: Rgba) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = false;
    paint
}

impl Surface for Raster {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), CanvasError> {
        let pixmap = Pixmap::new(width, height);
        if pixmap.is_none() && width > 0 && height > 0 {
            return Err(CanvasError::Surface(format!("cannot allocate a {width}x{height} surface")));
        }
        *self = Self { width, height, pixmap, text_runs: Vec::new() };
        Ok(())
    }

    fn create_layer(&self, _name: &str) -> Result<Self, CanvasError> {
        Ok(Self::new(self.width, self.height))
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Rgba) -> Result<(), CanvasError> {
        let Some(rect) = self.clip(x, y, width, height) else {
            return Ok(());
        };
        if let Some(pixmap) = self.pixmap.as_mut() {
            pixmap.fill_rect(rect, &solid(color), Transform::identity(), None);
        }
        Ok(())
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> Result<(), CanvasError> {
        let Some(rect) = self.clip(x, y, width, height) else {
            return Ok(());
        };
        if rect.width() >= self.width as f32 && rect.height() >= self.height as f32 {
            self.text_runs.clear();
        }
        if let Some(pixmap) = self.pixmap.as_mut() {
            let mut paint = solid(Rgba::BLACK);
            paint.blend_mode = BlendMode::Clear;
            pixmap.fill_rect(rect, &paint, Transform::identity(), None);
        }
        Ok(())
    }

    fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, color: Rgba) -> Result<(), CanvasError> {
        if radius.is_nan() || radius <= 0.0 {
            return Ok(());
        }
        let Some(path) = PathBuilder::from_circle(cx as f32, cy as f32, radius as f32) else {
            return Ok(());
        };
        if let Some(pixmap) = self.pixmap.as_mut() {
            pixmap.fill_path(&path, &solid(color), FillRule::Winding, Transform::identity(), None);
        }
        Ok(())
    }

    fn stroke_line(
        &mut self,
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
        line_width: f64,
        color: Rgba,
    ) -> Result<(), CanvasError> {
        // Butt caps: a zero-length segment paints nothing.
        if (x0 == x1 && y0 == y1) || line_width.is_nan() || line_width <= 0.0 {
            return Ok(());
        }
        let mut pb = PathBuilder::new();
        pb.move_to(x0 as f32, y0 as f32);
        pb.line_to(x1 as f32, y1 as f32);
        let Some(path) = pb.finish() else {
            return Ok(());
        };
        let stroke = Stroke { width: line_width as f32, line_cap: LineCap::Butt, ..Stroke::default() };
        if let Some(pixmap) = self.pixmap.as_mut() {
            pixmap.stroke_path(&path, &solid(color), &stroke, Transform::identity(), None);
        }
        Ok(())
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, style: &TextStyle) -> Result<(), CanvasError> {
        self.text_runs.push(TextRun { text: text.to_owned(), x, y, style: style.clone() });
        Ok(())
    }

    fn draw_image(&mut self, image: &PixelBuffer, x: f64, y: f64, width: f64, height: f64) -> Result<(), CanvasError> {
        let Some(dest) = self.clip(x, y, width, height) else {
            return Ok(());
        };
        let Some(mut source) = Pixmap::new(image.width(), image.height()) else {
            return Ok(());
        };
        load(&mut source, image);

        // Maps image space onto the unclipped destination; only `dest` is sampled.
        let transform = Transform::from_row(
            (width.abs() / f64::from(image.width())) as f32,
            0.0,
            0.0,
            (height.abs() / f64::from(image.height())) as f32,
            x.min(x + width) as f32,
            y.min(y + height) as f32,
        );
        let paint = Paint {
            shader: Pattern::new(source.as_ref(), SpreadMode::Pad, FilterQuality::Nearest, 1.0, transform),
            anti_alias: false,
            ..Paint::default()
        };
        if let Some(pixmap) = self.pixmap.as_mut() {
            pixmap.fill_rect(dest, &paint, Transform::identity(), None);
        }
        Ok(())
    }

    fn read_pixels(&self) -> Result<PixelBuffer, CanvasError> {
        Ok(self.pixels())
    }

    fn write_pixels(&mut self, pixels: &PixelBuffer) -> Result<(), CanvasError> {
        if pixels.width() != self.width || pixels.height() != self.height {
            return Err(CanvasError::DimensionMismatch {
                expected_width: self.width,
                expected_height: self.height,
                width: pixels.width(),
                height: pixels.height(),
            });
        }
        if let Some(pixmap) = self.pixmap.as_mut() {
            load(pixmap, pixels);
        }
        Ok(())
    }
}
