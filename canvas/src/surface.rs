//! The rendering surface capability.
//!
//! [`Surface`] is the whole contract the [`crate::engine::Canvas`] needs from a
//! host: a handful of fill/stroke primitives plus raw pixel read/write. All
//! colors arrive already parsed, so implementations never see a bad color
//! string.

use serde::{Deserialize, Serialize};

use crate::color::{Rgba, parse_color};
use crate::consts::{DEFAULT_COLOR, DEFAULT_FONT};
use crate::error::CanvasError;
use crate::pixels::PixelBuffer;

/// A 2D drawing surface of fixed pixel dimensions.
pub trait Surface {
    /// Width in pixels.
    fn width(&self) -> u32;

    /// Height in pixels.
    fn height(&self) -> u32;

    /// Change the dimensions. Contents are cleared, as a browser canvas does.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the host rejects the resize.
    fn resize(&mut self, width: u32, height: u32) -> Result<(), CanvasError>;

    /// Create a new, empty surface of the same dimensions to stack above this one.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the host cannot allocate a surface.
    fn create_layer(&self, name: &str) -> Result<Self, CanvasError>
    where
        Self: Sized;

    /// Fill an axis-aligned rectangle. Negative extents grow left/up.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the host rejects the call.
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Rgba) -> Result<(), CanvasError>;

    /// Reset a rectangle to transparent black.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the host rejects the call.
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> Result<(), CanvasError>;

    /// Fill a full circle.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the host rejects the call.
    fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, color: Rgba) -> Result<(), CanvasError>;

    /// Stroke a straight segment.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the host rejects the call.
    fn stroke_line(
        &mut self,
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
        line_width: f64,
        color: Rgba,
    ) -> Result<(), CanvasError>;

    /// Draw a run of text anchored at `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the host rejects the call.
    fn fill_text(&mut self, text: &str, x: f64, y: f64, style: &TextStyle) -> Result<(), CanvasError>;

    /// Draw `image` scaled into the destination rectangle.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the host rejects the call.
    fn draw_image(&mut self, image: &PixelBuffer, x: f64, y: f64, width: f64, height: f64) -> Result<(), CanvasError>;

    /// Copy the full surface out as RGBA.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the host refuses to hand out pixels.
    fn read_pixels(&self) -> Result<PixelBuffer, CanvasError>;

    /// Replace the full surface with `pixels`.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::DimensionMismatch`] if `pixels` is not the
    /// surface's size, or `Err` if the host rejects the write.
    fn write_pixels(&mut self, pixels: &PixelBuffer) -> Result<(), CanvasError>;
}

/// Horizontal text anchoring, as in `CanvasRenderingContext2D.textAlign`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Right,
    Center,
    Start,
    End,
}

impl TextAlign {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Center => "center",
            Self::Start => "start",
            Self::End => "end",
        }
    }
}

/// Caller-facing text options. Absent fields fall back to the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<TextAlign>,
}

impl TextOptions {
    /// Resolve defaults and parse the color.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidColor`] if `color` is not a CSS color.
    pub fn resolve(&self) -> Result<TextStyle, CanvasError> {
        let font = non_empty(self.font.as_deref()).unwrap_or(DEFAULT_FONT).to_owned();
        let color = parse_color(non_empty(self.color.as_deref()).unwrap_or(DEFAULT_COLOR))?;
        Ok(TextStyle { font, color, align: self.align.unwrap_or_default() })
    }
}

/// Fully resolved text style handed to a [`Surface`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextStyle {
    pub font: String,
    pub color: Rgba,
    pub align: TextAlign,
}

/// Treat empty strings as absent, matching `value || default`.
pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
