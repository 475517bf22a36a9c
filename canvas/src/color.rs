//! CSS color parsing.
//!
//! Shapes and text carry colors as the strings a canvas API accepts
//! (`"blue"`, `"#1f1a17"`, `"rgba(30, 144, 255, 0.12)"`). They are parsed
//! into [`Rgba`] once, before any drawing call, so a bad color is reported
//! without touching the surface.

#[cfg(test)]
#[path = "color_test.rs"]
mod color_test;

use std::fmt;
use std::str::FromStr;

use crate::error::CanvasError;

/// A straight (non-premultiplied) 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Fully opaque color.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Channels in buffer order.
    #[must_use]
    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// CSS `rgba()` form accepted by every 2D context.
    #[must_use]
    pub fn to_css(self) -> String {
        let alpha = f64::from(self.a) / 255.0;
        format!("rgba({}, {}, {}, {alpha})", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
    }
}

impl FromStr for Rgba {
    type Err = CanvasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_color(s)
    }
}

/// Parse any CSS color the browser accepts: named colors, hex forms,
/// `rgb()`/`rgba()`, `hsl()` and friends.
///
/// # Errors
///
/// Returns [`CanvasError::InvalidColor`] for anything else.
pub fn parse_color(raw: &str) -> Result<Rgba, CanvasError> {
    match csscolorparser::parse(raw) {
        Ok(color) => {
            let [r, g, b, a] = color.to_rgba8();
            Ok(Rgba::new(r, g, b, a))
        }
        Err(_) => Err(CanvasError::InvalidColor(raw.to_owned())),
    }
}
