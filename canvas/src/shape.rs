//! Shape descriptors and their rendering.
//!
//! A [`Shape`] is the `{ type, options }` record the canvas keeps for every
//! primitive it has drawn. The wire form matches what callers send:
//!
//! ```json
//! { "type": "line", "options": { "startX": 0, "startY": 0, "endX": 10, "endY": 10, "lineWidth": 2 } }
//! ```
//!
//! The kind decides which options are required; `color` and `lineWidth` are
//! always optional and fall back to [`DEFAULT_COLOR`] and
//! [`DEFAULT_LINE_WIDTH`].

#[cfg(test)]
#[path = "shape_test.rs"]
mod shape_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::{Rgba, parse_color};
use crate::consts::{DEFAULT_COLOR, DEFAULT_LINE_WIDTH};
use crate::error::CanvasError;
use crate::surface::{Surface, non_empty};

/// The primitive a shape descriptor draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Rectangle,
    Circle,
    Line,
}

impl ShapeKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rectangle => "rectangle",
            Self::Circle => "circle",
            Self::Line => "line",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShapeKind {
    type Err = CanvasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rectangle" => Ok(Self::Rectangle),
            "circle" => Ok(Self::Circle),
            "line" => Ok(Self::Line),
            other => Err(CanvasError::UnknownShape(other.to_owned())),
        }
    }
}

/// Options for a filled rectangle. `(x, y)` is the top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RectOptions {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Options for a filled circle centered on `(x, y)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircleOptions {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Options for a stroked line segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineOptions {
    pub start_x: f64,
    pub start_y: f64,
    pub end_x: f64,
    pub end_y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_width: Option<f64>,
}

/// A recorded drawing primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "options", rename_all = "lowercase")]
pub enum Shape {
    Rectangle(RectOptions),
    Circle(CircleOptions),
    Line(LineOptions),
}

impl Shape {
    /// Build a shape from a kind name and a JSON options object.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::UnknownShape`] for an unrecognized kind and
    /// [`CanvasError::InvalidShape`] when a required option is missing or has
    /// the wrong type.
    pub fn from_options(kind: &str, options: serde_json::Value) -> Result<Self, CanvasError> {
        let kind: ShapeKind = kind.parse()?;
        let invalid = |e: serde_json::Error| CanvasError::InvalidShape { kind: kind.to_string(), reason: e.to_string() };
        let shape = match kind {
            ShapeKind::Rectangle => Self::Rectangle(serde_json::from_value(options).map_err(invalid)?),
            ShapeKind::Circle => Self::Circle(serde_json::from_value(options).map_err(invalid)?),
            ShapeKind::Line => Self::Line(serde_json::from_value(options).map_err(invalid)?),
        };
        Ok(shape)
    }

    /// A rectangle with an explicit color.
    #[must_use]
    pub fn rectangle(x: f64, y: f64, width: f64, height: f64, color: &str) -> Self {
        Self::Rectangle(RectOptions { x, y, width, height, color: Some(color.to_owned()) })
    }

    #[must_use]
    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Rectangle(_) => ShapeKind::Rectangle,
            Self::Circle(_) => ShapeKind::Circle,
            Self::Line(_) => ShapeKind::Line,
        }
    }

    /// The color string to draw with, after defaulting.
    #[must_use]
    pub fn color(&self) -> &str {
        let raw = match self {
            Self::Rectangle(o) => o.color.as_deref(),
            Self::Circle(o) => o.color.as_deref(),
            Self::Line(o) => o.color.as_deref(),
        };
        non_empty(raw).unwrap_or(DEFAULT_COLOR)
    }

    /// Stroke width for lines; `None` for filled shapes.
    #[must_use]
    pub fn line_width(&self) -> Option<f64> {
        match self {
            Self::Line(o) => Some(o.line_width.filter(|w| *w > 0.0).unwrap_or(DEFAULT_LINE_WIDTH)),
            Self::Rectangle(_) | Self::Circle(_) => None,
        }
    }

    /// Parse the color without drawing anything.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidColor`] if the color is not a CSS color.
    pub fn resolved_color(&self) -> Result<Rgba, CanvasError> {
        parse_color(self.color())
    }

    /// Draw this shape onto `surface`.
    ///
    /// The color is validated before the first surface call, so an invalid
    /// color leaves the surface untouched.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidColor`] or any error from the surface.
    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S) -> Result<(), CanvasError> {
        let color = self.resolved_color()?;
        match self {
            Self::Rectangle(o) => surface.fill_rect(o.x, o.y, o.width, o.height, color),
            Self::Circle(o) => surface.fill_circle(o.x, o.y, o.radius, color),
            Self::Line(o) => {
                let width = self.line_width().unwrap_or(DEFAULT_LINE_WIDTH);
                surface.stroke_line(o.start_x, o.start_y, o.end_x, o.end_y, width, color)
            }
        }
    }
}
