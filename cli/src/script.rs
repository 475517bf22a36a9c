//! JSON drawing scripts.
//!
//! A script is a JSON array of steps, each tagged by `op`:
//!
//! ```json
//! [
//!   { "op": "background", "color": "white" },
//!   { "op": "layer", "name": "ink" },
//!   { "op": "shape", "type": "circle", "options": { "x": 40, "y": 40, "radius": 20, "color": "red" } },
//!   { "op": "text", "text": "hello", "x": 10, "y": 90, "font": "12px serif" },
//!   { "op": "switch_layer" },
//!   { "op": "filter", "name": "grayscale" },
//!   { "op": "image", "src": "stamp.png", "x": 0, "y": 0, "width": 16, "height": 16 },
//!   { "op": "sketch", "points": [{ "x": 1, "y": 2 }, { "x": 3, "y": 4 }] },
//!   { "op": "clear" }
//! ]
//! ```
//!
//! `switch_layer` without a name goes back to the base surface. The rendered
//! result is the base with every layer composited over it. Image `src`
//! is a PNG data URL or a path relative to the script's directory; a missing
//! `width`/`height` uses the image's own size.

#[cfg(test)]
#[path = "script_test.rs"]
mod script_test;

use std::path::Path;

use canvas::{Canvas, PixelBuffer, Point, Raster, Surface, TextOptions, image};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::CliError;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Shape {
        #[serde(rename = "type")]
        kind: String,
        #[serde(default)]
        options: Value,
    },
    Text {
        text: String,
        x: f64,
        y: f64,
        #[serde(flatten)]
        options: TextOptions,
    },
    Background {
        color: String,
    },
    Layer {
        name: String,
    },
    SwitchLayer {
        #[serde(default)]
        name: Option<String>,
    },
    Filter {
        name: String,
    },
    Image {
        src: String,
        x: f64,
        y: f64,
        #[serde(default)]
        width: Option<f64>,
        #[serde(default)]
        height: Option<f64>,
    },
    Clear,
    Sketch {
        #[serde(default)]
        points: Vec<Point>,
    },
}

impl Step {
    #[must_use]
    pub fn op(&self) -> &'static str {
        match self {
            Self::Shape { .. } => "shape",
            Self::Text { .. } => "text",
            Self::Background { .. } => "background",
            Self::Layer { .. } => "layer",
            Self::SwitchLayer { .. } => "switch_layer",
            Self::Filter { .. } => "filter",
            Self::Image { .. } => "image",
            Self::Clear => "clear",
            Self::Sketch { .. } => "sketch",
        }
    }
}

/// Parse a script document.
///
/// # Errors
///
/// Returns [`CliError::Json`] if the text is not an array of known steps.
pub fn parse(text: &str) -> Result<Vec<Step>, CliError> {
    Ok(serde_json::from_str(text)?)
}

/// Run `steps` in order, stopping at the first failure.
///
/// # Errors
///
/// Returns [`CliError::Step`] naming the failing step, or
/// [`CliError::Io`] if an image file cannot be read.
pub fn run<S: Surface>(canvas: &mut Canvas<S>, steps: &[Step], base_dir: &Path) -> Result<(), CliError> {
    for (index, step) in steps.iter().enumerate() {
        debug!(index, op = step.op(), "script step");
        apply(canvas, step, base_dir).map_err(|e| match e {
            CliError::Canvas(source) => CliError::Step { index, op: step.op(), source },
            other => other,
        })?;
    }
    Ok(())
}

/// Run `steps` on a fresh `width` x `height` canvas filled with
/// `background`, and flatten its layers into one image.
///
/// # Errors
///
/// As [`run`], plus [`CliError::Canvas`] for a bad background color.
pub fn render(
    steps: &[Step],
    width: u32,
    height: u32,
    background: &str,
    base_dir: &Path,
) -> Result<PixelBuffer, CliError> {
    let mut canvas = Canvas::new(Raster::new(width, height));
    canvas.set_background_color(background)?;
    run(&mut canvas, steps, base_dir)?;
    info!(
        steps = steps.len(),
        shapes = canvas.shapes().len(),
        layers = canvas.layer_names().len(),
        "script rendered"
    );
    Ok(canvas.flatten()?)
}

fn apply<S: Surface>(canvas: &mut Canvas<S>, step: &Step, base_dir: &Path) -> Result<(), CliError> {
    match step {
        Step::Shape { kind, options } => canvas.add_shape(kind, options.clone())?,
        Step::Text { text, x, y, options } => canvas.add_text(text, *x, *y, options)?,
        Step::Background { color } => canvas.set_background_color(color)?,
        Step::Layer { name } => canvas.create_layer(name)?,
        Step::SwitchLayer { name: Some(name) } => canvas.switch_layer(name)?,
        Step::SwitchLayer { name: None } => canvas.switch_to_base(),
        Step::Filter { name } => canvas.apply_filter(name)?,
        Step::Image { src, x, y, width, height } => {
            let decoded = load_image(src, base_dir)?;
            let width = width.unwrap_or_else(|| f64::from(decoded.width()));
            let height = height.unwrap_or_else(|| f64::from(decoded.height()));
            canvas.draw_image(&decoded, *x, *y, width, height)?;
        }
        Step::Clear => canvas.clear_canvas()?,
        Step::Sketch { points } => {
            canvas.start_sketching();
            for point in points {
                canvas.pointer_down(point.x, point.y)?;
            }
            canvas.stop_sketching()?;
        }
    }
    Ok(())
}

fn load_image(src: &str, base_dir: &Path) -> Result<PixelBuffer, CliError> {
    if src.trim_start().starts_with("data:") {
        return Ok(image::from_data_url(src)?);
    }
    let path = base_dir.join(src);
    let bytes = std::fs::read(&path).map_err(|source| CliError::Io { path: path.display().to_string(), source })?;
    Ok(image::decode_png(&bytes)?)
}
