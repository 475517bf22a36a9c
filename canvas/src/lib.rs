//! Drawing surface wrapper for the sketchpad.
//!
//! This crate owns everything that happens on the drawing surface itself:
//! recording and rendering shape descriptors, stacking named layers, running
//! whole-image pixel filters, capturing sketches for the (mocked) shape
//! recognizer, and exporting the result as a PNG data URL. The actual pixels
//! live behind the [`surface::Surface`] trait so the same [`engine::Canvas`]
//! drives both the pure-Rust [`raster::Raster`] surface and the browser's
//! 2D context ([`web::WebSurface`]).
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | [`engine::Canvas`]: layers, shapes, text, filters, sketching, export |
//! | [`shape`] | Shape descriptors and their rendering |
//! | [`filter`] | Grayscale, invert and 3×3 convolution filters |
//! | [`sketch`] | Sketch capture state machine and the [`sketch::Recognizer`] seam |
//! | [`surface`] | The [`surface::Surface`] capability and text styling |
//! | [`raster`] | Software surface over a `tiny_skia::Pixmap` |
//! | [`web`] | Browser surface over `CanvasRenderingContext2d` |
//! | [`pixels`] | RGBA pixel buffer |
//! | [`image`] | PNG encode/decode and data URLs |
//! | [`color`] | CSS color parsing |
//! | [`error`] | [`error::CanvasError`] |
//! | [`consts`] | Shared defaults (colors, fonts, marker size) |

pub mod color;
pub mod consts;
pub mod engine;
pub mod error;
pub mod filter;
pub mod image;
pub mod pixels;
pub mod raster;
pub mod shape;
pub mod sketch;
pub mod surface;
pub mod web;

pub use engine::Canvas;
pub use error::CanvasError;
pub use filter::Filter;
pub use pixels::PixelBuffer;
pub use raster::Raster;
pub use shape::{Shape, ShapeKind};
pub use sketch::{FixedRecognizer, Point, Recognizer};
pub use surface::{Surface, TextAlign, TextOptions};
pub use web::WebSurface;
