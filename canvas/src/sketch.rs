//! Sketch capture and shape recognition.
//!
//! Capture is a two-state machine. [`SketchCapture::start`] clears the point
//! list and enters `Capturing`; each pointer-down while capturing appends a
//! point; [`SketchCapture::finish`] returns to `Idle`. What the points turn
//! into is decided by a [`Recognizer`], kept behind a trait so a real model
//! can replace [`FixedRecognizer`] without touching the state machine.

#[cfg(test)]
#[path = "sketch_test.rs"]
mod sketch_test;

use serde::{Deserialize, Serialize};

use crate::shape::Shape;

/// A captured pointer position in surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Turns a finished sketch into a shape descriptor.
pub trait Recognizer {
    /// Recognize the sketch made of `points` (possibly empty).
    fn recognize(&self, points: &[Point]) -> Shape;
}

/// Placeholder recognizer: ignores the points and always answers with the
/// same blue rectangle at `(50, 50)`, 100×50.
///
/// This stands in for sketch recognition that was never built. It is not
/// an attempt at recognition.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedRecognizer;

impl FixedRecognizer {
    /// The shape every recognition yields.
    #[must_use]
    pub fn shape() -> Shape {
        Shape::rectangle(50.0, 50.0, 100.0, 50.0, "blue")
    }
}

impl Recognizer for FixedRecognizer {
    fn recognize(&self, _points: &[Point]) -> Shape {
        Self::shape()
    }
}

/// Capture state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SketchState {
    #[default]
    Idle,
    Capturing,
}

/// Records pointer-down positions between `start` and `finish`.
#[derive(Debug, Clone, Default)]
pub struct SketchCapture {
    state: SketchState,
    points: Vec<Point>,
}

impl SketchCapture {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter `Capturing` with an empty point list. Restarts if already capturing.
    pub fn start(&mut self) {
        self.state = SketchState::Capturing;
        self.points.clear();
    }

    /// Record a pointer-down. Returns `false` (and records nothing) when idle.
    pub fn record(&mut self, point: Point) -> bool {
        if self.state != SketchState::Capturing {
            return false;
        }
        self.points.push(point);
        true
    }

    /// Leave `Capturing`. Returns `false` when there was no capture to finish.
    ///
    /// The points stay readable until the next [`SketchCapture::start`].
    pub fn finish(&mut self) -> bool {
        if self.state != SketchState::Capturing {
            return false;
        }
        self.state = SketchState::Idle;
        true
    }

    #[must_use]
    pub fn state(&self) -> SketchState {
        self.state
    }

    #[must_use]
    pub fn is_capturing(&self) -> bool {
        self.state == SketchState::Capturing
    }

    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }
}
