//! Shared defaults for the canvas crate.

// ── Drawing defaults ────────────────────────────────────────────

/// Fill/stroke color used when a shape or text run names none.
pub const DEFAULT_COLOR: &str = "black";

/// Stroke width for lines that do not specify a positive `lineWidth`.
pub const DEFAULT_LINE_WIDTH: f64 = 1.0;

/// Font used by text runs that do not specify one.
pub const DEFAULT_FONT: &str = "16px Arial";

// ── Surface ─────────────────────────────────────────────────────

/// Width of a freshly created raster surface, matching the browser canvas default.
pub const DEFAULT_WIDTH: u32 = 300;

/// Height of a freshly created raster surface, matching the browser canvas default.
pub const DEFAULT_HEIGHT: u32 = 150;

// ── Sketching ───────────────────────────────────────────────────

/// Radius of the dot drawn at each captured sketch point.
pub const SKETCH_MARKER_RADIUS: f64 = 2.0;

/// Color of the dot drawn at each captured sketch point.
pub const SKETCH_MARKER_COLOR: &str = "gray";

// ── Export ──────────────────────────────────────────────────────

/// Prefix of every PNG data URL produced by the crate.
pub const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";
