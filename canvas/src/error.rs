//! Errors produced by canvas operations.

/// Errors produced by drawing, filtering and export operations.
///
/// Every variant is reported synchronously to the caller. Operations that
/// fail validation return before touching the surface or the recorded shape
/// list.
#[derive(Debug, thiserror::Error)]
pub enum CanvasError {
    /// The shape kind is not one of `rectangle`, `circle` or `line`.
    #[error("unknown shape type: {0}")]
    UnknownShape(String),

    /// The shape kind is known but its options are missing or malformed.
    #[error("invalid {kind} options: {reason}")]
    InvalidShape { kind: String, reason: String },

    /// The filter name is not one of the supported filters.
    #[error("unknown filter: {0}")]
    UnknownFilter(String),

    /// No layer with this name has been created.
    #[error("layer with name {0} not found")]
    UnknownLayer(String),

    /// A layer with this name already exists.
    #[error("layer with name {0} already exists")]
    DuplicateLayer(String),

    /// The color string could not be parsed as a CSS color.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// A raw RGBA buffer does not hold `width * height * 4` bytes.
    #[error("pixel buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSize { expected: usize, actual: usize },

    /// A pixel buffer does not match the dimensions of the surface it is written to.
    #[error("dimension mismatch: surface is {expected_width}x{expected_height}, buffer is {width}x{height}")]
    DimensionMismatch { expected_width: u32, expected_height: u32, width: u32, height: u32 },

    /// Image bytes or a data URL could not be decoded.
    #[error("image decode failed: {0}")]
    ImageDecode(String),

    /// Pixels could not be encoded as PNG.
    #[error("image encode failed: {0}")]
    ImageEncode(String),

    /// The host rendering surface rejected a call.
    #[error("surface error: {0}")]
    Surface(String),
}
