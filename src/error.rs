use enough::StopReason;

/// Errors from GIF parsing and frame decoding.
///
/// Every variant carries `Copy` data only; formatting a `GifError` never
/// allocates.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum GifError {
    /// Malformed LZW data or corrupt interior state.
    #[error("decode error: {0}")]
    Decode(&'static str),

    #[error("invalid parameter: {0}")]
    InvalidParam(&'static str),

    /// Wrong signature, unexpected separator, or malformed extension.
    #[error("corrupt GIF: {0}")]
    BadFile(&'static str),

    #[error("unexpected end of input")]
    EarlyEof,

    /// The stream holds no image to decode.
    #[error("no frame to decode")]
    NoFrame,

    #[error("frame buffer too small: need {needed} bytes, got {actual}")]
    BufferTooSmall { needed: usize, actual: usize },

    /// Zero dimension, frame extends beyond the canvas, or a dimension
    /// exceeds the configured limits.
    #[error("invalid frame dimensions: {width}x{height} at ({x},{y})")]
    InvalidFrameDimensions {
        x: u16,
        y: u16,
        width: u16,
        height: u16,
    },

    #[error("palette with {colors} colors exceeds the configured maximum")]
    UnsupportedColorDepth { colors: u16 },

    #[error("operation cancelled")]
    Cancelled(StopReason),
}

impl From<StopReason> for GifError {
    fn from(r: StopReason) -> Self {
        GifError::Cancelled(r)
    }
}
