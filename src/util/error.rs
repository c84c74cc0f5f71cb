//! Error types for detpost.

use thiserror::Error;

/// Result alias for detpost operations.
pub type DetPostResult<T> = std::result::Result<T, DetPostError>;

/// Errors that can occur when running detpost stages.
///
/// Every variant reports a caller contract violation; numerical degeneracies
/// inside the pipeline are recovered locally and never surface here.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum DetPostError {
    /// A tensor has the wrong rank or a zero-sized dimension.
    #[error("invalid tensor shape {shape:?}: {reason}")]
    InvalidShape {
        shape: Vec<usize>,
        reason: &'static str,
    },
    /// The batch dimension of a detection tensor is not 1.
    #[error("batch dimension must be 1, got {batch}")]
    BatchSize { batch: usize },
    /// The number of anchors does not match `boxes_per_cell`.
    #[error("expected {boxes_per_cell} anchors, got {anchors}")]
    AnchorCountMismatch {
        anchors: usize,
        boxes_per_cell: usize,
    },
    /// The channel dimension does not pack `anchors * (num_classes + 5)` values.
    #[error("channel count {channels} does not hold {anchors} anchors of {per_anchor} values")]
    ChannelMismatch {
        channels: usize,
        anchors: usize,
        per_anchor: usize,
    },
    /// The backing buffer length does not match the shape.
    #[error("buffer length mismatch: needed {needed}, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// Requested output dimensions are zero or overflow.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// A configuration value is out of range.
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
    /// Image decoding or conversion failed.
    #[error("image io: {reason}")]
    ImageIo { reason: String },
}
