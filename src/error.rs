//! The unified error type for the stream engine.

use thiserror::Error;

/// All errors returned by this crate.
///
/// Dimension mismatch between combine operands is deliberately absent:
/// combining streams of different rank walks only the common sub-volume
/// and is defined behavior, not an error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StreamError {
    /// A requested dimension extent is invalid (zero).
    #[error("invalid dimension extent {size}: extents must be at least 1")]
    InvalidShape {
        /// The rejected extent.
        size: usize,
    },

    /// An externally bound buffer does not match the stream's element count.
    #[error("buffer length mismatch: stream holds {expected} elements, got {got}")]
    BufferMismatch {
        /// Element count dictated by the stream's shape.
        expected: usize,
        /// Length of the buffer handed in.
        got: usize,
    },

    /// An axis index is out of bounds for the stream's rank.
    #[error("axis {axis} out of bounds for stream with {dims} dimensions")]
    AxisOutOfBounds {
        /// The offending axis index.
        axis: usize,
        /// The stream's dimension count.
        dims: usize,
    },

    /// A region of interest does not fit inside its axis.
    #[error("ROI start {start} + length {len} exceeds extent {size} on axis {axis}")]
    RoiOutOfRange {
        /// Axis the region was set on.
        axis: usize,
        /// Region start.
        start: usize,
        /// Region length.
        len: usize,
        /// Actual extent of the axis.
        size: usize,
    },

    /// A linear index or axis coordinate is out of bounds.
    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds {
        /// The rejected index.
        index: usize,
        /// The bound it violated.
        len: usize,
    },

    /// The operation requires at least one dimension.
    #[error("stream has zero dimensions")]
    EmptyStream,

    /// `exec` was called with no stage bound.
    #[error("no stage bound to this stream")]
    NoStage,

    /// A stage implementation reported a failure.
    #[error("stage failed: {0}")]
    Stage(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StreamError>;
