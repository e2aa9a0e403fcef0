//! Error types for mlhelpers.

use thiserror::Error;

/// Result alias for mlhelpers operations.
pub type MlHelpersResult<T> = std::result::Result<T, MlHelpersError>;

/// Errors that can occur when building views or converting them to pixels.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum MlHelpersError {
    /// Reshape was asked to change the total number of elements.
    #[error("cannot reshape {from:?} to {to:?}: element counts differ")]
    ShapeMismatch { from: Vec<usize>, to: Vec<usize> },
    /// The view has the wrong number of dimensions for the operation.
    #[error("expected a view with {expected} dimensions, got {got}")]
    RankMismatch { expected: usize, got: usize },
    /// The leading (channel) dimension does not have the required size.
    #[error("expected first dimension to have {expected} channels, got {got}")]
    ChannelCountMismatch { expected: usize, got: usize },
    /// The requested channel is not present in the view.
    #[error("channel {channel} out of range for {channels} channels")]
    InvalidChannel { channel: usize, channels: usize },
    /// The shape or stride description is malformed.
    #[error("invalid shape: {reason}")]
    InvalidShape { reason: &'static str },
    /// A transpose order is not a permutation of the view's axes.
    #[error("transpose order {order:?} is not a permutation of {rank} axes")]
    InvalidPermutation { order: Vec<usize>, rank: usize },
    /// The backing buffer cannot hold every addressable element.
    #[error("buffer too small: needed {needed}, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// A configuration value is out of its valid range.
    #[error("invalid config: {reason}")]
    InvalidConfig { reason: &'static str },
    /// Image encoding or file I/O failed.
    #[error("image I/O failed: {reason}")]
    ImageIo { reason: String },
}
