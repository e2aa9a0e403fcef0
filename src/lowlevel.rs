//! Low-level building blocks for custom pipelines.
//!
//! Layout helpers for callers that manage their own buffers and need the
//! same stride arithmetic the views use. Most users should prefer the
//! top-level `ArrayView` and `OwnedArray` types.

pub use crate::array::layout::{element_count, row_major_strides};
pub use crate::array::Offsets;
