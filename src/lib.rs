//! mlhelpers post-processes raw machine-learning model output on the CPU.
//!
//! Two independent building blocks:
//! - [`ArrayView`]: zero-copy strided views over a flat tensor buffer, with
//!   transpose, reshape and conversion to RGBA/grayscale bytes.
//! - [`nms`]: greedy non-maximum suppression over scored boxes, class-agnostic
//!   or per class with a global cap.
//!
//! Optional features: `rayon` (parallel per-class suppression), `simd`
//! (vectorized `f32` pixel conversion), `image-io` (hand-off to the `image`
//! crate) and `tracing` (spans and events).

pub mod array;
pub mod lowlevel;
pub mod nms;
pub mod pixel;
mod trace;
pub mod util;

pub use array::{ArrayView, Element, NdIndex, OwnedArray};
pub use nms::{
    iou, suppress, suppress_all, suppress_multi_class, suppress_multi_class_with,
    MultiClassConfig, Prediction, Rect,
};
pub use pixel::{PixelBuffer, PixelFormat};
pub use util::{MlHelpersError, MlHelpersResult};
