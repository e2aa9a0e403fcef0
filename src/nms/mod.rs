//! Non-maximum suppression over scored detection boxes.
//!
//! Selection is greedy: candidates are visited from the highest score down
//! and kept unless they overlap an already kept box by more than the IOU
//! threshold, so the best box of every overlapping cluster survives.
//!
//! Results are indices into the caller's prediction slice. Inputs are
//! assumed well-formed: NaN scores order through `f32::total_cmp` and boxes
//! with negative sizes have zero IOU with everything; neither is rejected.

mod multiclass;
pub(crate) mod order;
mod rect;

pub use multiclass::{suppress_multi_class, suppress_multi_class_with, MultiClassConfig};
pub use rect::{iou, Rect};

use crate::nms::order::sort_by_score_desc;

/// Scored, categorized detection box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Prediction {
    /// Class of the detection.
    pub class_index: usize,
    /// Confidence score; higher is better.
    pub score: f32,
    /// Bounding box.
    pub rect: Rect,
}

impl Prediction {
    /// Creates a prediction.
    pub const fn new(class_index: usize, score: f32, rect: Rect) -> Self {
        Self {
            class_index,
            score,
            rect,
        }
    }
}

/// Suppresses overlapping boxes among `candidates`, ignoring classes.
///
/// Candidates are visited by descending score (stable on ties). A candidate
/// is kept when its IOU with every kept box is at most `iou_threshold`.
/// Stops once `max_selected` boxes are kept. Returns the kept indices in
/// the order they were accepted.
pub fn suppress(
    predictions: &[Prediction],
    candidates: &[usize],
    iou_threshold: f32,
    max_selected: usize,
) -> Vec<usize> {
    if max_selected == 0 || candidates.is_empty() {
        return Vec::new();
    }

    let mut order = candidates.to_vec();
    sort_by_score_desc(predictions, &mut order);

    let mut selected: Vec<usize> = Vec::new();
    'outer: for idx in order {
        if selected.len() >= max_selected {
            break;
        }
        let rect = &predictions[idx].rect;
        for &kept in selected.iter() {
            if iou(rect, &predictions[kept].rect) > iou_threshold {
                continue 'outer;
            }
        }
        selected.push(idx);
    }

    selected
}

/// Suppresses overlapping boxes among all predictions, ignoring classes.
pub fn suppress_all(predictions: &[Prediction], iou_threshold: f32, max_selected: usize) -> Vec<usize> {
    let candidates: Vec<usize> = (0..predictions.len()).collect();
    suppress(predictions, &candidates, iou_threshold, max_selected)
}
