//! Score ordering for suppression candidates.

use crate::nms::Prediction;
use std::cmp::Ordering;

/// Compares two prediction indices by descending score.
///
/// Uses `f32::total_cmp`, so a positive NaN score sorts ahead of every
/// finite score.
pub(crate) fn score_cmp_desc(predictions: &[Prediction], a: usize, b: usize) -> Ordering {
    predictions[b].score.total_cmp(&predictions[a].score)
}

/// Sorts indices by descending score; ties keep their relative order.
pub(crate) fn sort_by_score_desc(predictions: &[Prediction], indices: &mut [usize]) {
    indices.sort_by(|&a, &b| score_cmp_desc(predictions, a, b));
}
