//! Per-class suppression followed by a global cap.

use crate::nms::order::sort_by_score_desc;
use crate::nms::{suppress, Prediction};
use crate::trace::{trace_event, trace_span};
use crate::util::{MlHelpersError, MlHelpersResult};
use std::collections::BTreeMap;
#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Configuration for multi-class suppression.
#[derive(Clone, Debug, PartialEq)]
pub struct MultiClassConfig {
    /// Number of classes; predictions with `class_index >= num_classes` are
    /// ignored.
    pub num_classes: usize,
    /// Predictions scoring at or below this value are discarded.
    pub score_threshold: f32,
    /// Boxes of the same class overlapping more than this are suppressed.
    pub iou_threshold: f32,
    /// Maximum boxes kept per class.
    pub max_per_class: usize,
    /// Maximum boxes kept overall.
    pub max_total: usize,
    /// Suppress class buckets in parallel (requires the `rayon` feature).
    pub parallel: bool,
}

impl Default for MultiClassConfig {
    fn default() -> Self {
        Self {
            num_classes: 1,
            score_threshold: 0.1,
            iou_threshold: 0.5,
            max_per_class: 10,
            max_total: 100,
            parallel: false,
        }
    }
}

impl MultiClassConfig {
    /// Checks that thresholds are finite and within `[0, 1]`.
    pub fn validate(&self) -> MlHelpersResult<()> {
        if !(0.0..=1.0).contains(&self.iou_threshold) {
            return Err(MlHelpersError::InvalidConfig {
                reason: "iou_threshold must be within [0, 1]",
            });
        }
        if !self.score_threshold.is_finite() {
            return Err(MlHelpersError::InvalidConfig {
                reason: "score_threshold must be finite",
            });
        }
        Ok(())
    }
}

/// Suppresses boxes per class, then keeps the `max_total` best survivors.
///
/// Boxes of different classes never suppress each other. When more than
/// `max_total` boxes survive, the highest-scoring ones are kept (stable on
/// ties) and returned in descending score order; otherwise survivors are
/// returned class by class.
pub fn suppress_multi_class(
    num_classes: usize,
    predictions: &[Prediction],
    score_threshold: f32,
    iou_threshold: f32,
    max_per_class: usize,
    max_total: usize,
) -> Vec<usize> {
    suppress_multi_class_with(
        predictions,
        &MultiClassConfig {
            num_classes,
            score_threshold,
            iou_threshold,
            max_per_class,
            max_total,
            parallel: false,
        },
    )
}

/// Config-driven form of [`suppress_multi_class`].
///
/// With `cfg.parallel` and the `rayon` feature, class buckets are processed
/// concurrently; the result is identical to the sequential path.
pub fn suppress_multi_class_with(predictions: &[Prediction], cfg: &MultiClassConfig) -> Vec<usize> {
    let _span = trace_span!(
        "suppress_multi_class",
        predictions = predictions.len(),
        classes = cfg.num_classes
    )
    .entered();

    if cfg.max_total == 0 || cfg.max_per_class == 0 {
        return Vec::new();
    }

    // Keyed by class so memory follows the input, not `num_classes`.
    let mut by_class: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (idx, prediction) in predictions.iter().enumerate() {
        if prediction.score <= cfg.score_threshold || prediction.class_index >= cfg.num_classes {
            continue;
        }
        by_class.entry(prediction.class_index).or_default().push(idx);
    }
    let buckets: Vec<Vec<usize>> = by_class.into_values().collect();

    let per_class = suppress_buckets(predictions, &buckets, cfg);
    let mut selected: Vec<usize> = per_class.into_iter().flatten().collect();

    trace_event!("class_survivors", count = selected.len());
    if selected.len() > cfg.max_total {
        sort_by_score_desc(predictions, &mut selected);
        selected.truncate(cfg.max_total);
    }
    trace_event!("selected", count = selected.len());
    selected
}

fn suppress_buckets(
    predictions: &[Prediction],
    buckets: &[Vec<usize>],
    cfg: &MultiClassConfig,
) -> Vec<Vec<usize>> {
    #[cfg(feature = "rayon")]
    if cfg.parallel {
        return suppress_buckets_par(predictions, buckets, cfg);
    }

    buckets
        .iter()
        .map(|bucket| suppress(predictions, bucket, cfg.iou_threshold, cfg.max_per_class))
        .collect()
}

#[cfg(feature = "rayon")]
fn suppress_buckets_par(
    predictions: &[Prediction],
    buckets: &[Vec<usize>],
    cfg: &MultiClassConfig,
) -> Vec<Vec<usize>> {
    buckets
        .par_iter()
        .map(|bucket| suppress(predictions, bucket, cfg.iou_threshold, cfg.max_per_class))
        .collect()
}
