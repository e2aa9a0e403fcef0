//! Python bindings for mlhelpers.
//!
//! Exposes IOU, single- and multi-class non-maximum suppression, and tensor
//! to pixel conversion over numpy arrays via PyO3.

use numpy::{PyReadonlyArray1, PyReadonlyArray2, PyReadonlyArray3, PyUntypedArrayMethods};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyBytes;

use mlhelpers::{
    MlHelpersError, MultiClassConfig, OwnedArray, PixelBuffer, Prediction as RustPrediction,
    Rect,
};

/// Convert an MlHelpersError to a Python exception.
fn to_py_err(err: MlHelpersError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

type RectTuple = (f32, f32, f32, f32);

fn rect_from_tuple((x, y, width, height): RectTuple) -> Rect {
    Rect::new(x, y, width, height)
}

/// Builds predictions from an (N, 4) `x, y, width, height` array, N scores
/// and optional N class indices.
fn predictions_from_arrays(
    boxes: &PyReadonlyArray2<'_, f32>,
    scores: &PyReadonlyArray1<'_, f32>,
    classes: Option<&PyReadonlyArray1<'_, i64>>,
) -> PyResult<Vec<RustPrediction>> {
    let shape = boxes.shape();
    if shape[1] != 4 {
        return Err(PyValueError::new_err("boxes must have shape (N, 4)"));
    }
    let n = shape[0];
    if scores.len() != n {
        return Err(PyValueError::new_err("scores must have one entry per box"));
    }
    if let Some(classes) = classes {
        if classes.len() != n {
            return Err(PyValueError::new_err("classes must have one entry per box"));
        }
    }

    let boxes = boxes.as_array();
    let scores = scores.as_array();
    let classes = classes.map(|c| c.as_array());
    let mut out = Vec::with_capacity(n);
    for (i, row) in boxes.rows().into_iter().enumerate() {
        let class_index = match &classes {
            Some(classes) => usize::try_from(classes[i])
                .map_err(|_| PyValueError::new_err("class indices must be non-negative"))?,
            None => 0,
        };
        out.push(RustPrediction::new(
            class_index,
            scores[i],
            Rect::new(row[0], row[1], row[2], row[3]),
        ));
    }
    Ok(out)
}

fn pixels_to_py<'py>(py: Python<'py>, pixels: PixelBuffer) -> (Bound<'py, PyBytes>, usize, usize) {
    let (width, height) = (pixels.width(), pixels.height());
    (PyBytes::new(py, pixels.data()), width, height)
}

/// Intersection-over-union of two (x, y, width, height) rectangles.
#[pyfunction]
fn iou(a: RectTuple, b: RectTuple) -> f32 {
    mlhelpers::iou(&rect_from_tuple(a), &rect_from_tuple(b))
}

/// Class-agnostic non-maximum suppression.
///
/// Args:
///     boxes: float32 array of shape (N, 4) holding x, y, width, height
///     scores: float32 array of shape (N,)
///     iou_threshold: boxes overlapping a kept box by more than this are dropped
///     max_boxes: maximum number of boxes to keep
///
/// Returns:
///     List of kept indices, highest score first
#[pyfunction]
#[pyo3(signature = (boxes, scores, iou_threshold = 0.5, max_boxes = 100))]
fn nms(
    boxes: PyReadonlyArray2<'_, f32>,
    scores: PyReadonlyArray1<'_, f32>,
    iou_threshold: f32,
    max_boxes: usize,
) -> PyResult<Vec<usize>> {
    let predictions = predictions_from_arrays(&boxes, &scores, None)?;
    Ok(mlhelpers::suppress_all(&predictions, iou_threshold, max_boxes))
}

/// Per-class non-maximum suppression with a global cap.
///
/// Args:
///     boxes: float32 array of shape (N, 4) holding x, y, width, height
///     scores: float32 array of shape (N,)
///     classes: int64 array of shape (N,)
///     num_classes: number of classes; larger class indices are ignored
///     score_threshold: scores at or below this are discarded (default: 0.1)
///     iou_threshold: same-class overlap limit (default: 0.5)
///     max_per_class: boxes kept per class (default: 10)
///     max_total: boxes kept overall (default: 100)
///     parallel: suppress classes in parallel (default: False)
#[pyfunction]
#[pyo3(signature = (
    boxes,
    scores,
    classes,
    num_classes,
    score_threshold = 0.1,
    iou_threshold = 0.5,
    max_per_class = 10,
    max_total = 100,
    parallel = false
))]
#[allow(clippy::too_many_arguments)]
fn nms_multi_class(
    boxes: PyReadonlyArray2<'_, f32>,
    scores: PyReadonlyArray1<'_, f32>,
    classes: PyReadonlyArray1<'_, i64>,
    num_classes: usize,
    score_threshold: f32,
    iou_threshold: f32,
    max_per_class: usize,
    max_total: usize,
    parallel: bool,
) -> PyResult<Vec<usize>> {
    let predictions = predictions_from_arrays(&boxes, &scores, Some(&classes))?;
    let cfg = MultiClassConfig {
        num_classes,
        score_threshold,
        iou_threshold,
        max_per_class,
        max_total,
        parallel,
    };
    cfg.validate().map_err(to_py_err)?;
    Ok(mlhelpers::suppress_multi_class_with(&predictions, &cfg))
}

/// Converts a (3, height, width) float32 tensor into RGBA bytes.
///
/// Returns:
///     Tuple of (bytes, width, height)
#[pyfunction]
#[pyo3(signature = (tensor, offset = 0.0, scale = 255.0))]
fn to_rgba_bytes<'py>(
    py: Python<'py>,
    tensor: PyReadonlyArray3<'py, f32>,
    offset: f32,
    scale: f32,
) -> PyResult<(Bound<'py, PyBytes>, usize, usize)> {
    let shape = tensor.shape().to_vec();
    let values: Vec<f32> = tensor.as_array().iter().copied().collect();
    let mut owned = OwnedArray::from_vec(values, &shape).map_err(to_py_err)?;
    let pixels = owned.view().to_rgba_bytes(offset, scale).map_err(to_py_err)?;
    Ok(pixels_to_py(py, pixels))
}

/// Converts a (height, width) float32 tensor into grayscale bytes.
///
/// Returns:
///     Tuple of (bytes, width, height)
#[pyfunction]
#[pyo3(signature = (tensor, offset = 0.0, scale = 255.0))]
fn to_gray_bytes<'py>(
    py: Python<'py>,
    tensor: PyReadonlyArray2<'py, f32>,
    offset: f32,
    scale: f32,
) -> PyResult<(Bound<'py, PyBytes>, usize, usize)> {
    let shape = tensor.shape().to_vec();
    let values: Vec<f32> = tensor.as_array().iter().copied().collect();
    let mut owned = OwnedArray::from_vec(values, &shape).map_err(to_py_err)?;
    let pixels = owned.view().to_gray_bytes(offset, scale).map_err(to_py_err)?;
    Ok(pixels_to_py(py, pixels))
}

/// Python module for mlhelpers.
#[pymodule]
fn _mlhelpers(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(iou, m)?)?;
    m.add_function(wrap_pyfunction!(nms, m)?)?;
    m.add_function(wrap_pyfunction!(nms_multi_class, m)?)?;
    m.add_function(wrap_pyfunction!(to_rgba_bytes, m)?)?;
    m.add_function(wrap_pyfunction!(to_gray_bytes, m)?)?;

    m.add("__version__", env!("CARGO_PKG_VERSION"))?;

    Ok(())
}
