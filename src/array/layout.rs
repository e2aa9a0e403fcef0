//! Shape and stride arithmetic shared by owned arrays and views.
//!
//! A flat offset is `Σ index[i] * strides[i]`. Row-major strides make the
//! last dimension vary fastest: `strides[rank - 1] == 1` and
//! `strides[i] == strides[i + 1] * shape[i + 1]`.

use crate::util::{MlHelpersError, MlHelpersResult};

/// Returns the row-major strides for `shape`.
pub fn row_major_strides(shape: &[usize]) -> Vec<usize> {
    let mut strides = vec![0usize; shape.len()];
    let mut step = 1usize;
    for (stride, &dim) in strides.iter_mut().zip(shape).rev() {
        *stride = step;
        step = step.saturating_mul(dim);
    }
    strides
}

/// Returns the number of elements described by `shape`.
pub fn element_count(shape: &[usize]) -> usize {
    shape.iter().product()
}

/// Validates a shape and returns its element count.
pub(crate) fn checked_element_count(shape: &[usize]) -> MlHelpersResult<usize> {
    if shape.is_empty() {
        return Err(MlHelpersError::InvalidShape {
            reason: "shape must have at least one dimension",
        });
    }
    shape
        .iter()
        .try_fold(1usize, |acc, &dim| acc.checked_mul(dim))
        .ok_or(MlHelpersError::InvalidShape {
            reason: "element count overflows usize",
        })
}

/// Returns the minimum storage length that keeps every index of
/// `shape`/`strides` in bounds.
pub(crate) fn required_len(shape: &[usize], strides: &[usize]) -> MlHelpersResult<usize> {
    checked_element_count(shape)?;
    if strides.len() != shape.len() {
        return Err(MlHelpersError::InvalidShape {
            reason: "strides and shape must have the same length",
        });
    }
    if shape.contains(&0) {
        return Ok(0);
    }
    shape
        .iter()
        .zip(strides)
        .try_fold(0usize, |acc, (&dim, &stride)| {
            (dim - 1).checked_mul(stride)?.checked_add(acc)
        })
        .and_then(|last| last.checked_add(1))
        .ok_or(MlHelpersError::InvalidShape {
            reason: "largest offset overflows usize",
        })
}

/// A multi-dimensional index into an array.
///
/// Implemented for `usize` (one index), tuples of two to five indices, fixed
/// arrays and slices. Every form computes the same `Σ index[i] * strides[i]`.
pub trait NdIndex {
    /// Flat offset of this index. Dimensions are not bounds-checked.
    fn offset(&self, strides: &[usize]) -> usize;

    /// Flat offset when the index count equals the rank and every index lies
    /// inside its dimension, `None` otherwise.
    fn checked_offset(&self, shape: &[usize], strides: &[usize]) -> Option<usize>;
}

impl NdIndex for [usize] {
    #[inline]
    fn offset(&self, strides: &[usize]) -> usize {
        debug_assert!(self.len() <= strides.len(), "more indices than dimensions");
        self.iter().zip(strides).map(|(&i, &s)| i * s).sum()
    }

    fn checked_offset(&self, shape: &[usize], strides: &[usize]) -> Option<usize> {
        if self.len() != shape.len() {
            return None;
        }
        let mut offset = 0usize;
        for ((&index, &dim), &stride) in self.iter().zip(shape).zip(strides) {
            if index >= dim {
                return None;
            }
            offset = index.checked_mul(stride)?.checked_add(offset)?;
        }
        Some(offset)
    }
}

impl NdIndex for &[usize] {
    #[inline]
    fn offset(&self, strides: &[usize]) -> usize {
        (**self).offset(strides)
    }

    fn checked_offset(&self, shape: &[usize], strides: &[usize]) -> Option<usize> {
        (**self).checked_offset(shape, strides)
    }
}

impl<const N: usize> NdIndex for [usize; N] {
    #[inline]
    fn offset(&self, strides: &[usize]) -> usize {
        self.as_slice().offset(strides)
    }

    fn checked_offset(&self, shape: &[usize], strides: &[usize]) -> Option<usize> {
        self.as_slice().checked_offset(shape, strides)
    }
}

impl NdIndex for usize {
    #[inline]
    fn offset(&self, strides: &[usize]) -> usize {
        self * strides[0]
    }

    fn checked_offset(&self, shape: &[usize], strides: &[usize]) -> Option<usize> {
        [*self].checked_offset(shape, strides)
    }
}

macro_rules! tuple_index {
    (@usize $field:tt) => {
        usize
    };
    ($($field:tt),+) => {
        impl NdIndex for ($(tuple_index!(@usize $field),)+) {
            #[inline]
            fn offset(&self, strides: &[usize]) -> usize {
                0 $(+ self.$field * strides[$field])+
            }

            fn checked_offset(&self, shape: &[usize], strides: &[usize]) -> Option<usize> {
                [$(self.$field),+].checked_offset(shape, strides)
            }
        }
    };
}

tuple_index!(0, 1);
tuple_index!(0, 1, 2);
tuple_index!(0, 1, 2, 3);
tuple_index!(0, 1, 2, 3, 4);

#[cfg(test)]
mod tests {
    use super::{checked_element_count, required_len, row_major_strides, NdIndex};
    use crate::MlHelpersError;

    #[test]
    fn row_major_strides_match_known_layout() {
        assert_eq!(row_major_strides(&[3, 4, 2]), vec![8, 2, 1]);
        assert_eq!(
            row_major_strides(&[1, 1, 48, 17, 27]),
            vec![22032, 22032, 459, 27, 1]
        );
        assert_eq!(row_major_strides(&[7]), vec![1]);
    }

    #[test]
    fn every_index_form_agrees() {
        let strides = [60, 20, 5, 1];
        let expected = 60 + 2 * 20 + 3 * 5 + 4;
        let tuple: (usize, usize, usize, usize) = (1, 2, 3, 4);
        let array = [1usize, 2, 3, 4];
        assert_eq!(tuple.offset(&strides), expected);
        assert_eq!(array.offset(&strides), expected);
        assert_eq!(array.as_slice().offset(&strides), expected);
        assert_eq!(7usize.offset(&[3]), 21);

        let pair: (usize, usize) = (3, 4);
        assert_eq!(pair.offset(&[5, 1]), 19);
        let five: (usize, usize, usize, usize, usize) = (1, 0, 0, 0, 2);
        assert_eq!(five.offset(&[100, 50, 10, 5, 1]), 102);
    }

    #[test]
    fn checked_offset_rejects_out_of_range() {
        let shape = [2, 3];
        let strides = [3, 1];
        assert_eq!([1usize, 2].checked_offset(&shape, &strides), Some(5));
        assert_eq!([2usize, 0].checked_offset(&shape, &strides), None);
        assert_eq!([0usize, 3].checked_offset(&shape, &strides), None);
        assert_eq!(1usize.checked_offset(&shape, &strides), None);
    }

    #[test]
    fn required_len_covers_largest_offset() {
        assert_eq!(required_len(&[2, 3], &[3, 1]).unwrap(), 6);
        assert_eq!(required_len(&[2, 3], &[4, 1]).unwrap(), 7);
        assert_eq!(required_len(&[3, 2], &[1, 3]).unwrap(), 6);
        assert_eq!(required_len(&[0, 3], &[3, 1]).unwrap(), 0);
    }

    #[test]
    fn malformed_shapes_are_rejected() {
        assert!(matches!(
            checked_element_count(&[]),
            Err(MlHelpersError::InvalidShape { .. })
        ));
        assert!(matches!(
            required_len(&[2, 3], &[1]),
            Err(MlHelpersError::InvalidShape { .. })
        ));
        assert!(matches!(
            checked_element_count(&[usize::MAX, 2]),
            Err(MlHelpersError::InvalidShape { .. })
        ));
    }
}
