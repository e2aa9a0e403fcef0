//! Strided multi-dimensional array views.
//!
//! `ArrayView` is a borrowed N-dimensional view into a flat buffer with an
//! explicit shape and per-dimension strides. `transposed` and `reshaped` are
//! zero-copy: the derived view reads and writes the same backing elements, so
//! a value set through one view is visible through every other view of that
//! buffer.
//!
//! Elements are stored as `Cell<T>` so aliasing views can all mutate through
//! shared references. `Cell` is not `Sync`, which confines every alias of a
//! buffer to the thread that borrowed it; sharing a buffer across threads
//! requires the caller to copy it out (`to_vec`) or synchronize externally.
//!
//! Indexed access (`get`, `set`) trusts the caller: dimension bounds are not
//! checked, and an offset past the end of the buffer panics through slice
//! indexing. `try_get` is the checked alternative.

use crate::util::{MlHelpersError, MlHelpersResult};
use std::cell::Cell;

mod display;
pub mod element;
pub mod layout;
mod owned;

pub use element::Element;
pub use layout::NdIndex;
pub use owned::OwnedArray;

use layout::{checked_element_count, element_count, required_len, row_major_strides};

/// Borrowed strided view over a shared buffer of `T`.
#[derive(Clone)]
pub struct ArrayView<'a, T> {
    pub(crate) data: &'a [Cell<T>],
    pub(crate) shape: Vec<usize>,
    pub(crate) strides: Vec<usize>,
}

impl<'a, T: Element> ArrayView<'a, T> {
    /// Creates a view with explicit strides over shared cells.
    ///
    /// Fails when the shape is empty, the stride count differs from the rank,
    /// or `data` is shorter than the largest reachable offset.
    pub fn new(data: &'a [Cell<T>], shape: &[usize], strides: &[usize]) -> MlHelpersResult<Self> {
        let needed = required_len(shape, strides)?;
        if data.len() < needed {
            return Err(MlHelpersError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            shape: shape.to_vec(),
            strides: strides.to_vec(),
        })
    }

    /// Creates a row-major view over shared cells.
    pub fn from_cells(data: &'a [Cell<T>], shape: &[usize]) -> MlHelpersResult<Self> {
        checked_element_count(shape)?;
        Self::new(data, shape, &row_major_strides(shape))
    }

    /// Wraps caller-owned storage without copying, using explicit strides.
    ///
    /// The buffer stays borrowed for as long as any view derived from it is
    /// alive.
    pub fn wrap(data: &'a mut [T], shape: &[usize], strides: &[usize]) -> MlHelpersResult<Self> {
        Self::new(Cell::from_mut(data).as_slice_of_cells(), shape, strides)
    }

    /// Wraps caller-owned row-major storage without copying.
    pub fn wrap_contiguous(data: &'a mut [T], shape: &[usize]) -> MlHelpersResult<Self> {
        Self::from_cells(Cell::from_mut(data).as_slice_of_cells(), shape)
    }

    /// Returns the dimension sizes.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Returns the per-dimension element steps.
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    /// Returns the number of dimensions.
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Returns the product of all dimension sizes.
    pub fn element_count(&self) -> usize {
        element_count(&self.shape)
    }

    /// Returns true when the strides are the row-major strides of the shape.
    pub fn is_contiguous(&self) -> bool {
        self.strides == row_major_strides(&self.shape)
    }

    /// Returns the backing cells, including elements the view does not reach.
    pub fn as_cells(&self) -> &'a [Cell<T>] {
        self.data
    }

    /// Reads the element at `index`.
    ///
    /// Indices are not checked against the shape; panics if the computed
    /// offset is past the end of the buffer.
    #[inline]
    pub fn get<I: NdIndex>(&self, index: I) -> T {
        self.data[index.offset(&self.strides)].get()
    }

    /// Writes the element at `index`. Same bounds contract as `get`.
    #[inline]
    pub fn set<I: NdIndex>(&self, index: I, value: T) {
        self.data[index.offset(&self.strides)].set(value);
    }

    /// Reads the element at `index` if it has one entry per dimension, each
    /// inside its dimension.
    pub fn try_get<I: NdIndex>(&self, index: I) -> Option<T> {
        let offset = index.checked_offset(&self.shape, &self.strides)?;
        self.data.get(offset).map(Cell::get)
    }

    /// Reads the element at a raw storage offset, ignoring shape and strides.
    #[inline]
    pub fn get_flat(&self, offset: usize) -> T {
        self.data[offset].get()
    }

    /// Writes the element at a raw storage offset, ignoring shape and strides.
    #[inline]
    pub fn set_flat(&self, offset: usize, value: T) {
        self.data[offset].set(value);
    }

    /// Returns a view with its axes permuted over the same storage.
    ///
    /// Axis `i` of the result is axis `order[i]` of `self`.
    pub fn transposed(&self, order: &[usize]) -> MlHelpersResult<ArrayView<'a, T>> {
        let rank = self.rank();
        let invalid = || MlHelpersError::InvalidPermutation {
            order: order.to_vec(),
            rank,
        };
        if order.len() != rank {
            return Err(invalid());
        }
        let mut seen = vec![false; rank];
        for &axis in order {
            if axis >= rank || seen[axis] {
                return Err(invalid());
            }
            seen[axis] = true;
        }

        Ok(ArrayView {
            data: self.data,
            shape: order.iter().map(|&axis| self.shape[axis]).collect(),
            strides: order.iter().map(|&axis| self.strides[axis]).collect(),
        })
    }

    /// Returns a view with a new shape and fresh row-major strides over the
    /// same storage.
    ///
    /// Only the element count is validated. The new strides index the buffer
    /// in storage order, not in this view's logical order, so reshaping a view
    /// whose layout is not contiguous (for example after `transposed`) mixes
    /// elements in storage order. This is not detected; call `to_owned`
    /// first when the logical order must be kept.
    pub fn reshaped(&self, shape: &[usize]) -> MlHelpersResult<ArrayView<'a, T>> {
        let count = checked_element_count(shape)?;
        if count != self.element_count() {
            return Err(MlHelpersError::ShapeMismatch {
                from: self.shape.clone(),
                to: shape.to_vec(),
            });
        }
        if count > self.data.len() {
            return Err(MlHelpersError::BufferTooSmall {
                needed: count,
                got: self.data.len(),
            });
        }
        Ok(ArrayView {
            data: self.data,
            shape: shape.to_vec(),
            strides: row_major_strides(shape),
        })
    }

    /// Iterates over storage offsets in logical row-major order.
    pub fn offsets(&self) -> Offsets<'_> {
        Offsets::new(&self.shape, &self.strides)
    }

    /// Copies the elements in logical order into a new vector.
    pub fn to_vec(&self) -> Vec<T> {
        self.offsets().map(|offset| self.data[offset].get()).collect()
    }

    /// Copies the elements in logical order into a new contiguous array.
    pub fn to_owned(&self) -> OwnedArray<T> {
        OwnedArray::from_parts(self.to_vec(), self.shape.clone())
    }
}

/// Iterator over the storage offsets of a view in logical row-major order.
pub struct Offsets<'s> {
    shape: &'s [usize],
    strides: &'s [usize],
    index: Vec<usize>,
    offset: usize,
    remaining: usize,
}

impl<'s> Offsets<'s> {
    fn new(shape: &'s [usize], strides: &'s [usize]) -> Self {
        Self {
            shape,
            strides,
            index: vec![0; shape.len()],
            offset: 0,
            remaining: element_count(shape),
        }
    }
}

impl Iterator for Offsets<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.offset;
        self.remaining -= 1;

        // Odometer increment, last axis fastest.
        for axis in (0..self.shape.len()).rev() {
            self.index[axis] += 1;
            self.offset += self.strides[axis];
            if self.index[axis] < self.shape[axis] {
                break;
            }
            self.offset -= self.index[axis] * self.strides[axis];
            self.index[axis] = 0;
        }
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Offsets<'_> {}

#[cfg(test)]
mod tests {
    use super::ArrayView;
    use crate::MlHelpersError;

    #[test]
    fn offsets_follow_transposed_strides() {
        let mut data: Vec<i32> = (0..6).collect();
        let view = ArrayView::wrap_contiguous(&mut data, &[2, 3]).unwrap();
        let t = view.transposed(&[1, 0]).unwrap();
        assert_eq!(t.offsets().collect::<Vec<_>>(), vec![0, 3, 1, 4, 2, 5]);
        assert_eq!(t.offsets().len(), 6);
    }

    #[test]
    fn transposed_rejects_non_permutations() {
        let mut data = vec![0f32; 6];
        let view = ArrayView::wrap_contiguous(&mut data, &[2, 3]).unwrap();
        for order in [vec![0usize, 0], vec![0, 2], vec![1], vec![1, 0, 2]] {
            assert_eq!(
                view.transposed(&order).err().unwrap(),
                MlHelpersError::InvalidPermutation {
                    order: order.to_vec(),
                    rank: 2,
                }
            );
        }
    }

    #[test]
    fn wrap_rejects_short_buffers() {
        let mut data = vec![0f64; 5];
        let err = ArrayView::wrap(&mut data, &[2, 3], &[3, 1]).err().unwrap();
        assert_eq!(err, MlHelpersError::BufferTooSmall { needed: 6, got: 5 });
    }

    #[test]
    fn padded_strides_are_accepted() {
        let mut data: Vec<i32> = (0..8).collect();
        let view = ArrayView::wrap(&mut data, &[2, 3], &[4, 1]).unwrap();
        assert!(!view.is_contiguous());
        assert_eq!(view.to_vec(), vec![0, 1, 2, 4, 5, 6]);
    }

    #[test]
    fn zero_sized_dimensions_have_no_elements() {
        let mut data: Vec<f32> = Vec::new();
        let view = ArrayView::wrap_contiguous(&mut data, &[0, 4]).unwrap();
        assert_eq!(view.element_count(), 0);
        assert!(view.to_vec().is_empty());
    }
}
