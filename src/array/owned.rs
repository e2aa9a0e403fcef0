//! Owned contiguous arrays.

use crate::array::layout::{checked_element_count, row_major_strides, NdIndex};
use crate::array::{ArrayView, Element};
use crate::util::{MlHelpersError, MlHelpersResult};
use std::cell::Cell;

/// Owned row-major array buffer.
///
/// Views borrow the buffer mutably (`view`), so the array cannot be read
/// directly while any view derived from it is alive.
#[derive(Clone, Debug, PartialEq)]
pub struct OwnedArray<T> {
    data: Vec<T>,
    shape: Vec<usize>,
    strides: Vec<usize>,
}

impl<T: Element> OwnedArray<T> {
    /// Creates a zero-filled array.
    pub fn zeros(shape: &[usize]) -> MlHelpersResult<Self> {
        Self::filled(shape, T::default())
    }

    /// Creates an array with every element set to `value`.
    pub fn filled(shape: &[usize], value: T) -> MlHelpersResult<Self> {
        let count = checked_element_count(shape)?;
        Ok(Self::from_parts(vec![value; count], shape.to_vec()))
    }

    /// Takes ownership of a row-major buffer.
    pub fn from_vec(data: Vec<T>, shape: &[usize]) -> MlHelpersResult<Self> {
        let needed = checked_element_count(shape)?;
        if data.len() < needed {
            return Err(MlHelpersError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        if data.len() > needed {
            return Err(MlHelpersError::ShapeMismatch {
                from: vec![data.len()],
                to: shape.to_vec(),
            });
        }
        Ok(Self::from_parts(data, shape.to_vec()))
    }

    pub(crate) fn from_parts(data: Vec<T>, shape: Vec<usize>) -> Self {
        let strides = row_major_strides(&shape);
        Self {
            data,
            shape,
            strides,
        }
    }

    /// Returns the dimension sizes.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Returns the row-major strides.
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    /// Returns the number of elements.
    pub fn element_count(&self) -> usize {
        self.data.len()
    }

    /// Returns the elements in row-major order.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Returns the elements in row-major order for in-place filling.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consumes the array and returns its buffer.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Reads the element at `index`; panics past the end of the buffer.
    pub fn get<I: NdIndex>(&self, index: I) -> T {
        self.data[index.offset(&self.strides)]
    }

    /// Writes the element at `index`; panics past the end of the buffer.
    pub fn set<I: NdIndex>(&mut self, index: I, value: T) {
        let offset = index.offset(&self.strides);
        self.data[offset] = value;
    }

    /// Returns a row-major view over this buffer.
    pub fn view(&mut self) -> ArrayView<'_, T> {
        ArrayView {
            data: Cell::from_mut(self.data.as_mut_slice()).as_slice_of_cells(),
            shape: self.shape.clone(),
            strides: self.strides.clone(),
        }
    }
}
