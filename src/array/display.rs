//! Nested-bracket rendering of array views for debugging.

use crate::array::{ArrayView, Element};
use std::fmt;

/// Elements printed per line before the innermost row wraps.
const WRAP_EVERY: usize = 11;

impl<T: Element> fmt::Display for ArrayView<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut index = Vec::with_capacity(self.rank());
        self.fmt_axis(f, &mut index)
    }
}

impl<T: Element> fmt::Debug for ArrayView<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrayView")
            .field("shape", &self.shape)
            .field("strides", &self.strides)
            .finish_non_exhaustive()
    }
}

impl<T: Element> ArrayView<'_, T> {
    fn fmt_axis(&self, f: &mut fmt::Formatter<'_>, index: &mut Vec<usize>) -> fmt::Result {
        let axis = index.len();
        let len = self.shape[axis];
        let indent = axis + 1;
        index.push(0);

        f.write_str("[")?;
        if axis + 1 < self.rank() {
            for i in 0..len {
                index[axis] = i;
                self.fmt_axis(f, index)?;
                if i + 1 != len {
                    write!(f, ",\n{:indent$}", "")?;
                }
            }
        } else {
            f.write_str(" ")?;
            for i in 0..len {
                index[axis] = i;
                write!(f, "{}", self.get(index.as_slice()))?;
                if i + 1 != len {
                    f.write_str(", ")?;
                    if i % WRAP_EVERY == WRAP_EVERY - 1 {
                        write!(f, "\n {:indent$}", "")?;
                    }
                }
            }
            f.write_str(" ")?;
        }
        index.pop();
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use crate::array::ArrayView;

    #[test]
    fn renders_nested_rows() {
        let mut data: Vec<i32> = (0..6).collect();
        let view = ArrayView::wrap_contiguous(&mut data, &[2, 3]).unwrap();
        assert_eq!(view.to_string(), "[[ 0, 1, 2 ],\n [ 3, 4, 5 ]]");
    }

    #[test]
    fn wraps_long_rows() {
        let mut data: Vec<i32> = (0..13).collect();
        let view = ArrayView::wrap_contiguous(&mut data, &[13]).unwrap();
        assert_eq!(
            view.to_string(),
            "[ 0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, \n  11, 12 ]"
        );
    }

    #[test]
    fn renders_transposed_order() {
        let mut data: Vec<i32> = (0..6).collect();
        let view = ArrayView::wrap_contiguous(&mut data, &[2, 3]).unwrap();
        let t = view.transposed(&[1, 0]).unwrap();
        assert_eq!(t.to_string(), "[[ 0, 3 ],\n [ 1, 4 ],\n [ 2, 5 ]]");
    }
}
