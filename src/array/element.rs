//! Numeric element types accepted by array views.
//!
//! The set is closed: `f32`, `f64` and `i32`, matching the data types that
//! model runtimes emit for output tensors.

use std::cell::Cell;
use std::fmt;
use std::ops::{Add, Mul};

mod sealed {
    pub trait Sealed {}

    impl Sealed for f32 {}
    impl Sealed for f64 {}
    impl Sealed for i32 {}
}

/// Element type of a strided array.
///
/// Implementors support addition, multiplication, ordering and a clamped
/// conversion to an 8-bit pixel value.
pub trait Element:
    Copy
    + Default
    + PartialOrd
    + Add<Output = Self>
    + Mul<Output = Self>
    + fmt::Debug
    + fmt::Display
    + sealed::Sealed
    + 'static
{
    /// Computes `(self + offset) * scale`, clamps to `[0, 255]` and truncates.
    fn to_byte(self, offset: Self, scale: Self) -> u8;

    /// Converts a contiguous run of elements into bytes written every
    /// `dst_step` bytes of `dst`.
    ///
    /// `dst` must hold at least `(src.len() - 1) * dst_step + 1` bytes.
    fn convert_run(src: &[Cell<Self>], offset: Self, scale: Self, dst: &mut [u8], dst_step: usize) {
        for (i, value) in src.iter().enumerate() {
            dst[i * dst_step] = value.get().to_byte(offset, scale);
        }
    }
}

impl Element for f32 {
    #[inline]
    fn to_byte(self, offset: Self, scale: Self) -> u8 {
        ((self + offset) * scale).clamp(0.0, 255.0) as u8
    }

    #[cfg(feature = "simd")]
    fn convert_run(src: &[Cell<Self>], offset: Self, scale: Self, dst: &mut [u8], dst_step: usize) {
        crate::pixel::simd::convert_run_f32(src, offset, scale, dst, dst_step);
    }
}

impl Element for f64 {
    #[inline]
    fn to_byte(self, offset: Self, scale: Self) -> u8 {
        ((self + offset) * scale).clamp(0.0, 255.0) as u8
    }
}

impl Element for i32 {
    /// Integer arithmetic saturates instead of overflowing.
    #[inline]
    fn to_byte(self, offset: Self, scale: Self) -> u8 {
        self.saturating_add(offset)
            .saturating_mul(scale)
            .clamp(0, 255) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::Element;
    use std::cell::Cell;

    #[test]
    fn float_bytes_clamp_and_truncate() {
        assert_eq!(0.5f32.to_byte(0.0, 255.0), 127);
        assert_eq!((-1.0f32).to_byte(1.0, 127.5), 0);
        assert_eq!(1.0f32.to_byte(1.0, 127.5), 255);
        assert_eq!(2.0f64.to_byte(0.0, 255.0), 255);
        assert_eq!((-3.0f64).to_byte(0.0, 1.0), 0);
    }

    #[test]
    fn integer_bytes_saturate() {
        assert_eq!(12i32.to_byte(3, 2), 30);
        assert_eq!(i32::MAX.to_byte(1, 2), 255);
        assert_eq!(i32::MIN.to_byte(-1, 2), 0);
    }

    #[test]
    fn convert_run_honors_destination_step() {
        let src: Vec<Cell<f32>> = [0.0f32, 0.25, 0.5, 1.0].into_iter().map(Cell::new).collect();
        let mut dst = [9u8; 10];
        f32::convert_run(&src, 0.0, 255.0, &mut dst, 3);
        assert_eq!(dst, [0, 9, 9, 63, 9, 9, 127, 9, 9, 255]);
    }
}
