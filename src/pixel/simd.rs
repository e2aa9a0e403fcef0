//! SIMD pixel conversion using the `wide` crate.
//!
//! Processes eight `f32` elements per step with `f32x8`. The float-to-byte
//! cast saturates (NaN maps to 0), so lanes match the scalar
//! `clamp(..) as u8` path exactly.

use std::cell::Cell;
use wide::f32x8;

const LANES: usize = 8;

/// Load 8 cells into f32x8.
#[inline]
fn load_f32x8(cells: &[Cell<f32>]) -> f32x8 {
    f32x8::from(std::array::from_fn::<f32, LANES, _>(|i| cells[i].get()))
}

/// Converts a contiguous run of `f32` cells into bytes spaced `dst_step` apart.
pub(crate) fn convert_run_f32(
    src: &[Cell<f32>],
    offset: f32,
    scale: f32,
    dst: &mut [u8],
    dst_step: usize,
) {
    let offset_v = f32x8::splat(offset);
    let scale_v = f32x8::splat(scale);
    let simd_end = src.len() / LANES * LANES;

    for (chunk_idx, chunk) in src[..simd_end].chunks_exact(LANES).enumerate() {
        let scaled = (load_f32x8(chunk) + offset_v) * scale_v;
        let base = chunk_idx * LANES;
        for (lane, value) in scaled.to_array().into_iter().enumerate() {
            dst[(base + lane) * dst_step] = value as u8;
        }
    }

    for (i, value) in src.iter().enumerate().skip(simd_end) {
        dst[i * dst_step] = ((value.get() + offset) * scale).clamp(0.0, 255.0) as u8;
    }
}
