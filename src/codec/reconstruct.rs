//! Recombination of the stored factors and per-mode quantization.

use super::container::Container;
use super::decompose::TruncatedDecomposition;
use crate::error::{CodecError, Result};
use crate::image::raster::pixel_count;
use crate::image::{ImageMode, RasterImage};
use nalgebra::DMatrix;

/// Bi-level pixels strictly above this become 255, the rest 0.
pub const BI_LEVEL_THRESHOLD: f32 = 127.0;

/// `U * diag(S) * V^T` in `f32`, shaped `rows x cols`.
pub fn reconstruct(d: &TruncatedDecomposition) -> DMatrix<f32> {
    let mut scaled = d.u().clone();
    for (mut col, &sigma) in scaled.column_iter_mut().zip(d.s().iter()) {
        col *= sigma;
    }
    scaled * d.v().transpose()
}

/// Map reconstructed intensities back to 8-bit pixels for `mode`.
pub fn quantize(matrix: &DMatrix<f32>, mode: ImageMode) -> Result<RasterImage> {
    let (rows, cols) = matrix.shape();
    RasterImage::from_fn(rows, cols, mode, |r, c| quantize_pixel(matrix[(r, c)], mode))
}

#[inline]
fn quantize_pixel(value: f32, mode: ImageMode) -> u8 {
    match mode {
        ImageMode::BiLevel => {
            if value > BI_LEVEL_THRESHOLD {
                u8::MAX
            } else {
                0
            }
        }
        ImageMode::Grayscale => value.clamp(0.0, 255.0).round() as u8,
    }
}

/// Decode a container into an image of the header's shape and mode.
///
/// Rows are recombined and quantized one at a time, so only the 8-bit output
/// is held in full; its buffer is reserved up front and a header whose
/// pixel count cannot be allocated fails with [`CodecError::InvalidImage`].
pub fn reconstruct_image(container: &Container) -> Result<RasterImage> {
    let d = container.decomposition();
    let mode = container.mode();
    let (rows, cols) = (d.rows(), d.cols());
    let count = pixel_count(rows, cols)?;
    let mut data = Vec::new();
    data.try_reserve_exact(count).map_err(|e| {
        CodecError::InvalidImage(format!("cannot allocate {rows}x{cols} pixels: {e}"))
    })?;

    let mut sv_t = d.v().transpose();
    for (mut row, &sigma) in sv_t.row_iter_mut().zip(d.s().iter()) {
        row *= sigma;
    }
    for r in 0..rows {
        let values = d.u().row(r) * &sv_t;
        data.extend(values.iter().map(|&x| quantize_pixel(x, mode)));
    }
    RasterImage::new(rows, cols, mode, data)
}
