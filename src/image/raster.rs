//! Owned single-channel raster with an explicit bi-level/grayscale mode.
//!
//! Pixels are stored row-major. Bi-level images hold the
//! intensities 0 and 255 so that both modes share one value range.

use crate::codec::rank::raw_size_bytes;
use crate::error::{CodecError, Result};
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

/// Pixel interpretation of a single-channel image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImageMode {
    /// Two intensities only (0 = off, 255 = on).
    BiLevel,
    /// 8-bit intensities in `0..=255`.
    Grayscale,
}

impl ImageMode {
    /// Container `mode_flag` value.
    pub fn flag(self) -> u16 {
        match self {
            ImageMode::BiLevel => 0,
            ImageMode::Grayscale => 1,
        }
    }

    /// Inverse of [`ImageMode::flag`]; any non-zero flag reads as grayscale.
    pub fn from_flag(flag: u16) -> Self {
        if flag == 0 {
            ImageMode::BiLevel
        } else {
            ImageMode::Grayscale
        }
    }
}

impl std::fmt::Display for ImageMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageMode::BiLevel => f.write_str("bi-level"),
            ImageMode::Grayscale => f.write_str("grayscale"),
        }
    }
}

/// `rows * cols`, or [`CodecError::InvalidImage`] when it overflows `usize`.
pub fn pixel_count(rows: usize, cols: usize) -> Result<usize> {
    rows.checked_mul(cols).ok_or_else(|| {
        CodecError::InvalidImage(format!("{rows}x{cols} pixels overflow the address space"))
    })
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterImage {
    rows: usize,
    cols: usize,
    mode: ImageMode,
    data: Vec<u8>,
}

impl RasterImage {
    /// Wrap a row-major pixel buffer of `rows * cols` bytes.
    pub fn new(rows: usize, cols: usize, mode: ImageMode, data: Vec<u8>) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(CodecError::InvalidImage(format!(
                "dimensions must be positive, got {rows}x{cols}"
            )));
        }
        let count = pixel_count(rows, cols)?;
        if data.len() != count {
            return Err(CodecError::InvalidImage(format!(
                "expected {count} pixels for {rows}x{cols}, got {}",
                data.len()
            )));
        }
        Ok(Self {
            rows,
            cols,
            mode,
            data,
        })
    }

    /// Build an image by evaluating `f(row, col)` for every pixel.
    pub fn from_fn<F>(rows: usize, cols: usize, mode: ImageMode, mut f: F) -> Result<Self>
    where
        F: FnMut(usize, usize) -> u8,
    {
        let mut data = Vec::with_capacity(pixel_count(rows, cols)?);
        for r in 0..rows {
            for c in 0..cols {
                data.push(f(r, c));
            }
        }
        Self::new(rows, cols, mode, data)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn mode(&self) -> ImageMode {
        self.mode
    }

    /// `(rows, cols)`
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.data[row * self.cols + col]
    }

    pub fn pixels(&self) -> &[u8] {
        &self.data
    }

    /// Uncompressed size in bytes: packed bits for bi-level, one byte per pixel otherwise.
    pub fn raw_size(&self) -> usize {
        raw_size_bytes(self.mode, self.rows, self.cols)
    }

    /// Pixel matrix in double precision, as consumed by the decomposer.
    pub fn to_matrix(&self) -> DMatrix<f64> {
        DMatrix::from_fn(self.rows, self.cols, |r, c| f64::from(self.get(r, c)))
    }
}
