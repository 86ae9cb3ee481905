//! Rank selection against a compression budget.
//!
//! The predicted container size uses the same [`HEADER_BYTES`] the codec
//! writes, so a selected rank always honours the requested factor once
//! persisted.

use super::container::{FLOAT_BYTES, HEADER_BYTES};
use crate::error::{CodecError, Result};
use crate::image::ImageMode;
use log::debug;

/// Uncompressed size of a `rows x cols` image in bytes.
///
/// Bi-level images count as packed bits (`ceil(rows*cols / 8)`), grayscale as
/// one byte per pixel.
pub fn raw_size_bytes(mode: ImageMode, rows: usize, cols: usize) -> usize {
    match mode {
        ImageMode::BiLevel => (rows * cols).div_ceil(8),
        ImageMode::Grayscale => rows * cols,
    }
}

/// Exact byte length of a container holding a rank-`k` decomposition.
pub fn container_size(rows: usize, cols: usize, k: usize) -> usize {
    HEADER_BYTES + FLOAT_BYTES * (rows * k + k + cols * k)
}

/// Largest rank whose container fits in `raw_size / factor` bytes.
///
/// Candidates run from 1 up to `min(rows, cols) - 1`; the first candidate over
/// budget ends the search since the size grows with the rank.
pub fn select_rank(rows: usize, cols: usize, raw_size: usize, factor: f64) -> Result<usize> {
    if !factor.is_finite() || factor <= 0.0 {
        return Err(CodecError::InvalidFactor(factor));
    }
    let budget = raw_size as f64 / factor;
    let mut best = 0;
    for r in 1..rows.min(cols) {
        if container_size(rows, cols, r) as f64 <= budget {
            best = r;
        } else {
            break;
        }
    }
    debug!(
        "select_rank {rows}x{cols}: raw={raw_size} N={factor} budget={budget:.1} -> k={best}"
    );
    if best == 0 {
        return Err(CodecError::InfeasibleCompression { factor });
    }
    Ok(best)
}
