//! Compression and fidelity metrics.
//!
//! `psnr` follows the 8-bit convention `20 * log10(255 / sqrt(mse))` and is
//! `+inf` for identical images.

use crate::error::{CodecError, ErrorKind, Result};
use crate::image::RasterImage;
use serde::Serialize;

/// Peak pixel value for 8-bit images.
pub const PEAK: f64 = 255.0;

/// `raw_size / container_size`, where `container_size` is the persisted byte count.
pub fn compression_ratio(raw_size: usize, container_size: u64) -> f64 {
    raw_size as f64 / container_size as f64
}

/// Mean squared per-pixel difference between two equally shaped images.
pub fn mse(original: &RasterImage, reconstructed: &RasterImage) -> Result<f64> {
    if original.shape() != reconstructed.shape() {
        return Err(CodecError::ShapeMismatch {
            expected: original.shape(),
            actual: reconstructed.shape(),
        });
    }
    let sum: f64 = original
        .pixels()
        .iter()
        .zip(reconstructed.pixels())
        .map(|(&x, &y)| {
            let d = f64::from(x) - f64::from(y);
            d * d
        })
        .sum();
    Ok(sum / original.pixels().len() as f64)
}

/// Peak signal-to-noise ratio in dB; infinite when `mse == 0`.
pub fn psnr(mse: f64) -> f64 {
    if mse <= 0.0 {
        return f64::INFINITY;
    }
    20.0 * (PEAK / mse.sqrt()).log10()
}

/// Measurements of one successful (image, factor) run.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompressionStats {
    /// Rank stored in the container.
    pub k: usize,
    /// Raw image size in bytes (packed bits for bi-level).
    pub original_size: usize,
    /// Container size on disk.
    pub container_size: u64,
    pub ratio: f64,
    pub mse: f64,
    /// `+inf` serializes as `null`.
    pub psnr: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum Outcome {
    Compressed(CompressionStats),
    Failed { kind: ErrorKind, message: String },
}

/// Result record for one (image, target factor) combination.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsReport {
    pub image: String,
    pub factor: f64,
    pub outcome: Outcome,
}

impl MetricsReport {
    pub fn compressed(image: impl Into<String>, factor: f64, stats: CompressionStats) -> Self {
        Self {
            image: image.into(),
            factor,
            outcome: Outcome::Compressed(stats),
        }
    }

    pub fn failed(image: impl Into<String>, factor: f64, err: &CodecError) -> Self {
        Self {
            image: image.into(),
            factor,
            outcome: Outcome::Failed {
                kind: err.kind(),
                message: err.to_string(),
            },
        }
    }

    pub fn stats(&self) -> Option<&CompressionStats> {
        match &self.outcome {
            Outcome::Compressed(stats) => Some(stats),
            Outcome::Failed { .. } => None,
        }
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        match &self.outcome {
            Outcome::Compressed(_) => None,
            Outcome::Failed { kind, .. } => Some(*kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::ImageMode;
    use approx::assert_relative_eq;

    fn gray(rows: usize, cols: usize, f: impl FnMut(usize, usize) -> u8) -> RasterImage {
        RasterImage::from_fn(rows, cols, ImageMode::Grayscale, f).unwrap()
    }

    #[test]
    fn mse_of_identical_images_is_zero() {
        let img = gray(9, 13, |r, c| (r * 17 + c * 5) as u8);
        let m = mse(&img, &img).unwrap();
        assert_eq!(m, 0.0);
        assert!(psnr(m).is_infinite() && psnr(m) > 0.0);
    }

    #[test]
    fn mse_averages_squared_differences() {
        let a = gray(2, 2, |_, _| 10);
        let b = RasterImage::new(2, 2, ImageMode::Grayscale, vec![10, 12, 7, 10]).unwrap();
        assert_relative_eq!(mse(&a, &b).unwrap(), (4.0 + 9.0) / 4.0);
    }

    #[test]
    fn mse_rejects_mismatched_shapes() {
        let a = gray(3, 4, |_, _| 0);
        let b = gray(4, 3, |_, _| 0);
        match mse(&a, &b).unwrap_err() {
            CodecError::ShapeMismatch { expected, actual } => {
                assert_eq!(expected, (3, 4));
                assert_eq!(actual, (4, 3));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn psnr_reference_values() {
        assert_relative_eq!(psnr(1.0), 20.0 * 255f64.log10());
        assert_relative_eq!(psnr(PEAK * PEAK), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn ratio_uses_actual_container_size() {
        assert_relative_eq!(compression_ratio(15_000, 7_048), 15_000.0 / 7_048.0);
    }

    #[test]
    fn failed_report_carries_the_error_kind() {
        let err = CodecError::InfeasibleCompression { factor: 8.0 };
        let report = MetricsReport::failed("noise.bmp", 8.0, &err);
        assert_eq!(report.error_kind(), Some(ErrorKind::InfeasibleCompression));
        assert!(report.stats().is_none());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["outcome"]["status"], "failed");
        assert_eq!(json["outcome"]["kind"], "infeasibleCompression");
    }
}
