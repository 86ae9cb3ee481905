//! Per-call compression, decompression and evaluation.
//!
//! Each call is synchronous and fails as a whole; isolation across many
//! (image, factor) combinations lives in [`batch`].

pub mod batch;
pub mod reporting;

use crate::codec::{
    container_size, decompose_rank, reconstruct_image, select_rank, CompressOptions, Container,
};
use crate::error::Result;
use crate::image::io::save_raster;
use crate::image::RasterImage;
use crate::metrics::{compression_ratio, mse, psnr, CompressionStats};
use log::{debug, warn};
use std::path::{Path, PathBuf};
use std::time::Instant;

pub use self::batch::run_batch;
pub use self::reporting::{results_lines, summary_table};

/// Sizes recorded when a container is written to disk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompressionSummary {
    pub k: usize,
    pub raw_size: usize,
    pub container_size: u64,
}

/// Select the rank for `factor`, decompose and wrap the factors in a container.
pub fn compress(image: &RasterImage, factor: f64, options: &CompressOptions) -> Result<Container> {
    let start = Instant::now();
    let (rows, cols) = image.shape();
    let k = select_rank(rows, cols, image.raw_size(), factor)?;
    let decomposition = decompose_rank(&image.to_matrix(), k, options.strategy)?;
    debug!(
        "compress {rows}x{cols} {} N={factor}: k={k} in {:.3} ms",
        image.mode(),
        start.elapsed().as_secs_f64() * 1000.0
    );
    Ok(Container::new(image.mode(), decomposition))
}

/// [`compress`] and persist the container at `path`.
pub fn compress_to_file(
    image: &RasterImage,
    factor: f64,
    options: &CompressOptions,
    path: &Path,
) -> Result<CompressionSummary> {
    let container = compress(image, factor, options)?;
    let written = container.write_file(path)?;
    let predicted = container_size(container.rows(), container.cols(), container.rank());
    if written != predicted as u64 {
        warn!(
            "{}: wrote {written} bytes, rank budget predicted {predicted}",
            path.display()
        );
    }
    Ok(CompressionSummary {
        k: container.rank(),
        raw_size: image.raw_size(),
        container_size: written,
    })
}

/// Reconstruct an image from an in-memory container.
pub fn decompress(container: &Container) -> Result<RasterImage> {
    reconstruct_image(container)
}

/// Read a container file and reconstruct its image.
pub fn decompress_file(path: &Path) -> Result<RasterImage> {
    decompress(&Container::read_file(path)?)
}

/// Artifact paths for one (image, factor) combination.
pub fn artifact_paths(out_dir: &Path, stem: &str, factor: f64) -> (PathBuf, PathBuf) {
    (
        out_dir.join(format!("{stem}_N{factor}.svc")),
        out_dir.join(format!("{stem}_N{factor}_reconstructed.bmp")),
    )
}

/// Compress `image` into `out_dir`, decode the written container, save the
/// reconstruction and measure it against the original.
pub fn evaluate(
    image: &RasterImage,
    stem: &str,
    factor: f64,
    options: &CompressOptions,
    out_dir: &Path,
) -> Result<CompressionStats> {
    let (container_path, reconstructed_path) = artifact_paths(out_dir, stem, factor);
    let summary = compress_to_file(image, factor, options, &container_path)?;
    let reconstructed = decompress_file(&container_path)?;
    save_raster(&reconstructed, &reconstructed_path)?;

    let mse = mse(image, &reconstructed)?;
    Ok(CompressionStats {
        k: summary.k,
        original_size: summary.raw_size,
        container_size: summary.container_size,
        ratio: compression_ratio(summary.raw_size, summary.container_size),
        mse,
        psnr: psnr(mse),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::image::ImageMode;
    use crate::synthetic;

    #[test]
    fn compress_picks_budget_rank() {
        let img = synthetic::rectangle(100, 150, 30, 50, 40, 50).unwrap();
        let c = compress(&img, 2.0, &CompressOptions::default()).unwrap();
        assert_eq!(c.rank(), 7);
        assert_eq!((c.rows(), c.cols()), (100, 150));
        assert_eq!(c.mode(), ImageMode::Grayscale);
    }

    #[test]
    fn infeasible_factor_propagates() {
        let img = synthetic::uniform_noise(20, 20, 1).unwrap();
        let err = compress(&img, 10.0, &CompressOptions::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InfeasibleCompression);
    }

    #[test]
    fn evaluate_writes_artifacts_and_meets_factor() {
        let dir = tempfile::tempdir().unwrap();
        let img = synthetic::vertical_gradient(60, 40).unwrap();
        let stats = evaluate(&img, "ramp", 4.0, &CompressOptions::default(), dir.path()).unwrap();
        let (svc, bmp) = artifact_paths(dir.path(), "ramp", 4.0);
        assert!(svc.ends_with("ramp_N4.svc"));
        assert!(bmp.exists());
        assert_eq!(std::fs::metadata(&svc).unwrap().len(), stats.container_size);
        assert!(stats.ratio >= 4.0, "ratio {}", stats.ratio);
        // A vertical ramp is rank one; rounding is the only loss.
        assert!(stats.mse <= 0.5, "mse {}", stats.mse);
    }

    #[test]
    fn decompress_file_rejects_foreign_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not_a_container.svc");
        std::fs::write(&path, b"BM\x00\x00 definitely not svd").unwrap();
        let err = decompress_file(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidFormat);
    }
}
