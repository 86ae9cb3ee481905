//! Lossy compression of single-channel raster images by truncated SVD.
//!
//! An image's pixel matrix is factored as `U * diag(S) * V^T`; only the
//! largest `k` components that fit the requested compression factor are kept
//! and written to an `SVDC` container. Decoding recombines the factors and
//! quantizes them back to bi-level or 8-bit grayscale pixels.

// Public modules (stable-ish surface)
pub mod codec;
pub mod error;
pub mod image;
pub mod metrics;
pub mod pipeline;

// Tooling support used by the binaries and tests.
pub mod config;
pub mod synthetic;

// --- High-level re-exports -------------------------------------------------

pub use crate::codec::{CompressOptions, Container, DecompositionStrategy, TruncatedDecomposition};
pub use crate::error::{CodecError, ErrorKind, Result};
pub use crate::image::{ImageMode, RasterImage};
pub use crate::metrics::{CompressionStats, MetricsReport};
pub use crate::pipeline::{compress, compress_to_file, decompress, decompress_file, evaluate};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use svd_compress::prelude::*;
/// use std::path::Path;
///
/// # fn main() -> Result<(), CodecError> {
/// let image = load_raster(Path::new("images/example1.bmp"))?;
/// let container = compress(&image, 4.0, &CompressOptions::default())?;
/// let restored = decompress(&container)?;
/// let psnr = psnr(mse(&image, &restored)?);
/// println!("k={} psnr={psnr:.2} dB", container.rank());
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::image::io::{load_raster, save_raster};
    pub use crate::metrics::{compression_ratio, mse, psnr};
    pub use crate::{compress, decompress, CodecError, CompressOptions, ImageMode, RasterImage};
}
