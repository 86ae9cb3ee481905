//! Single-channel rasters and their on-disk I/O.

pub mod io;
pub mod raster;

pub use self::raster::{ImageMode, RasterImage};
