//! Synthetic grayscale test images.
//!
//! The three examples cover the interesting regimes of a rank-truncated
//! codec: a rank-one rectangle, a rank-one gradient and full-rank noise.

use crate::error::Result;
use crate::image::io::save_raster;
use crate::image::{ImageMode, RasterImage};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::{Path, PathBuf};

/// Black `rows x cols` canvas with a white axis-aligned rectangle covering
/// rows `top..top+height` and columns `left..left+width`.
pub fn rectangle(
    rows: usize,
    cols: usize,
    top: usize,
    left: usize,
    height: usize,
    width: usize,
) -> Result<RasterImage> {
    RasterImage::from_fn(rows, cols, ImageMode::Grayscale, |r, c| {
        let inside = (top..top + height).contains(&r) && (left..left + width).contains(&c);
        if inside {
            u8::MAX
        } else {
            0
        }
    })
}

/// Rows ramp linearly from 0 (top) to 255 (bottom).
pub fn vertical_gradient(rows: usize, cols: usize) -> Result<RasterImage> {
    let denom = rows.saturating_sub(1).max(1);
    RasterImage::from_fn(rows, cols, ImageMode::Grayscale, |r, _| (r * 255 / denom) as u8)
}

/// Independent uniform pixels in `0..=255`, reproducible for a given seed.
pub fn uniform_noise(rows: usize, cols: usize, seed: u64) -> Result<RasterImage> {
    let mut rng = StdRng::seed_from_u64(seed);
    RasterImage::from_fn(rows, cols, ImageMode::Grayscale, |_, _| {
        rng.random_range(0..=u8::MAX)
    })
}

/// Write the three example images into `dir` as BMP files.
pub fn write_example_images(dir: &Path) -> Result<Vec<PathBuf>> {
    let examples = [
        ("example1.bmp", rectangle(100, 150, 30, 50, 40, 50)?),
        ("example2.bmp", vertical_gradient(120, 120)?),
        ("example3.bmp", uniform_noise(80, 80, 0)?),
    ];
    let mut paths = Vec::with_capacity(examples.len());
    for (name, image) in &examples {
        let path = dir.join(name);
        save_raster(image, &path)?;
        paths.push(path);
    }
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rectangle_covers_requested_area() {
        let img = rectangle(100, 150, 30, 50, 40, 50).unwrap();
        let lit = img.pixels().iter().filter(|&&p| p == 255).count();
        assert_eq!(lit, 40 * 50);
        assert_eq!(img.get(30, 50), 255);
        assert_eq!(img.get(69, 99), 255);
        assert_eq!(img.get(70, 99), 0);
        assert_eq!(img.get(30, 100), 0);
    }

    #[test]
    fn gradient_spans_full_range() {
        let img = vertical_gradient(120, 7).unwrap();
        assert_eq!(img.get(0, 3), 0);
        assert_eq!(img.get(119, 3), 255);
    }

    #[test]
    fn noise_is_seeded() {
        assert_eq!(uniform_noise(8, 8, 3).unwrap(), uniform_noise(8, 8, 3).unwrap());
        assert_ne!(uniform_noise(8, 8, 3).unwrap(), uniform_noise(8, 8, 4).unwrap());
    }
}
