use svd_compress::{ImageMode, RasterImage};

/// Bi-level image with a single "on" block; rank one, so it survives heavy truncation.
pub fn bi_level_block(rows: usize, cols: usize, margin: usize) -> RasterImage {
    assert!(rows > 2 * margin && cols > 2 * margin, "margin leaves no block");
    RasterImage::from_fn(rows, cols, ImageMode::BiLevel, |r, c| {
        let inside = r >= margin && r < rows - margin && c >= margin && c < cols - margin;
        if inside {
            255
        } else {
            0
        }
    })
    .expect("valid dimensions")
}

/// Grayscale image built from `rank` separable cosine patterns.
pub fn smooth_gray(rows: usize, cols: usize, rank: usize) -> RasterImage {
    assert!(rank > 0, "rank must be positive");
    RasterImage::from_fn(rows, cols, ImageMode::Grayscale, |r, c| {
        let mut v = 0.0f64;
        for i in 0..rank {
            let fr = (r as f64 * (i + 1) as f64 * 0.05).cos();
            let fc = (c as f64 * (i + 1) as f64 * 0.03).cos();
            v += fr * fc / (i + 1) as f64;
        }
        (128.0 + 60.0 * v).clamp(0.0, 255.0) as u8
    })
    .expect("valid dimensions")
}
