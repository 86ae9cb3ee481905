//! I/O helpers for rasters, reports and JSON.
//!
//! - `load_raster`: read a BMP/PNG/PNM/TIFF into a [`RasterImage`] and detect its mode.
//! - `save_raster`: write a [`RasterImage`] as an 8-bit single-channel image.
//! - `write_json_file`: pretty-print a serializable value to disk.
//! - `write_text_file`: write a plain-text report to disk.
use super::{ImageMode, RasterImage};
use crate::error::{CodecError, Result};
use byteorder::{ByteOrder, LittleEndian};
use image::{
    DynamicImage, ExtendedColorType, GrayImage, ImageDecoder, ImageError, ImageFormat, ImageReader,
    Pixel,
};
use log::debug;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::Path;

/// Load an image from disk as a single-channel raster.
///
/// The mode follows the bit depth the file declares: 1-bit images (PBM,
/// bilevel TIFF, 1-bit PNG, 1-bit BMP) are bi-level, every other 8-bit
/// single-channel image is grayscale. Palette formats arrive from the
/// decoder as RGB(A) and are accepted when every pixel is opaque and
/// achromatic. Anything else is [`CodecError::UnsupportedMode`].
pub fn load_raster(path: &Path) -> Result<RasterImage> {
    let image_err = |source: ImageError| CodecError::Image {
        path: path.to_path_buf(),
        source,
    };
    let reader = ImageReader::open(path)
        .and_then(|r| r.with_guessed_format())
        .map_err(|e| image_err(ImageError::IoError(e)))?;
    let format = reader.format();
    let decoder = reader.into_decoder().map_err(image_err)?;
    let declared = decoder.original_color_type();
    let img = DynamicImage::from_decoder(decoder).map_err(image_err)?;

    let rows = img.height() as usize;
    let cols = img.width() as usize;
    let mut data = match img {
        DynamicImage::ImageLuma8(buf) => buf.into_raw(),
        DynamicImage::ImageRgb8(buf) => achromatic(buf.pixels().map(|p| p.to_rgba()), path)?,
        DynamicImage::ImageRgba8(buf) => achromatic(buf.pixels().copied(), path)?,
        other => {
            return Err(CodecError::UnsupportedMode(format!(
                "{:?} in {}",
                other.color(),
                path.display()
            )))
        }
    };
    let mode = if declares_bi_level(path, format, declared)? {
        for px in data.iter_mut() {
            *px = if *px > 127 { u8::MAX } else { 0 };
        }
        ImageMode::BiLevel
    } else {
        ImageMode::Grayscale
    };
    debug!("load_raster {}: {rows}x{cols} {mode} ({declared:?})", path.display());
    RasterImage::new(rows, cols, mode, data)
}

fn achromatic<I>(pixels: I, path: &Path) -> Result<Vec<u8>>
where
    I: Iterator<Item = image::Rgba<u8>>,
{
    let mut data = Vec::new();
    for px in pixels {
        let [r, g, b, a] = px.0;
        if r != g || g != b || a != u8::MAX {
            return Err(CodecError::UnsupportedMode(format!(
                "color image {}",
                path.display()
            )));
        }
        data.push(r);
    }
    Ok(data)
}

/// True when the file stores one bit per pixel.
///
/// PNM and TIFF decoders report `L1` themselves. The PNG decoder expands
/// low bit depths before reporting, so the PNG header is read with `png`;
/// the BMP decoder exposes no depth at all, so `biBitCount` is read directly.
fn declares_bi_level(
    path: &Path,
    format: Option<ImageFormat>,
    declared: ExtendedColorType,
) -> Result<bool> {
    if declared == ExtendedColorType::L1 {
        return Ok(true);
    }
    match format {
        Some(ImageFormat::Png) => png_is_one_bit(path),
        Some(ImageFormat::Bmp) => bmp_bit_count(path).map(|bits| bits == 1),
        _ => Ok(false),
    }
}

fn png_is_one_bit(path: &Path) -> Result<bool> {
    let mut decoder = png::Decoder::new(BufReader::new(File::open(path)?));
    let info = decoder.read_header_info().map_err(|e| {
        CodecError::InvalidImage(format!("PNG header of {}: {e}", path.display()))
    })?;
    Ok(info.bit_depth == png::BitDepth::One)
}

/// Offset of `biBitCount` in a BMP file (14-byte file header + 14 bytes of DIB header).
const BMP_BIT_COUNT_OFFSET: usize = 28;

fn bmp_bit_count(path: &Path) -> Result<u16> {
    let mut header = [0u8; BMP_BIT_COUNT_OFFSET + 2];
    File::open(path)?.read_exact(&mut header)?;
    Ok(LittleEndian::read_u16(&header[BMP_BIT_COUNT_OFFSET..]))
}

/// Save a raster as an 8-bit grayscale image; the format follows the extension.
pub fn save_raster(image: &RasterImage, path: &Path) -> Result<()> {
    ensure_parent_dir(path)?;
    let buffer = GrayImage::from_raw(
        image.cols() as u32,
        image.rows() as u32,
        image.pixels().to_vec(),
    )
    .ok_or_else(|| CodecError::InvalidImage("failed to create image buffer".to_string()))?;
    buffer.save(path).map_err(|source| CodecError::Image {
        path: path.to_path_buf(),
        source,
    })
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value).map_err(|e| {
        CodecError::Config(format!("failed to serialize JSON for {}: {e}", path.display()))
    })?;
    fs::write(path, json)?;
    Ok(())
}

/// Write a text report to `path`, creating parent directories.
pub fn write_text_file(path: &Path, contents: &str) -> Result<()> {
    ensure_parent_dir(path)?;
    fs::write(path, contents)?;
    Ok(())
}

pub(crate) fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
