//! `SVDC` container: a fixed little-endian header followed by the raw `f32`
//! factors.
//!
//! ```text
//! magic    [u8; 4]   "SVDC"
//! version  u16       FORMAT_VERSION
//! mode     u16       0 = bi-level, 1 = grayscale
//! rows     u32
//! cols     u32
//! k        u32
//! U        f32 * rows*k   row-major
//! S        f32 * k        descending
//! V        f32 * cols*k   row-major
//! ```
//!
//! There is no padding and no payload checksum. Decoding checks the magic
//! before anything else and rejects a rank outside `1..=min(rows, cols)`
//! before reading the payload; trailing bytes after `V` are ignored.

use super::decompose::TruncatedDecomposition;
use super::rank::container_size;
use crate::error::{CodecError, Result};
use crate::image::raster::pixel_count;
use crate::image::ImageMode;
use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};
use log::{debug, warn};
use nalgebra::{DMatrix, DVector};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::mem::size_of;
use std::path::Path;

pub const MAGIC: [u8; 4] = *b"SVDC";
pub const FORMAT_VERSION: u16 = 1;
/// Bytes per stored factor element.
pub const FLOAT_BYTES: usize = size_of::<f32>();
/// Bytes preceding the float payload: magic, version, mode, rows, cols, k.
pub const HEADER_BYTES: usize = MAGIC.len() + 2 * size_of::<u16>() + 3 * size_of::<u32>();

/// Persisted form of a [`TruncatedDecomposition`].
#[derive(Clone, Debug, PartialEq)]
pub struct Container {
    version: u16,
    mode: ImageMode,
    decomposition: TruncatedDecomposition,
}

impl Container {
    pub fn new(mode: ImageMode, decomposition: TruncatedDecomposition) -> Self {
        Self {
            version: FORMAT_VERSION,
            mode,
            decomposition,
        }
    }

    pub fn version(&self) -> u16 {
        self.version
    }

    pub fn mode(&self) -> ImageMode {
        self.mode
    }

    pub fn rows(&self) -> usize {
        self.decomposition.rows()
    }

    pub fn cols(&self) -> usize {
        self.decomposition.cols()
    }

    pub fn rank(&self) -> usize {
        self.decomposition.rank()
    }

    pub fn decomposition(&self) -> &TruncatedDecomposition {
        &self.decomposition
    }

    /// Encoded length in bytes.
    pub fn byte_len(&self) -> usize {
        container_size(self.rows(), self.cols(), self.rank())
    }

    /// Serialize into `writer` in the fixed field order.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        let d = &self.decomposition;
        writer.write_all(&MAGIC)?;
        writer.write_u16::<LittleEndian>(self.version)?;
        writer.write_u16::<LittleEndian>(self.mode.flag())?;
        writer.write_u32::<LittleEndian>(header_u32("rows", d.rows())?)?;
        writer.write_u32::<LittleEndian>(header_u32("cols", d.cols())?)?;
        writer.write_u32::<LittleEndian>(header_u32("k", d.rank())?)?;
        write_row_major(writer, d.u())?;
        for &x in d.s().iter() {
            writer.write_f32::<LittleEndian>(x)?;
        }
        write_row_major(writer, d.v())?;
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(self.byte_len());
        self.write_to(&mut out)?;
        Ok(out)
    }

    /// Decode a container from an in-memory buffer.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut reader = SectionReader::new(bytes);

        let magic = reader.take("magic", MAGIC.len())?;
        if magic != MAGIC {
            let mut found = [0u8; 4];
            found.copy_from_slice(magic);
            return Err(CodecError::InvalidFormat { found });
        }

        let version = LittleEndian::read_u16(reader.take("version", 2)?);
        if version != FORMAT_VERSION {
            warn!("container version {version} (expected {FORMAT_VERSION}), decoding anyway");
        }
        let mode = ImageMode::from_flag(LittleEndian::read_u16(reader.take("mode", 2)?));
        let rows = LittleEndian::read_u32(reader.take("rows", 4)?) as usize;
        let cols = LittleEndian::read_u32(reader.take("cols", 4)?) as usize;
        let k = LittleEndian::read_u32(reader.take("k", 4)?) as usize;
        debug!("container header: v{version} {mode} {rows}x{cols} k={k}");
        if k == 0 || k > rows.min(cols) {
            return Err(CodecError::InvalidRank { rank: k, rows, cols });
        }
        pixel_count(rows, cols)?;

        let u = reader.floats("U", rows, k)?;
        let s = reader.floats("S", k, 1)?;
        let v = reader.floats("V", cols, k)?;

        let decomposition = TruncatedDecomposition::new(
            DMatrix::from_row_slice(rows, k, &u),
            DVector::from_vec(s),
            DMatrix::from_row_slice(cols, k, &v),
        )?;
        Ok(Self {
            version,
            mode,
            decomposition,
        })
    }

    /// Write to `path` and return the number of bytes persisted.
    pub fn write_file(&self, path: &Path) -> Result<u64> {
        crate::image::io::ensure_parent_dir(path)?;
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(&mut writer)?;
        writer.flush()?;
        drop(writer);
        Ok(fs::metadata(path)?.len())
    }

    /// Read a whole container file.
    pub fn read_file(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)?;
        Self::from_bytes(&bytes)
    }
}

fn header_u32(field: &str, value: usize) -> Result<u32> {
    u32::try_from(value).map_err(|_| {
        CodecError::InvalidImage(format!("{field}={value} does not fit the u32 header field"))
    })
}

fn write_row_major<W: Write>(writer: &mut W, m: &DMatrix<f32>) -> Result<()> {
    for r in 0..m.nrows() {
        for &x in m.row(r).iter() {
            writer.write_f32::<LittleEndian>(x)?;
        }
    }
    Ok(())
}

/// Cursor handing out named, length-checked slices of the input.
struct SectionReader<'a> {
    buf: &'a [u8],
}

impl<'a> SectionReader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    fn take(&mut self, section: &'static str, len: usize) -> Result<&'a [u8]> {
        if self.buf.len() < len {
            return Err(CodecError::Truncated {
                section,
                requested: len,
                available: self.buf.len(),
            });
        }
        let (head, tail) = self.buf.split_at(len);
        self.buf = tail;
        Ok(head)
    }

    /// `rows * cols` floats in file order.
    fn floats(&mut self, section: &'static str, rows: usize, cols: usize) -> Result<Vec<f32>> {
        let count = rows.checked_mul(cols);
        let len = count.and_then(|n| n.checked_mul(FLOAT_BYTES));
        let (count, len) = match (count, len) {
            (Some(count), Some(len)) => (count, len),
            _ => {
                return Err(CodecError::Truncated {
                    section,
                    requested: usize::MAX,
                    available: self.buf.len(),
                })
            }
        };
        let bytes = self.take(section, len)?;
        let mut out = vec![0f32; count];
        LittleEndian::read_f32_into(bytes, &mut out);
        Ok(out)
    }
}
