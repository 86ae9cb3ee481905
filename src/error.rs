//! Error type shared by every stage of the codec.
//!
//! Each failure category is a distinct variant so callers (notably the batch
//! runner) can match on the kind instead of inspecting message text.
//! [`CodecError::kind`] exposes a fieldless tag suitable for reports.

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CodecError>;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("unsupported image mode: {0} (expected bi-level or 8-bit grayscale)")]
    UnsupportedMode(String),

    #[error("N={factor} is too large, no rank >= 1 fits the compression budget")]
    InfeasibleCompression { factor: f64 },

    #[error("invalid compression factor {0}: must be finite and > 0")]
    InvalidFactor(f64),

    #[error("invalid container format: magic {found:?} != \"SVDC\"")]
    InvalidFormat { found: [u8; 4] },

    #[error("container truncated while reading {section}: requested {requested} bytes, {available} available")]
    Truncated {
        section: &'static str,
        requested: usize,
        available: usize,
    },

    #[error("rank {rank} outside 1..=min({rows}, {cols})")]
    InvalidRank {
        rank: usize,
        rows: usize,
        cols: usize,
    },

    #[error("shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("invalid image: {0}")]
    InvalidImage(String),

    #[error("decomposition failed: {0}")]
    Decomposition(String),

    #[error("failed to decode or encode {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Failure category of a [`CodecError`], without its payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    UnsupportedMode,
    InfeasibleCompression,
    InvalidFactor,
    InvalidFormat,
    Truncated,
    InvalidRank,
    ShapeMismatch,
    InvalidImage,
    Decomposition,
    Image,
    Config,
    Io,
}

impl CodecError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CodecError::UnsupportedMode(_) => ErrorKind::UnsupportedMode,
            CodecError::InfeasibleCompression { .. } => ErrorKind::InfeasibleCompression,
            CodecError::InvalidFactor(_) => ErrorKind::InvalidFactor,
            CodecError::InvalidFormat { .. } => ErrorKind::InvalidFormat,
            CodecError::Truncated { .. } => ErrorKind::Truncated,
            CodecError::InvalidRank { .. } => ErrorKind::InvalidRank,
            CodecError::ShapeMismatch { .. } => ErrorKind::ShapeMismatch,
            CodecError::InvalidImage(_) => ErrorKind::InvalidImage,
            CodecError::Decomposition(_) => ErrorKind::Decomposition,
            CodecError::Image { .. } => ErrorKind::Image,
            CodecError::Config(_) => ErrorKind::Config,
            CodecError::Io(_) => ErrorKind::Io,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infeasible_message_names_the_factor() {
        let err = CodecError::InfeasibleCompression { factor: 16.0 };
        assert_eq!(err.kind(), ErrorKind::InfeasibleCompression);
        assert!(err.to_string().contains("N=16"), "message: {err}");
    }

    #[test]
    fn rank_message_names_the_bound() {
        let err = CodecError::InvalidRank {
            rank: 0,
            rows: 4,
            cols: 6,
        };
        assert_eq!(err.kind(), ErrorKind::InvalidRank);
        assert_eq!(err.to_string(), "rank 0 outside 1..=min(4, 6)");
    }

    #[test]
    fn io_errors_convert_transparently() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.svc");
        let err: CodecError = io.into();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert_eq!(err.to_string(), "missing.svc");
    }
}
