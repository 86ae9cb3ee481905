//! Rank selection, decomposition, container codec and reconstruction.
//!
//! The stages run in this order on compression:
//! [`rank::select_rank`] → [`decompose::decompose_rank`] → [`Container::write_to`];
//! and on decompression: [`Container::from_bytes`] → [`reconstruct::reconstruct_image`].

pub mod container;
pub mod decompose;
pub mod options;
pub mod rank;
pub mod reconstruct;

pub use self::container::{Container, FORMAT_VERSION, HEADER_BYTES, MAGIC};
pub use self::decompose::{
    decompose, decompose_rank, truncate, FullDecomposition, TruncatedDecomposition,
};
pub use self::options::{CompressOptions, DecompositionStrategy};
pub use self::rank::{container_size, raw_size_bytes, select_rank};
pub use self::reconstruct::{quantize, reconstruct, reconstruct_image};
