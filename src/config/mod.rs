//! JSON configuration for the command-line tools.

pub mod batch;

pub use self::batch::{load_config, BatchConfig, BatchOutputConfig};
