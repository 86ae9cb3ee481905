//! Knobs for the compression path.

use serde::Deserialize;

/// How the rank-k factors are obtained.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum DecompositionStrategy {
    /// Full economy SVD, truncated afterwards.
    #[default]
    Full,
    /// Randomized range finder limited to `k + oversample` directions.
    Randomized {
        #[serde(default = "default_oversample")]
        oversample: usize,
        #[serde(default = "default_power_iterations")]
        power_iterations: usize,
        #[serde(default)]
        seed: u64,
    },
}

fn default_oversample() -> usize {
    10
}

fn default_power_iterations() -> usize {
    2
}

impl DecompositionStrategy {
    pub fn randomized(seed: u64) -> Self {
        DecompositionStrategy::Randomized {
            oversample: default_oversample(),
            power_iterations: default_power_iterations(),
            seed,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CompressOptions {
    pub strategy: DecompositionStrategy,
}

impl CompressOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strategy(mut self, strategy: DecompositionStrategy) -> Self {
        self.strategy = strategy;
        self
    }
}
