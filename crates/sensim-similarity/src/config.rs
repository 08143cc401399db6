//! Configuration for similarity calculations.

use serde::{Deserialize, Serialize};

pub use sensim_core::RedundantReactions;

/// When to fill result matrices on the rayon thread pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallelConfig {
    /// Allow parallel execution at all.
    pub enabled: bool,
    /// Minimum number of matrix cells before going parallel (below this,
    /// sequential is faster).
    pub min_cells_for_parallel: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_cells_for_parallel: 4,
        }
    }
}

impl ParallelConfig {
    /// Always run on the calling thread.
    pub fn sequential() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    pub fn with_min_cells(mut self, min: usize) -> Self {
        self.min_cells_for_parallel = min;
        self
    }

    /// Whether `cells` units of work should go to the thread pool.
    pub fn use_parallel(&self, cells: usize) -> bool {
        self.enabled && cells >= self.min_cells_for_parallel && rayon::current_num_threads() > 1
    }
}

/// Settings shared by `calculate_e` and the contribution decomposition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimilarityConfig {
    /// Reactions dropped before decomposing E into contributions. Empty by
    /// default, so the contributions of a pair add up to the E that
    /// `calculate_e` reports over all reactions. Set it to
    /// [`RedundantReactions::default`] to leave out the summed reactions.
    pub redundant_reactions: RedundantReactions,
    /// When to use the thread pool.
    pub parallel: ParallelConfig,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            redundant_reactions: RedundantReactions::none(),
            parallel: ParallelConfig::default(),
        }
    }
}

impl SimilarityConfig {
    pub fn with_redundant_reactions(mut self, redundant: RedundantReactions) -> Self {
        self.redundant_reactions = redundant;
        self
    }

    pub fn with_parallel(mut self, parallel: ParallelConfig) -> Self {
        self.parallel = parallel;
        self
    }
}
