//! Search configuration

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::eval::ClobberHeuristic;

/// Default depth limit
pub const DEFAULT_DEPTH: usize = 4;

/// Default move count at which the depth limit is lifted
pub const DEFAULT_FULL_DEPTH_AFTER: u32 = 16;

/// Alpha-beta search configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Plies searched before falling back to the evaluator
    pub depth_limit: usize,
    /// Search to the end of the game once this many moves have been played
    pub full_depth_after: Option<u32>,
    /// Alpha-beta pruning (off gives exhaustive minimax)
    pub pruning: bool,
    /// Root-split worker count; 1 searches on the calling thread
    pub threads: usize,
    /// Shuffle seed (None = entropy)
    pub seed: Option<u64>,
    /// Clobber evaluator
    pub heuristic: ClobberHeuristic,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            depth_limit: DEFAULT_DEPTH,
            full_depth_after: Some(DEFAULT_FULL_DEPTH_AFTER),
            pruning: true,
            threads: 1,
            seed: None,
            heuristic: ClobberHeuristic::default(),
        }
    }
}

impl SearchConfig {
    /// Depth-limited search that never switches to full depth
    pub fn depth_limited(depth_limit: usize) -> Self {
        Self {
            depth_limit,
            full_depth_after: None,
            ..Default::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads.max(1);
        self
    }

    pub fn with_pruning(mut self, pruning: bool) -> Self {
        self.pruning = pruning;
        self
    }

    pub fn with_full_depth_after(mut self, moves: Option<u32>) -> Self {
        self.full_depth_after = moves;
        self
    }

    pub fn with_heuristic(mut self, heuristic: ClobberHeuristic) -> Self {
        self.heuristic = heuristic;
        self
    }

    /// Should a position with `num_moves` played be searched to the end?
    pub fn full_depth_for(&self, num_moves: u32) -> bool {
        self.full_depth_after.map_or(false, |after| num_moves >= after)
    }

    /// Load from JSON file; missing fields take their defaults
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read search config: {}", path.display()))?;
        let config: SearchConfig = serde_json::from_str(&content)
            .with_context(|| format!("Invalid search config: {}", path.display()))?;
        Ok(config)
    }

    /// Save to JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
