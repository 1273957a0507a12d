use serde::{Deserialize, Serialize};

use super::cycle::MAX_EVAL_DEPTH;
use super::expand::MAX_RANGE_CELLS;

/// Tunables for formula evaluation, usually read from `config.toml`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Report re-entrant references as `circular reference` errors instead of
    /// recursing until `max_depth` (or the stack) runs out.
    pub detect_cycles: bool,
    /// Largest number of cells a single range may expand to.
    pub max_range_cells: usize,
    /// Deepest chain of formula cells one evaluation may recurse through.
    /// `0` removes the limit.
    pub max_depth: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            detect_cycles: true,
            max_range_cells: MAX_RANGE_CELLS,
            max_depth: MAX_EVAL_DEPTH,
        }
    }
}
