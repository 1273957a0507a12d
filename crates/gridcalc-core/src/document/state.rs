use gridcalc_engine::engine::{CellRef, EngineConfig, Grid};
use std::path::PathBuf;

/// A cell as presented to callers: stored input plus a freshly computed result.
#[derive(Clone, Debug, PartialEq)]
pub struct CellView {
    pub cell: CellRef,
    pub input: String,
    pub result: String,
}

/// In-memory sheet document.
pub struct Document {
    /// The sheet grid (DashMap behind an Arc, clones are cheap)
    pub grid: Grid,
    /// Settings used for every evaluation
    pub config: EngineConfig,
    /// Current file path
    pub file_path: Option<PathBuf>,
    /// Whether the grid has been modified since load/save
    pub modified: bool,
}

impl Document {
    /// Create an empty document.
    ///
    /// This constructor is side-effect free: it does not touch the filesystem.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Document {
            grid: std::sync::Arc::new(dashmap::DashMap::new()),
            config,
            file_path: None,
            modified: false,
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
