use super::Document;
use crate::error::{GridcalcError, Result};
use crate::storage::{parse_grd, write_grd};
use gridcalc_engine::engine::EngineConfig;
use std::path::{Path, PathBuf};
use tracing::info;

impl Document {
    /// Create a document and load a file if provided.
    /// A path that does not exist yet is remembered for a later save.
    pub fn with_file(path: Option<PathBuf>, config: EngineConfig) -> Result<Self> {
        let mut core = Self::with_config(config);
        if let Some(ref p) = path {
            if p.exists() {
                core.load_file(p)?;
            } else {
                core.file_path = Some(p.clone());
                core.modified = false;
            }
        }
        Ok(core)
    }

    /// Save to current file path.
    /// Returns the path saved to.
    pub fn save_file(&mut self) -> Result<PathBuf> {
        let Some(path) = &self.file_path else {
            return Err(GridcalcError::NoFilePath);
        };

        write_grd(path, &self.grid)?;
        self.modified = false;
        info!(path = %path.display(), cells = self.grid.len(), "sheet saved");
        Ok(path.clone())
    }

    /// Load from file, replacing the whole grid. Nothing changes on error.
    pub fn load_file(&mut self, path: &Path) -> Result<()> {
        let grid = parse_grd(path)?;
        info!(path = %path.display(), cells = grid.len(), "sheet loaded");

        self.grid = grid;
        self.file_path = Some(path.to_path_buf());
        self.modified = false;
        Ok(())
    }
}
