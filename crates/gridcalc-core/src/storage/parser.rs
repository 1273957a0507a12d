//! Parser for .grd file format

use crate::error::{GridcalcError, Result};
use gridcalc_engine::engine::{Cell, CellRef, Grid};
use std::fs;
use std::path::Path;

/// Largest sheet file we are willing to read.
pub const MAX_SHEET_FILE_BYTES: u64 = 16 * 1_048_576; // 16 MiB

/// Parse a .grd file and return a Grid
pub fn parse_grd(path: &Path) -> Result<Grid> {
    let meta = fs::metadata(path)?;
    if meta.len() > MAX_SHEET_FILE_BYTES {
        return Err(GridcalcError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!(
                "Refusing to read {}: sheet file too large ({} bytes, max {})",
                path.display(),
                meta.len(),
                MAX_SHEET_FILE_BYTES
            ),
        )));
    }
    let content = fs::read_to_string(path)?;
    parse_grd_content(&content)
}

/// Parse .grd content from a string
pub fn parse_grd_content(content: &str) -> Result<Grid> {
    let grid: Grid = std::sync::Arc::new(dashmap::DashMap::new());

    for (line_num, line) in content.lines().enumerate() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        // Parse "CELLREF: INPUT"; the input may itself contain ':' (ranges).
        let Some((cell_ref_str, input)) = line.split_once(':') else {
            return Err(GridcalcError::Parse {
                line: line_num + 1,
                message: "Expected 'CELLREF: INPUT' format".to_string(),
            });
        };

        let cell_ref_str = cell_ref_str.trim();
        let cell_ref = CellRef::parse(cell_ref_str).ok_or_else(|| GridcalcError::Parse {
            line: line_num + 1,
            message: format!("Invalid cell reference: {}", cell_ref_str),
        })?;

        grid.insert(cell_ref, Cell::new(&unescape_grd_text(input.trim())));
    }

    Ok(grid)
}

fn unescape_grd_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            match chars.next() {
                Some('\\') => out.push('\\'),
                Some('n') => out.push('\n'),
                Some('r') => out.push('\r'),
                Some(next) => {
                    out.push('\\');
                    out.push(next);
                }
                None => out.push('\\'),
            }
        } else {
            out.push(ch);
        }
    }
    out
}
