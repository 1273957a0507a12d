//! Writer for .grd file format

use crate::error::Result;
use gridcalc_engine::engine::Grid;
use std::fs;
use std::path::Path;

/// Write a Grid to a .grd file
pub fn write_grd(path: &Path, grid: &Grid) -> Result<()> {
    let content = write_grd_content(grid);
    fs::write(path, content)?;
    Ok(())
}

/// Write a Grid to a .grd format string
pub fn write_grd_content(grid: &Grid) -> String {
    let mut lines = vec!["# gridcalc sheet".to_string()];

    // Collect and sort cells by position for consistent output
    let mut cells: Vec<_> = grid
        .iter()
        .map(|entry| (*entry.key(), entry.value().input.clone()))
        .collect();
    cells.sort_by_key(|(cell_ref, _)| *cell_ref);

    for (cell_ref, input) in cells {
        lines.push(format!("{}: {}", cell_ref, escape_grd_text(&input)));
    }

    lines.join("\n") + "\n"
}

/// Keep each cell on one line: line breaks and backslashes become escapes.
fn escape_grd_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(ch),
        }
    }
    out
}
