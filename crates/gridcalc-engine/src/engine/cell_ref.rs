//! Cell reference parsing and formatting.
//!
//! Formulas address cells with a single uppercase column letter followed by
//! the row digits, taken verbatim (no 1-based shift):
//!
//! ```
//! use gridcalc_engine::engine::CellRef;
//!
//! let cell: CellRef = "B3".parse().unwrap();
//! assert_eq!(cell.col, 1);
//! assert_eq!(cell.row, 3);
//! assert_eq!(cell.to_string(), "B3");
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Number of addressable columns (`A` through `Z`).
pub const MAX_COLS: usize = 26;

/// A reference to a cell by zero-based column and row.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct CellRef {
    pub row: usize,
    pub col: usize,
}

impl CellRef {
    pub fn new(row: usize, col: usize) -> CellRef {
        CellRef { row, col }
    }

    /// Parse a reference such as `A1` or `Z120`.
    /// Returns None for lowercase letters, multi-letter columns or row overflow.
    pub fn parse(name: &str) -> Option<CellRef> {
        let caps = cell_ref_re().captures(name)?;
        let col = (caps["col"].as_bytes()[0] - b'A') as usize;
        let row = caps["row"].parse::<usize>().ok()?;
        Some(CellRef::new(row, col))
    }

    /// Column letter for an index in `0..26`.
    pub fn col_letter(col: usize) -> Option<char> {
        (col < MAX_COLS).then(|| (b'A' + col as u8) as char)
    }
}

fn cell_ref_re() -> &'static Regex {
    static CELL_RE: OnceLock<Regex> = OnceLock::new();
    CELL_RE.get_or_init(|| {
        Regex::new(r"^(?<col>[A-Z])(?<row>[0-9]+)$").expect("cell reference regex must compile")
    })
}

impl std::str::FromStr for CellRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid cell reference: {}", s))
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match CellRef::col_letter(self.col) {
            Some(letter) => write!(f, "{}{}", letter, self.row),
            None => write!(f, "C{}R{}", self.col, self.row),
        }
    }
}
