//! Cell data structures for the spreadsheet grid.
//!
//! - [`Cell`] - raw input plus the storage-owned result text
//! - [`Grid`] - thread-safe sparse storage for cells (backed by `DashMap`)
//! - [`CellSource`] - read-only input lookup the formula service evaluates against

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use super::cell_ref::CellRef;

/// A stored cell. `input` is either a bare literal or a formula starting with `=`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub input: String,
    /// Owned by the store; the engine never writes it.
    pub result: String,
}

impl Cell {
    pub fn new(input: &str) -> Cell {
        Cell {
            input: input.to_string(),
            result: String::new(),
        }
    }
}

/// Thread-safe sparse grid storage.
pub type Grid = Arc<DashMap<CellRef, Cell>>;

/// Read-only access to raw cell inputs within one sheet.
pub trait CellSource {
    /// Raw input of the cell, or None if no cell exists there.
    fn input(&self, cell: &CellRef) -> Option<String>;
}

impl CellSource for DashMap<CellRef, Cell> {
    fn input(&self, cell: &CellRef) -> Option<String> {
        self.get(cell).map(|entry| entry.input.clone())
    }
}

impl CellSource for HashMap<CellRef, String> {
    fn input(&self, cell: &CellRef) -> Option<String> {
        self.get(cell).cloned()
    }
}

impl<T: CellSource + ?Sized> CellSource for Arc<T> {
    fn input(&self, cell: &CellRef) -> Option<String> {
        (**self).input(cell)
    }
}
