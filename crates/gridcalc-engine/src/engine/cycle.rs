//! Circular reference guard for re-entrant evaluation.
//!
//! Formula cells are evaluated by recursing into the cells they reference, so
//! a reference cycle (A1 -> B1 -> A1) would otherwise recurse until the stack
//! is exhausted. The guard tracks the formula cells currently being computed
//! and refuses to enter one that is already on the path, or one that would
//! make the path longer than the depth limit.

use std::cell::RefCell;
use std::collections::HashSet;

use tracing::warn;

use super::CellRef;
use super::error::{EvalError, Result};

/// Default limit on nested formula cells per evaluation.
pub const MAX_EVAL_DEPTH: usize = 1000;

#[derive(Debug)]
pub struct CycleGuard {
    detect_cycles: bool,
    max_depth: usize,
    visiting: RefCell<HashSet<CellRef>>,
    path: RefCell<Vec<CellRef>>,
}

impl Default for CycleGuard {
    fn default() -> Self {
        CycleGuard::new(true, MAX_EVAL_DEPTH)
    }
}

/// Marks a cell as in progress until dropped.
#[must_use]
pub struct Entered<'a> {
    guard: &'a CycleGuard,
    cell: CellRef,
}

impl CycleGuard {
    /// `max_depth == 0` disables the depth limit.
    pub fn new(detect_cycles: bool, max_depth: usize) -> Self {
        CycleGuard {
            detect_cycles,
            max_depth,
            visiting: RefCell::new(HashSet::new()),
            path: RefCell::new(Vec::new()),
        }
    }

    /// Enter `cell`, or report why it cannot be computed from here.
    pub fn enter(&self, cell: &CellRef) -> Result<Entered<'_>> {
        if self.max_depth > 0 && self.depth() >= self.max_depth {
            warn!(cell = %cell, max = self.max_depth, "evaluation depth limit reached");
            return Err(EvalError::TooDeep {
                cell: *cell,
                max: self.max_depth,
            });
        }
        if self.detect_cycles && !self.visiting.borrow_mut().insert(*cell) {
            let path = self.path.borrow();
            let start = path.iter().position(|c| c == cell).unwrap_or(0);
            let mut cycle: Vec<CellRef> = path[start..].to_vec();
            cycle.push(*cell);
            warn!(cell = %cell, depth = path.len(), "circular reference detected");
            return Err(EvalError::Cycle(cycle));
        }
        self.path.borrow_mut().push(*cell);
        Ok(Entered {
            guard: self,
            cell: *cell,
        })
    }

    pub fn depth(&self) -> usize {
        self.path.borrow().len()
    }
}

impl Drop for Entered<'_> {
    fn drop(&mut self) {
        self.guard.path.borrow_mut().pop();
        self.guard.visiting.borrow_mut().remove(&self.cell);
    }
}
