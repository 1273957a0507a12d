//! Operand expansion for operators and functions.
//!
//! Before an operator is reduced, its direct arguments are flattened:
//! - `A0:B2` becomes the cells of the block, row-major;
//! - a comma node contributes its (recursively flattened) children in order;
//! - everything else passes through untouched.
//!
//! An inverted block (end before start) contributes no cells.

use std::borrow::Cow;

use super::CellRef;
use super::error::{RangeError, Result};
use super::parser::{BinaryOp, Expr};

/// Default cap on the number of cells a single range may expand to.
pub const MAX_RANGE_CELLS: usize = 1_000_000;

/// Flatten an operator's argument list into scalar operands.
pub fn expand<'a>(args: &[&'a Expr], max_cells: usize) -> Result<Vec<Cow<'a, Expr>>> {
    let mut operands = Vec::with_capacity(args.len());
    for arg in args {
        match *arg {
            Expr::Range(start, end) => {
                let cells = range_cells(start, end, max_cells)?;
                operands.extend(cells.into_iter().map(|cell| Cow::Owned(Expr::Cell(cell))));
            }
            Expr::Binary(BinaryOp::Comma, left, right) => {
                operands.extend(expand(&[left.as_ref(), right.as_ref()], max_cells)?);
            }
            other => operands.push(Cow::Borrowed(other)),
        }
    }
    Ok(operands)
}

/// Cells of the block `start:end`, inclusive on both ends, row-major.
pub fn range_cells(start: &CellRef, end: &CellRef, max_cells: usize) -> Result<Vec<CellRef>> {
    if end.row < start.row || end.col < start.col {
        return Ok(Vec::new());
    }

    let too_large = || RangeError::TooLarge {
        start: *start,
        end: *end,
        max: max_cells,
    };
    let rows = (end.row - start.row).checked_add(1).ok_or_else(too_large)?;
    let cols = end.col - start.col + 1;
    let count = rows.checked_mul(cols).ok_or_else(too_large)?;
    if count > max_cells {
        return Err(too_large().into());
    }

    let mut cells = Vec::with_capacity(count);
    for row in start.row..=end.row {
        for col in start.col..=end.col {
            cells.push(CellRef::new(row, col));
        }
    }
    Ok(cells)
}
