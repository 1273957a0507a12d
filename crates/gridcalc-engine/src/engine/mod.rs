//! Spreadsheet formula engine API.
//!
//! This module turns a cell's raw input into its result text:
//!
//! - [`CellRef`] - Cell reference parsing (`A1` notation <-> row/col indices)
//! - [`Cell`], [`Grid`], [`CellSource`] - Cell storage and input lookup
//! - [`tokenize`] - Formula text to tokens
//! - [`parse`], [`parse_formula`] - Tokens to an [`Expr`] tree
//! - [`expand`] - Flatten ranges and comma lists into operands
//! - [`evaluate`] - Reduce an [`Expr`] to a number through a [`Resolver`]
//! - [`FormulaService`], [`compute_result`] - Cell input to result text
//! - [`format_number`], [`result_to_number`] - Result text conversions

mod cell;
mod cell_ref;
mod config;
mod cycle;
mod error;
mod eval;
mod expand;
mod format;
mod parser;
mod service;
mod token;

pub use cell::{Cell, CellSource, Grid};
pub use cell_ref::{CellRef, MAX_COLS};
pub use config::EngineConfig;
pub use cycle::{CycleGuard, MAX_EVAL_DEPTH};
pub use error::{EvalError, ParseError, RangeError, Result};
pub use eval::{Resolver, evaluate, evaluate_with_limit};
pub use expand::{MAX_RANGE_CELLS, expand, range_cells};
pub use format::{format_number, parse_leading_float, result_to_number};
pub use parser::{BinaryOp, Expr, UnaryOp, parse, parse_formula};
pub use service::{EVAL_ERROR_PREFIX, FormulaService, compute_result};
pub use token::{Function, Token, tokenize};
