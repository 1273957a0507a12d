//! Error types for formula evaluation.
//!
//! Every variant is folded into an `eval error <description>` result string by
//! the formula service; none of them cross a cell boundary as a structured value.

use thiserror::Error;

use super::CellRef;

/// Grammar violations reported by the parser.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("expected {expected}, found end of input")]
    UnexpectedEnd { expected: &'static str },

    #[error("unmatched paren")]
    UnmatchedParen,

    #[error("invalid atom near \"{0}\"")]
    InvalidAtom(String),

    #[error("parse error near \"{0}\"")]
    TrailingInput(String),
}

/// Problems expanding a cell range into operands.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RangeError {
    #[error("range {start}:{end} covers too many cells (max {max})")]
    TooLarge {
        start: CellRef,
        end: CellRef,
        max: usize,
    },
}

/// Errors that can occur while computing a formula cell.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("tokenize error on \"{rest}\"")]
    Tokenize { rest: String },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Range(#[from] RangeError),

    #[error("unsupported op {0}")]
    UnsupportedOperator(String),

    #[error("no operands for {0}")]
    NoOperands(String),

    #[error("circular reference {}", format_path(.0))]
    Cycle(Vec<CellRef>),

    #[error("reference chain deeper than {max} cells at {cell}")]
    TooDeep { cell: CellRef, max: usize },
}

fn format_path(path: &[CellRef]) -> String {
    path.iter()
        .map(|cell| cell.to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

pub type Result<T> = std::result::Result<T, EvalError>;
