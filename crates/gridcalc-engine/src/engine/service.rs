//! Cell result computation.
//!
//! [`FormulaService::compute_result`] is the entry point for turning a cell's
//! raw input into its result text. Literal inputs come back verbatim; formula
//! inputs are tokenized, parsed and evaluated, recursing into referenced cells
//! through the service itself. Any failure is reported as `eval error <reason>`
//! for the failing cell only: a cell referencing it reads that text as NaN.
//!
//! Results are never cached, so every call recomputes all dependencies.

use tracing::debug;

use super::cell::CellSource;
use super::config::EngineConfig;
use super::cycle::CycleGuard;
use super::error::{EvalError, Result};
use super::eval::{Resolver, evaluate_with_limit};
use super::format::format_number;
use super::parser::parse_formula;
use super::CellRef;

/// Prefix of the result text reported for a formula that failed to evaluate.
pub const EVAL_ERROR_PREFIX: &str = "eval error ";

/// Computes cell results against a read-only cell source.
///
/// Holds per-evaluation bookkeeping, so use one service per thread; the
/// underlying source may be shared.
pub struct FormulaService<'s, S: CellSource + ?Sized> {
    source: &'s S,
    config: EngineConfig,
    in_progress: CycleGuard,
}

impl<'s, S: CellSource + ?Sized> FormulaService<'s, S> {
    pub fn new(source: &'s S) -> Self {
        Self::with_config(source, EngineConfig::default())
    }

    pub fn with_config(source: &'s S, config: EngineConfig) -> Self {
        FormulaService {
            source,
            in_progress: CycleGuard::new(config.detect_cycles, config.max_depth),
            config,
        }
    }

    /// Result text for the cell: `""` when missing, the input itself for
    /// literals, otherwise the formatted value or an `eval error` message.
    pub fn compute_result(&self, cell: &CellRef) -> String {
        let Some(input) = self.source.input(cell) else {
            return String::new();
        };
        if !input.starts_with('=') {
            return input;
        }
        let formula = &input[1..];

        let entered = match self.in_progress.enter(cell) {
            Ok(entered) => entered,
            Err(err) => return error_text(cell, &err),
        };
        let result = self.evaluate_formula(formula);
        drop(entered);

        match result {
            Ok(value) => format_number(value),
            Err(err) => error_text(cell, &err),
        }
    }

    /// Evaluate formula text (with or without a leading `=`) that is not
    /// stored in any cell, e.g. an ad-hoc command line expression.
    pub fn compute_formula(&self, text: &str) -> String {
        let formula = text.strip_prefix('=').unwrap_or(text);
        match self.evaluate_formula(formula) {
            Ok(value) => format_number(value),
            Err(err) => format!("{}{}", EVAL_ERROR_PREFIX, err),
        }
    }

    /// Tokenize, parse and evaluate formula text (without the `=`).
    pub fn evaluate_formula(&self, formula: &str) -> Result<f64> {
        let expr = parse_formula(formula)?;
        debug!(formula, expr = %expr, depth = self.in_progress.depth(), "parsed formula");
        evaluate_with_limit(&expr, self, self.config.max_range_cells)
    }
}

impl<S: CellSource + ?Sized> Resolver for FormulaService<'_, S> {
    fn resolve(&self, cell: &CellRef) -> String {
        self.compute_result(cell)
    }
}

fn error_text(cell: &CellRef, err: &EvalError) -> String {
    debug!(cell = %cell, error = %err, "formula evaluation failed");
    format!("{}{}", EVAL_ERROR_PREFIX, err)
}

/// Compute one cell's result with the default configuration.
pub fn compute_result<S: CellSource + ?Sized>(source: &S, cell: &CellRef) -> String {
    FormulaService::new(source).compute_result(cell)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::cell::{Cell, Grid};
    use dashmap::DashMap;
    use std::collections::HashMap;
    use std::sync::Arc;

    fn sheet(cells: &[(&str, &str)]) -> HashMap<CellRef, String> {
        cells
            .iter()
            .map(|(name, input)| (CellRef::parse(name).unwrap(), input.to_string()))
            .collect()
    }

    fn at(name: &str) -> CellRef {
        CellRef::parse(name).unwrap()
    }

    #[test]
    fn test_missing_cell_is_empty() {
        let cells = sheet(&[]);
        assert_eq!(compute_result(&cells, &at("A1")), "");
    }

    #[test]
    fn test_literal_passes_through_verbatim() {
        let cells = sheet(&[("A1", "30"), ("A2", " 007 "), ("A3", "hello")]);
        assert_eq!(compute_result(&cells, &at("A1")), "30");
        assert_eq!(compute_result(&cells, &at("A2")), " 007 ");
        assert_eq!(compute_result(&cells, &at("A3")), "hello");
    }

    #[test]
    fn test_cell_addition() {
        let cells = sheet(&[("A1", "5"), ("A2", "3"), ("A3", "=A1+A2")]);
        assert_eq!(compute_result(&cells, &at("A3")), "8");
    }

    #[test]
    fn test_average_over_range() {
        let cells = sheet(&[("A0", "1"), ("A1", "2"), ("A2", "3"), ("B0", "=avg(A0:A2)")]);
        assert_eq!(compute_result(&cells, &at("B0")), "2");
    }

    #[test]
    fn test_formula_chain_recomputes_dependencies() {
        let cells = sheet(&[
            ("A0", "2"),
            ("B0", "=A0*10"),
            ("C0", "=B0+A0"),
            ("D0", "=sum(B0:C0)"),
        ]);
        assert_eq!(compute_result(&cells, &at("D0")), "42");
    }

    #[test]
    fn test_malformed_formula_reports_eval_error() {
        let cells = sheet(&[("C1", "=1+"), ("C2", "=1 $ 2"), ("C3", "=sum(A3:A1)")]);
        let c1 = compute_result(&cells, &at("C1"));
        assert!(c1.starts_with("eval error"), "{}", c1);
        assert_eq!(c1, "eval error expected unary, found end of input");
        assert_eq!(compute_result(&cells, &at("C2")), "eval error tokenize error on \"$ 2\"");
        assert_eq!(compute_result(&cells, &at("C3")), "eval error no operands for sum");
    }

    #[test]
    fn test_dependency_error_surfaces_as_nan() {
        let cells = sheet(&[("D1", "=1+"), ("D2", "=D1+1")]);
        assert!(compute_result(&cells, &at("D1")).starts_with("eval error"));
        assert_eq!(compute_result(&cells, &at("D2")), "NaN");
    }

    #[test]
    fn test_root_range_is_unsupported() {
        let cells = sheet(&[("B1", "=A1:A3")]);
        assert_eq!(compute_result(&cells, &at("B1")), "eval error unsupported op range");
    }

    #[test]
    fn test_repeated_calls_are_identical() {
        let cells = sheet(&[("A1", "1.5"), ("A2", "=A1*3"), ("A3", "=max(A1, A2)")]);
        let service = FormulaService::new(&cells);
        let first = service.compute_result(&at("A3"));
        let second = service.compute_result(&at("A3"));
        assert_eq!(first, "4.5");
        assert_eq!(first, second);
    }

    #[test]
    fn test_self_reference_is_reported_not_overflowed() {
        let cells = sheet(&[("A1", "=A1+1")]);
        // The inner re-entry fails and reads as NaN in the outer evaluation.
        assert_eq!(compute_result(&cells, &at("A1")), "NaN");

        let service = FormulaService::new(&cells);
        assert_eq!(
            service.resolve(&at("A1")),
            "NaN",
            "resolver and compute_result agree"
        );
    }

    #[test]
    fn test_mutual_reference_reports_cycle_at_reentry() {
        let cells = sheet(&[("A1", "=B1"), ("B1", "=A1")]);
        let service = FormulaService::new(&cells);
        // The re-entered A1 reports the cycle; B1 and the outer A1 read NaN.
        assert_eq!(service.compute_result(&at("A1")), "NaN");
        assert_eq!(service.compute_result(&at("B1")), "NaN");

        // What the re-entered cell itself reports while A1 and B1 are in progress.
        let _a1 = service.in_progress.enter(&at("A1")).unwrap();
        let _b1 = service.in_progress.enter(&at("B1")).unwrap();
        assert_eq!(
            service.compute_result(&at("A1")),
            "eval error circular reference A1 -> B1 -> A1"
        );
    }

    #[test]
    fn test_diamond_dependencies_are_not_cycles() {
        let cells = sheet(&[
            ("A0", "1"),
            ("B0", "=A0+1"),
            ("C0", "=A0*3"),
            ("D0", "=B0+C0"),
            ("E0", "=D0+D0"),
        ]);
        assert_eq!(compute_result(&cells, &at("E0")), "10");
    }

    #[test]
    fn test_guard_disabled_keeps_acyclic_results() {
        let cells = sheet(&[("A1", "5"), ("A2", "3"), ("A3", "=A1-A2")]);
        let config = EngineConfig {
            detect_cycles: false,
            ..EngineConfig::default()
        };
        let service = FormulaService::with_config(&cells, config);
        assert_eq!(service.compute_result(&at("A3")), "2");
    }

    #[test]
    fn test_long_chain_stops_at_depth_limit() {
        // A0 = 1, A(n) = A(n-1) + 1
        let mut cells = sheet(&[("A0", "1")]);
        for row in 1..40 {
            cells.insert(CellRef::new(row, 0), format!("=A{}+1", row - 1));
        }
        let config = EngineConfig {
            max_depth: 16,
            ..EngineConfig::default()
        };
        let service = FormulaService::with_config(&cells, config);
        assert_eq!(service.compute_result(&at("A15")), "16");
        // The innermost cell past the limit reports it; everything above reads NaN.
        assert_eq!(service.compute_result(&at("A39")), "NaN");
        assert_eq!(
            service.in_progress.depth(),
            0,
            "guard unwinds after an aborted chain"
        );

        let unlimited = FormulaService::with_config(
            &cells,
            EngineConfig {
                max_depth: 0,
                ..EngineConfig::default()
            },
        );
        assert_eq!(unlimited.compute_result(&at("A39")), "40");
    }

    #[test]
    fn test_depth_limit_catches_cycles_when_detection_off() {
        let cells = sheet(&[("A1", "=B1"), ("B1", "=A1")]);
        let config = EngineConfig {
            detect_cycles: false,
            max_depth: 8,
            ..EngineConfig::default()
        };
        let service = FormulaService::with_config(&cells, config);
        assert_eq!(service.compute_result(&at("A1")), "NaN");
    }

    #[test]
    fn test_depth_error_text_at_the_limit() {
        let cells = sheet(&[("A0", "1"), ("A1", "=A0+1"), ("A2", "=A1+1")]);
        let config = EngineConfig {
            max_depth: 1,
            ..EngineConfig::default()
        };
        let service = FormulaService::with_config(&cells, config);
        let _outer = service.in_progress.enter(&at("B9")).unwrap();
        assert_eq!(
            service.compute_result(&at("A2")),
            "eval error reference chain deeper than 1 cells at A2"
        );
    }

    #[test]
    fn test_compute_formula_against_grid() {
        let grid: Grid = Arc::new(DashMap::new());
        grid.insert(at("A1"), Cell::new("4"));
        grid.insert(at("A2"), Cell::new("=A1*A1"));
        let service = FormulaService::new(&grid);
        assert_eq!(service.compute_formula("=A2/2"), "8");
        assert_eq!(service.compute_formula("A1-1"), "3");
        assert!(service.compute_formula("1+2+3").starts_with(EVAL_ERROR_PREFIX));
    }
}
