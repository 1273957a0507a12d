//! Expression evaluation.
//!
//! Operator nodes expand their direct arguments (see [`super::expand`]),
//! evaluate each operand left to right and fold the results. Cell leaves are
//! resolved to the referenced cell's result text and read back as a number;
//! text with no numeric prefix becomes NaN rather than an error.

use tracing::trace;

use super::CellRef;
use super::error::{EvalError, Result};
use super::expand::{MAX_RANGE_CELLS, expand};
use super::format::result_to_number;
use super::parser::{BinaryOp, Expr, UnaryOp};

/// Evaluates referenced cells on behalf of the evaluator.
pub trait Resolver {
    /// Fully computed result text of `cell` (empty for a missing cell).
    fn resolve(&self, cell: &CellRef) -> String;
}

impl<F: Fn(&CellRef) -> String> Resolver for F {
    fn resolve(&self, cell: &CellRef) -> String {
        self(cell)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Reduction {
    Sum,
    /// Negation for one operand, subtraction otherwise.
    Minus,
    Product,
    Quotient,
    Max,
    Avg,
}

impl From<UnaryOp> for Reduction {
    fn from(op: UnaryOp) -> Self {
        match op {
            UnaryOp::Negate => Reduction::Minus,
            UnaryOp::Sum => Reduction::Sum,
            UnaryOp::Avg => Reduction::Avg,
            UnaryOp::Max => Reduction::Max,
        }
    }
}

/// Evaluate an expression with the default range size limit.
pub fn evaluate<R: Resolver + ?Sized>(expr: &Expr, resolver: &R) -> Result<f64> {
    evaluate_with_limit(expr, resolver, MAX_RANGE_CELLS)
}

/// Evaluate an expression, rejecting ranges larger than `max_range_cells`.
pub fn evaluate_with_limit<R: Resolver + ?Sized>(
    expr: &Expr,
    resolver: &R,
    max_range_cells: usize,
) -> Result<f64> {
    match expr {
        Expr::Number(literal) => Ok(literal.parse::<f64>().unwrap_or(f64::NAN)),
        Expr::Cell(cell) => {
            trace!(cell = %cell, "resolving cell reference");
            Ok(result_to_number(&resolver.resolve(cell)))
        }
        Expr::Range(..) => Err(EvalError::UnsupportedOperator("range".to_string())),
        Expr::Unary(op, operand) => reduce_node(
            op.symbol(),
            Reduction::from(*op),
            &[operand.as_ref()],
            resolver,
            max_range_cells,
        ),
        Expr::Binary(op, left, right) => {
            let reduction = match op {
                BinaryOp::Add => Reduction::Sum,
                BinaryOp::Sub => Reduction::Minus,
                BinaryOp::Mul => Reduction::Product,
                BinaryOp::Div => Reduction::Quotient,
                BinaryOp::Comma => {
                    return Err(EvalError::UnsupportedOperator(op.symbol().to_string()));
                }
            };
            reduce_node(
                op.symbol(),
                reduction,
                &[left.as_ref(), right.as_ref()],
                resolver,
                max_range_cells,
            )
        }
    }
}

fn reduce_node<R: Resolver + ?Sized>(
    tag: &str,
    reduction: Reduction,
    args: &[&Expr],
    resolver: &R,
    max_range_cells: usize,
) -> Result<f64> {
    let operands = expand(args, max_range_cells)?;
    let values = operands
        .iter()
        .map(|operand| evaluate_with_limit(operand, resolver, max_range_cells))
        .collect::<Result<Vec<f64>>>()?;
    reduce(tag, reduction, &values)
}

fn reduce(tag: &str, reduction: Reduction, values: &[f64]) -> Result<f64> {
    let Some((&first, rest)) = values.split_first() else {
        return Err(EvalError::NoOperands(tag.to_string()));
    };
    let folded = match reduction {
        Reduction::Sum => rest.iter().fold(first, |acc, v| acc + v),
        Reduction::Minus if rest.is_empty() => -first,
        Reduction::Minus => rest.iter().fold(first, |acc, v| acc - v),
        Reduction::Product => rest.iter().fold(first, |acc, v| acc * v),
        Reduction::Quotient => rest.iter().fold(first, |acc, v| acc / v),
        Reduction::Max => rest.iter().fold(first, |acc, &v| nan_max(acc, v)),
        Reduction::Avg => rest.iter().fold(first, |acc, v| acc + v) / values.len() as f64,
    };
    Ok(folded)
}

/// Maximum that propagates NaN, unlike `f64::max`.
fn nan_max(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.max(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::format::format_number;
    use crate::engine::parser::parse_formula;
    use std::collections::HashMap;

    /// Resolver over literal result strings; missing cells resolve to "".
    fn results(cells: &[(&str, &str)]) -> HashMap<CellRef, String> {
        cells
            .iter()
            .map(|(name, result)| (CellRef::parse(name).unwrap(), result.to_string()))
            .collect()
    }

    fn eval(text: &str, cells: &HashMap<CellRef, String>) -> Result<f64> {
        let expr = parse_formula(text)?;
        let resolver = |cell: &CellRef| cells.get(cell).cloned().unwrap_or_default();
        evaluate(&expr, &resolver)
    }

    fn eval_text(text: &str, cells: &HashMap<CellRef, String>) -> String {
        format_number(eval(text, cells).unwrap())
    }

    #[test]
    fn test_arithmetic() {
        let none = HashMap::new();
        assert_eq!(eval_text("1+2*3", &none), "7");
        assert_eq!(eval_text("(1+2)*3", &none), "9");
        assert_eq!(eval_text("10/4", &none), "2.5");
        assert_eq!(eval_text("-2.5", &none), "-2.5");
        assert_eq!(eval_text("7-10", &none), "-3");
    }

    #[test]
    fn test_aggregates_over_ranges() {
        let cells = results(&[("A0", "1"), ("A1", "2"), ("A2", "3"), ("B0", "10")]);
        assert_eq!(eval_text("sum(A0:A2)", &cells), "6");
        assert_eq!(eval_text("avg(A0:A2)", &cells), "2");
        assert_eq!(eval_text("max(A0:B2)", &cells), "NaN"); // B1, B2 are empty
        assert_eq!(eval_text("max(A0:A2, B0)", &cells), "10");
        assert_eq!(eval_text("sum(A0:A2, 4)", &cells), "10");
    }

    #[test]
    fn test_subtraction_folds_in_flattened_order() {
        let cells = results(&[("A0", "10"), ("A1", "3"), ("A2", "2")]);
        // (A0:A1) - A2 expands to [10, 3, 2].
        assert_eq!(eval_text("A0:A1-A2", &cells), "5");
        // Negation over a comma list subtracts.
        assert_eq!(eval_text("-(A0, A1)", &cells), "7");
        assert_eq!(eval_text("A0:A1/A2", &cells), "1.6666666666666667");
    }

    #[test]
    fn test_non_numeric_results_are_nan() {
        let cells = results(&[("A0", "hello"), ("A1", "eval error unmatched paren"), ("A2", "4 apples")]);
        assert!(eval("A0+1", &cells).unwrap().is_nan());
        assert!(eval("A1*2", &cells).unwrap().is_nan());
        assert!(eval("B9", &cells).unwrap().is_nan());
        assert_eq!(eval_text("A2+1", &cells), "5");
    }

    #[test]
    fn test_division_by_zero_is_a_value() {
        let none = HashMap::new();
        assert_eq!(eval_text("1/0", &none), "Infinity");
        assert_eq!(eval_text("-1/0", &none), "-Infinity");
        assert_eq!(eval_text("0/0", &none), "NaN");
    }

    #[test]
    fn test_max_propagates_nan() {
        assert!(nan_max(f64::NAN, 1.0).is_nan());
        assert!(nan_max(1.0, f64::NAN).is_nan());
        assert_eq!(nan_max(1.0, 3.0), 3.0);
    }

    #[test]
    fn test_inverted_range_has_no_operands() {
        let cells = results(&[("A1", "1"), ("A3", "3")]);
        assert_eq!(
            eval("sum(A3:A1)", &cells),
            Err(EvalError::NoOperands("sum".to_string()))
        );
        // A lone operand under binary minus is negated.
        assert_eq!(eval_text("A3:A1-5", &cells), "-5");
    }

    #[test]
    fn test_root_range_and_comma_are_unsupported() {
        let none = HashMap::new();
        assert_eq!(
            eval("A1:A3", &none),
            Err(EvalError::UnsupportedOperator("range".to_string()))
        );
        assert_eq!(
            eval("(1, 2)", &none),
            Err(EvalError::UnsupportedOperator(",".to_string()))
        );
    }

    #[test]
    fn test_range_limit_is_enforced() {
        let expr = parse_formula("sum(A0:Z99)").unwrap();
        let resolver = |_: &CellRef| "1".to_string();
        assert_eq!(evaluate(&expr, &resolver), Ok(2600.0));
        assert!(matches!(
            evaluate_with_limit(&expr, &resolver, 100),
            Err(EvalError::Range(_))
        ));
    }
}
