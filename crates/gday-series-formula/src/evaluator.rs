//! Formula evaluator
//!
//! Evaluates formulas row-wise against a raw table.

use gday_series_core::RawTable;

use crate::ast::{Formula, Operand, Operator};
use crate::error::{FormulaError, FormulaResult};

/// A resolved operand: a scalar or a borrowed column
enum Resolved<'a> {
    Scalar(f64),
    Column(&'a [f64]),
}

/// Evaluate a formula against a raw table
///
/// Every referenced column is resolved before any arithmetic, so a missing
/// column fails with [`FormulaError::MissingColumn`] without partial work.
/// The result has one value per table row. Non-finite results (e.g. division
/// by zero) are returned as `NaN`.
///
/// # Example
/// ```rust
/// use gday_series_core::RawTable;
/// use gday_series_formula::{evaluate, parse_formula};
///
/// let table = RawTable::from_columns([("GL", vec![2.0]), ("NPP", vec![8.0])]).unwrap();
/// let formula = parse_formula("100 * GL / NPP").unwrap();
/// assert_eq!(evaluate(&formula, &table).unwrap(), vec![25.0]);
/// ```
pub fn evaluate(formula: &Formula, table: &RawTable) -> FormulaResult<Vec<f64>> {
    let resolved = resolve(formula, table)?;

    let mut acc = vec![0.0; table.row_count()];
    for (op, operand) in resolved {
        match operand {
            Resolved::Scalar(value) => {
                for a in acc.iter_mut() {
                    *a = op.apply(*a, value);
                }
            }
            Resolved::Column(values) => {
                for (a, &value) in acc.iter_mut().zip(values) {
                    *a = op.apply(*a, value);
                }
            }
        }
    }

    for a in acc.iter_mut() {
        if !a.is_finite() {
            *a = f64::NAN;
        }
    }

    Ok(acc)
}

/// Resolve every operand, failing on the first missing column
fn resolve<'a>(
    formula: &'a Formula,
    table: &'a RawTable,
) -> FormulaResult<Vec<(Operator, Resolved<'a>)>> {
    formula
        .terms()
        .iter()
        .map(|term| {
            let operand = match &term.operand {
                Operand::Literal(n) => Resolved::Scalar(*n),
                Operand::Column(name) => Resolved::Column(
                    table
                        .column(name)
                        .ok_or_else(|| FormulaError::MissingColumn(name.clone()))?,
                ),
            };
            Ok((term.op, operand))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_formula;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn table() -> RawTable {
        RawTable::from_columns([
            ("GL", vec![2.0, 1.0, 0.0]),
            ("GW", vec![4.0, 2.0, 1.0]),
            ("NPP", vec![8.0, 4.0, 0.0]),
        ])
        .unwrap()
    }

    fn eval(formula: &str) -> FormulaResult<Vec<f64>> {
        evaluate(&parse_formula(formula)?, &table())
    }

    #[test]
    fn test_evaluate_leaf_allocation() {
        let result = eval("100 * GL / NPP").unwrap();
        assert_eq!(result[0], 25.0);
        assert_eq!(result[1], 25.0);
        // 0/0
        assert!(result[2].is_nan());
    }

    #[test]
    fn test_evaluate_left_fold_ignores_precedence() {
        // ((GL + GW) * 10)
        assert_eq!(eval("GL + GW * 10").unwrap(), vec![60.0, 30.0, 10.0]);
    }

    #[test]
    fn test_evaluate_literal_only() {
        assert_eq!(eval("7").unwrap(), vec![7.0, 7.0, 7.0]);
    }

    #[test]
    fn test_evaluate_leading_subtract() {
        assert_eq!(eval("- GL").unwrap(), vec![-2.0, -1.0, 0.0]);
    }

    #[test]
    fn test_evaluate_division_by_zero_is_nan() {
        let result = eval("GW / NPP").unwrap();
        assert_eq!(result[0], 0.5);
        assert!(result[2].is_nan());
    }

    #[test]
    fn test_evaluate_propagates_missing_values() {
        let table = RawTable::from_columns([("A", vec![1.0, f64::NAN])]).unwrap();
        let result = evaluate(&parse_formula("A + 1").unwrap(), &table).unwrap();
        assert_eq!(result[0], 2.0);
        assert!(result[1].is_nan());
    }

    #[test]
    fn test_evaluate_missing_column() {
        let err = eval("100 * GR / NPP").unwrap_err();
        assert!(matches!(err, FormulaError::MissingColumn(name) if name == "GR"));
    }

    #[test]
    fn test_evaluate_empty_table() {
        let table = RawTable::from_columns([("GL", vec![])]).unwrap();
        assert_eq!(
            evaluate(&parse_formula("GL * 2").unwrap(), &table).unwrap(),
            Vec::<f64>::new()
        );
    }

    proptest! {
        #[test]
        fn prop_length_matches_rows(values in proptest::collection::vec(-1e6f64..1e6, 0..200)) {
            let n = values.len();
            let table = RawTable::from_columns([
                ("GL", values.clone()),
                ("NPP", values),
            ])
            .unwrap();
            let formula = parse_formula("100 * GL / NPP - 3").unwrap();
            let first = evaluate(&formula, &table).unwrap();
            prop_assert_eq!(first.len(), n);

            let second = evaluate(&formula, &table).unwrap();
            prop_assert!(first.iter().zip(&second).all(|(a, b)| a.to_bits() == b.to_bits()));
        }
    }
}
