//! Formula table: variable name → formula

use std::collections::BTreeMap;

use gday_series_core::{DerivedSeries, RawTable};

use crate::ast::{is_bare_name, Formula};
use crate::error::{FormulaError, FormulaResult};
use crate::evaluator::evaluate;
use crate::parser::parse_formula;

/// Check that a variable name is a bare identifier safe to embed in a file name
///
/// Names start with a letter or `_`, continue with letters, digits, `_` or
/// `.`, and neither contain `__` nor end with `_`. `{variable}__{source}` is
/// then split unambiguously at its first `__`.
pub fn check_variable_name(name: &str) -> FormulaResult<()> {
    if is_bare_name(name) && !name.contains("__") && !name.ends_with('_') {
        Ok(())
    } else {
        Err(FormulaError::InvalidName(name.to_string()))
    }
}

/// Immutable-by-convention mapping from derived-variable name to recipe
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormulaTable {
    formulas: BTreeMap<String, Formula>,
}

impl FormulaTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `(name, expression)` pairs into a table
    pub fn from_expressions<I, K, V>(entries: I) -> FormulaResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let mut table = Self::new();
        for (name, expr) in entries {
            let name = name.into();
            let formula = parse_formula(expr.as_ref()).map_err(|e| match e {
                FormulaError::Parse(msg) => FormulaError::Parse(format!("{}: {}", name, msg)),
                other => other,
            })?;
            table.insert(name, formula)?;
        }
        Ok(table)
    }

    /// Register a formula, replacing any existing one of the same name
    ///
    /// Fails with [`FormulaError::InvalidName`] for names rejected by
    /// [`check_variable_name`].
    pub fn insert<S: Into<String>>(
        &mut self,
        name: S,
        formula: Formula,
    ) -> FormulaResult<Option<Formula>> {
        let name = name.into();
        check_variable_name(&name)?;
        Ok(self.formulas.insert(name, formula))
    }

    /// Look up a formula, failing with [`FormulaError::UndefinedVariable`]
    pub fn get(&self, name: &str) -> FormulaResult<&Formula> {
        self.formulas
            .get(name)
            .ok_or_else(|| FormulaError::UndefinedVariable(name.to_string()))
    }

    /// Whether a variable is registered
    pub fn contains(&self, name: &str) -> bool {
        self.formulas.contains_key(name)
    }

    /// Registered variable names, sorted
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.formulas.keys().map(String::as_str)
    }

    /// `(name, formula)` pairs, sorted by name
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Formula)> {
        self.formulas.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.formulas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formulas.is_empty()
    }

    /// `(variable, column)` pairs whose column is absent from `table`
    pub fn missing_columns(&self, table: &RawTable) -> Vec<(String, String)> {
        let mut missing = Vec::new();
        for (name, formula) in &self.formulas {
            for column in formula.columns() {
                if !table.has_column(column) {
                    missing.push((name.clone(), column.to_string()));
                }
            }
        }
        missing
    }

    /// Check every formula against a table's header
    pub fn validate(&self, table: &RawTable) -> FormulaResult<()> {
        match self.missing_columns(table).into_iter().next() {
            Some((_, column)) => Err(FormulaError::MissingColumn(column)),
            None => Ok(()),
        }
    }

    /// Evaluate the named variable against a raw table
    pub fn evaluate(&self, variable: &str, table: &RawTable) -> FormulaResult<Vec<f64>> {
        let formula = self.get(variable)?;
        tracing::trace!(variable, formula = %formula, "evaluating");
        evaluate(formula, table)
    }

    /// Evaluate the named variable and label the result with its source
    pub fn derive(
        &self,
        variable: &str,
        table: &RawTable,
        source: &str,
    ) -> FormulaResult<DerivedSeries> {
        let values = self.evaluate(variable, table)?;
        Ok(DerivedSeries::new(variable, source, values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn formulas() -> FormulaTable {
        FormulaTable::from_expressions([
            ("leafAl", "100 * GL / NPP"),
            ("rootAl", "GR + GCR * 100 / NPP"),
            ("NPP", "NPP"),
        ])
        .unwrap()
    }

    #[test]
    fn test_lookup() {
        let table = formulas();
        assert_eq!(table.len(), 3);
        assert!(table.contains("leafAl"));
        assert_eq!(table.names().collect::<Vec<_>>(), vec!["NPP", "leafAl", "rootAl"]);
        assert!(matches!(
            table.get("woodAl"),
            Err(FormulaError::UndefinedVariable(name)) if name == "woodAl"
        ));
    }

    #[test]
    fn test_parse_error_names_variable() {
        let err = FormulaTable::from_expressions([("bad", "GL *")]).unwrap_err();
        assert!(matches!(err, FormulaError::Parse(msg) if msg.starts_with("bad:")));
    }

    #[test]
    fn test_variable_names() {
        for name in ["leafAl", "NPP", "_x", "a_b", "cue.v2"] {
            assert!(check_variable_name(name).is_ok(), "{name}");
        }
        for name in ["", "a__b", "a_", "../x", "a/b", "a\\b", "..", "1st", "leaf Al"] {
            assert!(
                matches!(check_variable_name(name), Err(FormulaError::InvalidName(_))),
                "{name}"
            );
        }
    }

    #[test]
    fn test_insert_rejects_colliding_names() {
        let mut table = FormulaTable::new();
        let formula = parse_formula("GPP").unwrap();
        assert!(table.insert("a__b", formula.clone()).is_err());
        assert!(table.insert("a_", formula.clone()).is_err());
        assert!(table.is_empty());
        assert!(table.insert("a", formula).unwrap().is_none());

        assert!(matches!(
            FormulaTable::from_expressions([("../escape", "GPP")]),
            Err(FormulaError::InvalidName(name)) if name == "../escape"
        ));
    }

    #[test]
    fn test_derive_leaf_allocation() {
        let raw = RawTable::from_columns([("GL", vec![2.0]), ("NPP", vec![8.0])]).unwrap();
        let series = formulas().derive("leafAl", &raw, "run.csv").unwrap();
        assert_eq!(series.values(), &[25.0]);
        assert_eq!(series.variable(), "leafAl");
        assert_eq!(series.source(), "run.csv");
    }

    #[test]
    fn test_missing_columns() {
        let raw = RawTable::from_columns([("GL", vec![2.0]), ("NPP", vec![8.0])]).unwrap();
        let table = formulas();
        assert_eq!(
            table.missing_columns(&raw),
            vec![
                ("rootAl".to_string(), "GR".to_string()),
                ("rootAl".to_string(), "GCR".to_string()),
            ]
        );
        assert!(matches!(
            table.validate(&raw),
            Err(FormulaError::MissingColumn(column)) if column == "GR"
        ));
    }

    #[test]
    fn test_undefined_variable_on_evaluate() {
        let raw = RawTable::new();
        assert!(matches!(
            formulas().evaluate("GPP", &raw),
            Err(FormulaError::UndefinedVariable(_))
        ));
    }
}
