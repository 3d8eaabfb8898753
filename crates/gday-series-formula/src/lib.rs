//! # gday-series-formula
//!
//! Derived-variable formulas for gday-series.
//!
//! This crate provides:
//! - Formula representation (operands folded left to right with operators)
//! - Formula parsing (text → [`Formula`])
//! - Formula evaluation ([`Formula`] × [`RawTable`](gday_series_core::RawTable) → values)
//! - The [`FormulaTable`] mapping variable names to formulas
//!
//! ## Example
//!
//! ```rust
//! use gday_series_core::RawTable;
//! use gday_series_formula::FormulaTable;
//!
//! let formulas = FormulaTable::from_expressions([("leafAl", "100 * GL / NPP")]).unwrap();
//! let raw = RawTable::from_columns([("GL", vec![2.0]), ("NPP", vec![8.0])]).unwrap();
//! assert_eq!(formulas.evaluate("leafAl", &raw).unwrap(), vec![25.0]);
//! ```

pub mod ast;
pub mod error;
pub mod evaluator;
pub mod parser;
pub mod table;

pub use ast::{Formula, Item, Operand, Operator, Term};
pub use error::{FormulaError, FormulaResult};
pub use evaluator::evaluate;
pub use parser::parse_formula;
pub use table::{check_variable_name, FormulaTable};
