//! Formula error types

use thiserror::Error;

/// Result type for formula operations
pub type FormulaResult<T> = std::result::Result<T, FormulaError>;

/// Errors that can occur during formula parsing or evaluation
#[derive(Debug, Error)]
pub enum FormulaError {
    /// Formula parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// No formula registered under this variable name
    #[error("Undefined variable: {0}")]
    UndefinedVariable(String),

    /// Variable name unusable as a cache key component
    #[error("Invalid variable name: {0:?}")]
    InvalidName(String),

    /// Formula references a column absent from the raw table
    #[error("Missing column: {0}")]
    MissingColumn(String),
}
