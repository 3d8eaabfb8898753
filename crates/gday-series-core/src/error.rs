//! Error types for gday-series-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in gday-series-core
#[derive(Debug, Error)]
pub enum Error {
    /// Same column name appears twice in a header
    #[error("Duplicate column name: {0}")]
    DuplicateColumn(String),

    /// A column's length disagrees with the table's row count
    #[error("Column {name} has {actual} rows, expected {expected}")]
    RaggedColumn {
        name: String,
        expected: usize,
        actual: usize,
    },

    /// Invalid color specification
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// Invalid line style specification
    #[error("Invalid line style: {0}")]
    InvalidLineStyle(String),

    /// Invalid source identifier
    #[error("Invalid source: {0}")]
    InvalidSource(String),
}
