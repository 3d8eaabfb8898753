//! Error types for gday-series

use std::path::PathBuf;

use thiserror::Error;

use crate::aggregate::AggregateError;
use gday_series_csv::CsvError;
use gday_series_formula::FormulaError;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while deriving, caching or aggregating series
#[derive(Debug, Error)]
pub enum Error {
    /// Raw model output file missing from the data directory
    #[error("Source not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    /// Formula lookup, parse or evaluation error
    #[error(transparent)]
    Formula(#[from] FormulaError),

    /// Raw table or cache file could not be read or written
    #[error("{}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: CsvError,
    },

    /// Filesystem error
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Aggregation error
    #[error(transparent)]
    Aggregate(#[from] AggregateError),

    /// Invalid configuration
    #[error("Config error: {0}")]
    Config(String),

    /// Figure serialisation error
    #[cfg(feature = "json")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Error {
        let path = path.into();
        move |source| Error::Io { path, source }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>) -> impl FnOnce(CsvError) -> Error {
        let path = path.into();
        move |source| Error::Csv { path, source }
    }

    /// Whether this is an undefined-variable error
    pub fn is_undefined_variable(&self) -> bool {
        matches!(self, Error::Formula(FormulaError::UndefinedVariable(_)))
    }

    /// Whether this is a missing-column error
    pub fn is_missing_column(&self) -> bool {
        matches!(self, Error::Formula(FormulaError::MissingColumn(_)))
    }
}
