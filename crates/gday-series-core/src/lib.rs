//! # gday-series-core
//!
//! Core data structures for analysing GDAY model output.
//!
//! This crate provides the fundamental types used throughout gday-series:
//! - [`RawTable`] - Named numeric columns read from a model output file
//! - [`DerivedSeries`] - One derived variable for one source
//! - [`SourceId`], [`Experiment`] - Identify raw output files
//! - [`PlotMetadata`], [`Color`], [`LineStyle`] - Display configuration
//!
//! ## Example
//!
//! ```rust
//! use gday_series_core::{Experiment, RawTable, SourceId};
//!
//! let table = RawTable::from_columns([("GL", vec![2.0]), ("NPP", vec![8.0])]).unwrap();
//! assert_eq!(table.row_count(), 1);
//!
//! let exp: Experiment = "AMBAVG".parse().unwrap();
//! let source = SourceId::model_run("EUC", "FIXED", exp);
//! assert_eq!(source.file_name(), "D1GDAYEUCFIXEDAMBAVG.csv");
//! ```

pub mod error;
pub mod metadata;
pub mod series;
pub mod source;
pub mod style;
pub mod table;

// Re-exports for convenience
pub use error::{Error, Result};
pub use metadata::{ExperimentStyle, ModelStyle, PlotMetadata, VariableInfo};
pub use series::DerivedSeries;
pub use source::{Climate, Experiment, SourceId, Treatment};
pub use style::{Color, LineStyle};
pub use table::RawTable;

/// Days per model year
pub const DAYS_PER_YEAR: usize = 365;
