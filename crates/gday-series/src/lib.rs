//! # gday-series
//!
//! Derive, cache and aggregate daily output of the GDAY ecosystem model for
//! annual and seasonal plots.
//!
//! Raw model output files hold one row per simulated day. Derived variables
//! (leaf allocation, carbon use efficiency, ...) are defined by simple
//! left-to-right formulas over the raw columns, computed once per source
//! file and cached on disk.
//!
//! ## Features
//!
//! - Left-fold formulas over named columns (`100 * GL / NPP`)
//! - Compute-once disk cache with atomic writes
//! - Centred moving averages and day-of-year percentile bands
//! - TOML configuration over built-in EucFACE defaults
//! - Figure descriptions serialisable to JSON (`json` feature)
//!
//! ## Example
//!
//! ```rust
//! use gday_series::prelude::*;
//!
//! let table = RawTable::from_columns([("GL", vec![2.0]), ("NPP", vec![8.0])]).unwrap();
//! let config = Config::default();
//! let leaf = config.formulas.evaluate("leafAl", &table).unwrap();
//! assert_eq!(leaf, vec![25.0]);
//!
//! let smoothed = moving_average(&[1.0, 2.0, 3.0, 4.0, 5.0], 3, false).unwrap();
//! assert_eq!(smoothed, vec![2.0, 3.0, 4.0]);
//! ```

pub mod aggregate;
pub mod cache;
pub mod config;
mod error;
pub mod figures;
pub mod prelude;

pub use aggregate::{
    annual_means, interpolate_gaps, moving_average, seasonal_bands, AggregateError,
    DayQuantiles, SeasonalBands,
};
pub use cache::{CacheStats, DerivedCache, InvalidationPolicy};
pub use config::Config;
pub use error::{Error, Result};
pub use figures::{annual_figure, seasonal_figure, AnnualOptions, SeasonalOptions};
#[cfg(feature = "json")]
pub use figures::to_json;

// Re-export core types
pub use gday_series_core::{
    Climate, Color, DerivedSeries, Experiment, ExperimentStyle, LineStyle, ModelStyle,
    PlotMetadata, RawTable, SourceId, Treatment, VariableInfo, DAYS_PER_YEAR,
};

// Re-export formula types
pub use gday_series_formula::{
    evaluate, parse_formula, Formula, FormulaError, FormulaResult, FormulaTable, Operand,
    Operator,
};

// Re-export chart types
pub use gday_series_chart::{
    Axis, Band, Figure, Legend, LegendPosition, Panel, PanelKind, SeriesLine,
};

// Re-export I/O types
pub use gday_series_csv::{
    CsvError, RawReadOptions, RawTableReader, SeriesReader, SeriesWriteOptions, SeriesWriter,
};

use std::path::Path;

/// Extension trait for DerivedSeries to add file I/O
pub trait DerivedSeriesExt: Sized {
    /// Read a series file, labelling it with a variable and source
    fn open<P: AsRef<Path>>(path: P, variable: &str, source: &str) -> Result<Self>;

    /// Write the series as a single-column file
    fn save<P: AsRef<Path>>(&self, path: P) -> Result<()>;
}

impl DerivedSeriesExt for DerivedSeries {
    fn open<P: AsRef<Path>>(path: P, variable: &str, source: &str) -> Result<Self> {
        let path = path.as_ref();
        let values = SeriesReader::read_file(path).map_err(error::Error::csv(path))?;
        Ok(DerivedSeries::new(variable, source, values))
    }

    fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        SeriesWriter::write_file(self.values(), path, &SeriesWriteOptions::default())
            .map_err(error::Error::csv(path))
    }
}
