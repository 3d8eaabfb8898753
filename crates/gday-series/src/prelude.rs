//! Prelude module - common imports for gday-series users
//!
//! ```rust
//! use gday_series::prelude::*;
//! ```

// Aggregation
pub use crate::{annual_means, interpolate_gaps, moving_average, seasonal_bands, SeasonalBands};

// Figures
pub use crate::{annual_figure, seasonal_figure, AnnualOptions, Figure, SeasonalOptions};

// Cache and configuration
pub use crate::{CacheStats, Config, DerivedCache, InvalidationPolicy};

// Data types
pub use crate::{DerivedSeries, Experiment, RawTable, SourceId};

// Formulas
pub use crate::{Formula, FormulaTable};

// Error types
pub use crate::{Error, Result};

// Extension traits
pub use crate::DerivedSeriesExt;
