//! Time-series aggregation
//!
//! Pure numeric transforms over daily series: centred moving averages for
//! annual plots, day-of-year quantiles for seasonal plots, and per-year means.
//! Missing values are `NaN` throughout.

use thiserror::Error;

/// Default smoothing window: one model year of daily values
pub const DEFAULT_WINDOW: usize = gday_series_core::DAYS_PER_YEAR;

/// Default seasonal percentiles
pub const DEFAULT_PERCENTILES: [f64; 5] = [10.0, 25.0, 50.0, 75.0, 90.0];

/// Result type for aggregation
pub type AggregateResult<T> = std::result::Result<T, AggregateError>;

/// Errors that can occur during aggregation
#[derive(Debug, Error, PartialEq)]
pub enum AggregateError {
    /// Zero-length moving-average window
    #[error("Moving average window must be at least 1")]
    InvalidWindow,

    /// Zero-length year
    #[error("Year length must be at least 1")]
    InvalidYearLength,

    /// Series shorter than one year
    #[error("Series of {len} values is shorter than one year of {year_length}")]
    TooShort { len: usize, year_length: usize },

    /// Percentile outside `[0, 100]`
    #[error("Percentile {0} outside [0, 100]")]
    InvalidPercentile(f64),
}

/// Samples dropped from each end by a centred window of length `window`
///
/// Returns `(leading, trailing)` = `(ceil(n/2) - 1, floor(n/2))`.
pub fn trim_offsets(window: usize) -> (usize, usize) {
    ((window + 1) / 2 - 1, window / 2)
}

/// Fill missing values by linear interpolation over the index
///
/// Leading and trailing gaps take the nearest valid value. A series with no
/// valid values is returned unchanged.
pub fn interpolate_gaps(values: &[f64]) -> Vec<f64> {
    let valid: Vec<usize> = (0..values.len()).filter(|&i| !values[i].is_nan()).collect();
    let (first, last) = match (valid.first(), valid.last()) {
        (Some(&first), Some(&last)) => (first, last),
        _ => return values.to_vec(),
    };

    let mut filled = values.to_vec();
    for v in &mut filled[..first] {
        *v = values[first];
    }
    for v in &mut filled[last + 1..] {
        *v = values[last];
    }
    for pair in valid.windows(2) {
        let (lo, hi) = (pair[0], pair[1]);
        let span = (hi - lo) as f64;
        for (i, v) in filled.iter_mut().enumerate().take(hi).skip(lo + 1) {
            *v = values[lo] + (values[hi] - values[lo]) * (i - lo) as f64 / span;
        }
    }
    filled
}

/// Centred moving average
///
/// Only complete windows are kept, so the output has `len - window + 1`
/// values (none when the window is longer than the series); see
/// [`trim_offsets`]. With `fill_gaps`, missing values are interpolated first;
/// otherwise any window containing a missing value averages to `NaN`.
///
/// # Example
/// ```rust
/// use gday_series::aggregate::moving_average;
///
/// let smoothed = moving_average(&[1.0, 2.0, 3.0, 4.0, 5.0], 3, false).unwrap();
/// assert_eq!(smoothed, vec![2.0, 3.0, 4.0]);
/// ```
pub fn moving_average(values: &[f64], window: usize, fill_gaps: bool) -> AggregateResult<Vec<f64>> {
    if window == 0 {
        return Err(AggregateError::InvalidWindow);
    }

    let filled;
    let values = if fill_gaps {
        filled = interpolate_gaps(values);
        &filled[..]
    } else {
        values
    };

    let n = window as f64;
    Ok(values
        .windows(window)
        .map(|w| w.iter().sum::<f64>() / n)
        .collect())
}

/// Quantile of sorted data by linear interpolation between order statistics
///
/// `q` is a fraction in `[0, 1]`. Returns `NaN` for empty input.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        n => {
            let pos = q * (n - 1) as f64;
            let lo = pos.floor() as usize;
            let hi = pos.ceil() as usize;
            let frac = pos - lo as f64;
            sorted[lo] + (sorted[hi] - sorted[lo]) * frac
        }
    }
}

/// Quantile summary of one day of year across years
#[derive(Debug, Clone, PartialEq)]
pub struct DayQuantiles {
    /// Day of year, starting at 1
    pub day: usize,
    /// Number of non-missing samples
    pub samples: usize,
    /// One value per requested percentile
    pub values: Vec<f64>,
}

/// Day-of-year distribution of a multi-year daily series
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonalBands {
    /// Days per year used for the reshape
    pub year_length: usize,
    /// Complete years used
    pub years: usize,
    /// Requested percentiles in `[0, 100]`
    pub percentiles: Vec<f64>,
    /// One summary per day of year
    pub days: Vec<DayQuantiles>,
}

impl SeasonalBands {
    /// Values of the `index`-th percentile across the year
    pub fn percentile_series(&self, index: usize) -> Vec<f64> {
        self.days
            .iter()
            .map(|d| d.values.get(index).copied().unwrap_or(f64::NAN))
            .collect()
    }

    /// Values of a requested percentile across the year
    pub fn series_for(&self, percentile: f64) -> Option<Vec<f64>> {
        self.percentiles
            .iter()
            .position(|&p| p == percentile)
            .map(|i| self.percentile_series(i))
    }
}

/// Reshape a daily series into `year_length × years` and summarise each day
///
/// A trailing partial year is dropped. Missing values are ignored; a day with
/// no valid samples yields `NaN` for every percentile.
pub fn seasonal_bands(
    values: &[f64],
    year_length: usize,
    percentiles: &[f64],
) -> AggregateResult<SeasonalBands> {
    if year_length == 0 {
        return Err(AggregateError::InvalidYearLength);
    }
    if let Some(&p) = percentiles.iter().find(|p| !(0.0..=100.0).contains(*p)) {
        return Err(AggregateError::InvalidPercentile(p));
    }

    let years = values.len() / year_length;
    if years == 0 {
        return Err(AggregateError::TooShort {
            len: values.len(),
            year_length,
        });
    }
    let dropped = values.len() - years * year_length;
    if dropped > 0 {
        tracing::warn!(dropped, year_length, "dropping trailing partial year");
    }

    let mut days = Vec::with_capacity(year_length);
    let mut samples = Vec::with_capacity(years);
    for day in 0..year_length {
        samples.clear();
        samples.extend(
            (0..years)
                .map(|year| values[year * year_length + day])
                .filter(|v| !v.is_nan()),
        );
        samples.sort_by(|a, b| a.total_cmp(b));

        days.push(DayQuantiles {
            day: day + 1,
            samples: samples.len(),
            values: percentiles
                .iter()
                .map(|p| quantile_sorted(&samples, p / 100.0))
                .collect(),
        });
    }

    Ok(SeasonalBands {
        year_length,
        years,
        percentiles: percentiles.to_vec(),
        days,
    })
}

/// Mean of each complete year, ignoring missing values
pub fn annual_means(values: &[f64], year_length: usize) -> AggregateResult<Vec<f64>> {
    if year_length == 0 {
        return Err(AggregateError::InvalidYearLength);
    }

    Ok(values
        .chunks_exact(year_length)
        .map(|year| {
            let (sum, count) = year
                .iter()
                .filter(|v| !v.is_nan())
                .fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
            if count == 0 {
                f64::NAN
            } else {
                sum / count as f64
            }
        })
        .collect())
}
