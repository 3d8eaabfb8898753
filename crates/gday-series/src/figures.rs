//! Figure builders
//!
//! Turn cached derived series into renderer-independent [`Figure`]s:
//! smoothed annual time series and day-of-year distributions.

use crate::aggregate::{
    moving_average, seasonal_bands, trim_offsets, DEFAULT_PERCENTILES, DEFAULT_WINDOW,
};
use crate::cache::DerivedCache;
use crate::error::Result;
use gday_series_chart::{Axis, Band, Figure, Legend, LegendPosition, Panel, PanelKind, SeriesLine};
use gday_series_core::Experiment;

/// Opacity of the innermost band; outer bands are lighter
const BAND_OPACITY: f64 = 0.3;

/// Options for [`annual_figure`]
#[derive(Debug, Clone)]
pub struct AnnualOptions {
    /// Moving-average window in days
    pub window: usize,
    /// Interpolate missing values before smoothing
    pub fill_gaps: bool,
}

impl Default for AnnualOptions {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            fill_gaps: false,
        }
    }
}

/// Options for [`seasonal_figure`]
#[derive(Debug, Clone)]
pub struct SeasonalOptions {
    /// Percentiles in `[0, 100]`, ascending; paired outside-in into bands
    /// around the middle one
    pub percentiles: Vec<f64>,
}

impl Default for SeasonalOptions {
    fn default() -> Self {
        Self {
            percentiles: DEFAULT_PERCENTILES.to_vec(),
        }
    }
}

/// One panel per variable with a smoothed line per model and experiment
///
/// Lines take their color from the model and their dash pattern from the
/// experiment. x is in simulation years, offset by the samples the window
/// trims from the start.
pub fn annual_figure<M: AsRef<str>, V: AsRef<str>>(
    cache: &DerivedCache,
    models: &[M],
    experiments: &[Experiment],
    variables: &[V],
    options: &AnnualOptions,
) -> Result<Figure> {
    let config = cache.config();
    let year = config.year_length as f64;
    let (lead, _) = trim_offsets(options.window.max(1));

    let mut figure = Figure::new();
    for variable in variables {
        let variable = variable.as_ref();
        let info = config.metadata.variable(variable);
        let mut panel = Panel::new(PanelKind::Annual).with_title(info.title.clone());
        panel.x_axis = Axis::new().with_title("Year");
        panel.y_axis = Axis::new().with_title(info.axis_label());

        for model in models {
            let model = model.as_ref();
            let model_style = config.metadata.model(model);
            for &experiment in experiments {
                let exp_style = config.metadata.experiment(&experiment.tag());
                let series = cache.get_variable(variable, &config.source(model, experiment))?;
                let smoothed = moving_average(series.values(), options.window, options.fill_gaps)?;

                panel.add_line(
                    SeriesLine::new(format!("{}, {}", model_style.name, exp_style.name), smoothed)
                        .with_style(model_style.color, exp_style.line_style)
                        .with_x(lead as f64 / year, 1.0 / year),
                );
            }
        }

        panel.fit_y_axis();
        panel.legend = Some(Legend::new(LegendPosition::Below).with_columns(models.len()));
        figure.add_panel(panel);
    }

    Ok(figure)
}

/// One panel per variable and experiment with percentile bands per model
///
/// Each model contributes a median line (the middle percentile, when the
/// count is odd) and one band per outside-in percentile pair.
pub fn seasonal_figure<M: AsRef<str>, V: AsRef<str>>(
    cache: &DerivedCache,
    models: &[M],
    experiments: &[Experiment],
    variables: &[V],
    options: &SeasonalOptions,
) -> Result<Figure> {
    let config = cache.config();
    let percentiles = &options.percentiles;
    let pairs = percentiles.len() / 2;

    let mut figure = Figure::new();
    for variable in variables {
        let variable = variable.as_ref();
        let info = config.metadata.variable(variable);

        for &experiment in experiments {
            let exp_style = config.metadata.experiment(&experiment.tag());
            let mut panel = Panel::new(PanelKind::Seasonal)
                .with_title(format!("{}: {}", info.title, exp_style.name));
            panel.x_axis = Axis::new()
                .with_title("Day of year")
                .with_bounds(1.0, config.year_length as f64);
            panel.y_axis = Axis::new().with_title(info.axis_label());

            for model in models {
                let model = model.as_ref();
                let model_style = config.metadata.model(model);
                let series = cache.get_variable(variable, &config.source(model, experiment))?;
                let bands = seasonal_bands(series.values(), config.year_length, percentiles)?;

                for i in 0..pairs {
                    let (lo, hi) = (i, percentiles.len() - 1 - i);
                    panel.add_band(
                        Band::new(
                            format!(
                                "{} {}-{}%",
                                model_style.name, percentiles[lo], percentiles[hi]
                            ),
                            model_style.color,
                            bands.percentile_series(lo),
                            bands.percentile_series(hi),
                        )
                        .with_opacity(BAND_OPACITY * (i + 1) as f64 / pairs as f64)
                        .with_x_start(1.0),
                    );
                }
                if percentiles.len() % 2 == 1 {
                    panel.add_line(
                        SeriesLine::new(model_style.name.clone(), bands.percentile_series(pairs))
                            .with_style(model_style.color, exp_style.line_style)
                            .with_x(1.0, 1.0),
                    );
                }
            }

            panel.fit_y_axis();
            panel.legend = Some(Legend::new(LegendPosition::UpperRight));
            figure.add_panel(panel);
        }
    }

    Ok(figure)
}

/// Serialise a figure as pretty-printed JSON
#[cfg(feature = "json")]
pub fn to_json(figure: &Figure) -> Result<String> {
    Ok(serde_json::to_string_pretty(figure)?)
}
