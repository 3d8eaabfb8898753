//! Figure and panel types

use crate::axis::Axis;
use crate::legend::Legend;
use crate::series::{Band, SeriesLine};

/// What a panel plots against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PanelKind {
    /// Smoothed values over simulation years
    Annual,
    /// Distribution over day of year
    Seasonal,
}

/// One set of axes
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Panel {
    /// Panel kind
    pub kind: PanelKind,
    /// Panel title
    pub title: Option<String>,
    /// Horizontal axis
    pub x_axis: Axis,
    /// Vertical axis
    pub y_axis: Axis,
    /// Shaded bands, drawn first
    pub bands: Vec<Band>,
    /// Lines, drawn over the bands
    pub lines: Vec<SeriesLine>,
    /// Legend
    pub legend: Option<Legend>,
}

impl Panel {
    /// Create an empty panel
    pub fn new(kind: PanelKind) -> Self {
        Self {
            kind,
            title: None,
            x_axis: Axis::new(),
            y_axis: Axis::new(),
            bands: Vec::new(),
            lines: Vec::new(),
            legend: None,
        }
    }

    /// Set panel title
    pub fn with_title<S: Into<String>>(mut self, title: S) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Add a line
    pub fn add_line(&mut self, line: SeriesLine) {
        self.lines.push(line);
    }

    /// Add a band
    pub fn add_band(&mut self, band: Band) {
        self.bands.push(band);
    }

    /// Fit the y axis to every line and band value
    pub fn fit_y_axis(&mut self) {
        let values = self
            .lines
            .iter()
            .flat_map(|l| l.values.iter())
            .chain(self.bands.iter().flat_map(|b| b.lower.iter().chain(&b.upper)));
        self.y_axis = std::mem::take(&mut self.y_axis).fit(values);
    }
}

/// A figure: panels stacked vertically
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Figure {
    /// Figure title
    pub title: Option<String>,
    /// Panels, top to bottom
    pub panels: Vec<Panel>,
}

impl Figure {
    /// Create an empty figure
    pub fn new() -> Self {
        Self::default()
    }

    /// Set figure title
    pub fn with_title<S: Into<String>>(mut self, title: S) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Add a panel
    pub fn add_panel(&mut self, panel: Panel) {
        self.panels.push(panel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gday_series_core::{Color, LineStyle};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_fit_y_axis_covers_lines_and_bands() {
        let mut panel = Panel::new(PanelKind::Seasonal).with_title("NPP");
        panel.add_line(SeriesLine::new("median", vec![1.0, 2.0]));
        panel.add_band(Band::new("10-90%", Color::GRAY, vec![0.0, 1.0], vec![3.0, 20.0]));
        panel.fit_y_axis();

        assert_eq!(panel.y_axis.minimum, Some(-1.0));
        assert_eq!(panel.y_axis.maximum, Some(21.0));
    }

    #[test]
    fn test_series_line_x() {
        let line = SeriesLine::new("fixed", vec![0.0; 3])
            .with_style(Color::GREEN, LineStyle::Dashed)
            .with_x(182.0, 1.0);
        assert_eq!(line.x_at(2), 184.0);
        assert_eq!(line.line_style, LineStyle::Dashed);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serialize_figure() {
        let mut panel = Panel::new(PanelKind::Annual);
        panel.add_line(
            SeriesLine::new("a", vec![1.0, f64::NAN]).with_style(Color::RED, LineStyle::DashDot),
        );
        let mut figure = Figure::new().with_title("LAI");
        figure.add_panel(panel);

        let value = serde_json::to_value(&figure).unwrap();
        assert_eq!(value["title"], "LAI");
        let line = &value["panels"][0]["lines"][0];
        assert_eq!(line["color"], "#FF0000");
        assert_eq!(line["line_style"], "dashdot");
        // NaN has no JSON form
        assert!(line["values"][1].is_null());
    }
}
