//! Line and band types

use gday_series_core::{Color, LineStyle};

/// A styled line over evenly spaced x positions
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SeriesLine {
    /// Legend label
    pub label: String,
    /// Line color
    pub color: Color,
    /// Dash pattern
    pub line_style: LineStyle,
    /// x position of the first value
    pub x_start: f64,
    /// x spacing between values
    pub x_step: f64,
    /// y values; missing values are `NaN`
    pub values: Vec<f64>,
}

impl SeriesLine {
    /// Create a solid black line starting at x = 0 with unit spacing
    pub fn new<S: Into<String>>(label: S, values: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            color: Color::BLACK,
            line_style: LineStyle::Solid,
            x_start: 0.0,
            x_step: 1.0,
            values,
        }
    }

    /// Set color and dash pattern
    pub fn with_style(mut self, color: Color, line_style: LineStyle) -> Self {
        self.color = color;
        self.line_style = line_style;
        self
    }

    /// Set x placement
    pub fn with_x(mut self, start: f64, step: f64) -> Self {
        self.x_start = start;
        self.x_step = step;
        self
    }

    /// x position of value `i`
    pub fn x_at(&self, i: usize) -> f64 {
        self.x_start + self.x_step * i as f64
    }
}

/// A shaded region between two curves
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Band {
    /// Legend label
    pub label: String,
    /// Fill color
    pub color: Color,
    /// Fill opacity in `[0, 1]`
    pub opacity: f64,
    /// x position of the first value
    pub x_start: f64,
    /// Lower edge
    pub lower: Vec<f64>,
    /// Upper edge
    pub upper: Vec<f64>,
}

impl Band {
    /// Create a band; `lower` and `upper` must be the same length
    pub fn new<S: Into<String>>(label: S, color: Color, lower: Vec<f64>, upper: Vec<f64>) -> Self {
        debug_assert_eq!(lower.len(), upper.len());
        Self {
            label: label.into(),
            color,
            opacity: 0.3,
            x_start: 0.0,
            lower,
            upper,
        }
    }

    /// Set fill opacity
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    /// Set x position of the first value
    pub fn with_x_start(mut self, start: f64) -> Self {
        self.x_start = start;
        self
    }
}
