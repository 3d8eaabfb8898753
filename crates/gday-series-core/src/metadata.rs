//! Display metadata for variables, models and experiments

use std::collections::BTreeMap;

use crate::style::{Color, LineStyle};

/// Human-readable title and units of a derived variable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableInfo {
    pub title: String,
    pub units: String,
}

impl VariableInfo {
    pub fn new<T: Into<String>, U: Into<String>>(title: T, units: U) -> Self {
        Self {
            title: title.into(),
            units: units.into(),
        }
    }

    /// Axis label, e.g. `NPP (g C m-2 d-1)`
    pub fn axis_label(&self) -> String {
        if self.units.is_empty() {
            self.title.clone()
        } else {
            format!("{} ({})", self.title, self.units)
        }
    }
}

/// Display name and line color of an allocation model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelStyle {
    pub name: String,
    pub color: Color,
}

/// Display name and dash pattern of an experiment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperimentStyle {
    pub name: String,
    pub line_style: LineStyle,
}

/// Static plotting metadata, keyed by variable name, model tag and experiment tag
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlotMetadata {
    pub variables: BTreeMap<String, VariableInfo>,
    pub models: BTreeMap<String, ModelStyle>,
    pub experiments: BTreeMap<String, ExperimentStyle>,
}

impl PlotMetadata {
    /// Variable info, falling back to the bare name with no units
    pub fn variable(&self, name: &str) -> VariableInfo {
        self.variables
            .get(name)
            .cloned()
            .unwrap_or_else(|| VariableInfo::new(name, ""))
    }

    /// Model style, falling back to the tag drawn in black
    pub fn model(&self, tag: &str) -> ModelStyle {
        self.models.get(tag).cloned().unwrap_or_else(|| ModelStyle {
            name: tag.to_string(),
            color: Color::BLACK,
        })
    }

    /// Experiment style, falling back to the tag drawn solid
    pub fn experiment(&self, tag: &str) -> ExperimentStyle {
        self.experiments
            .get(tag)
            .cloned()
            .unwrap_or_else(|| ExperimentStyle {
                name: tag.to_string(),
                line_style: LineStyle::Solid,
            })
    }
}
