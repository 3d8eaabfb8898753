//! Configuration
//!
//! A [`Config`] is built once and handed to [`DerivedCache::new`]; nothing
//! reads global state. Built-in defaults describe the EucFACE allocation
//! experiments; a TOML file can override paths and extend or replace any
//! formula, variable, model or experiment entry:
//!
//! ```toml
//! site = "EUC"
//! preamble_lines = 3
//! invalidation = "source-modified"
//!
//! [paths]
//! data_dir = "outputs"
//! cache_dir = "cache"
//!
//! [formulas]
//! shootAl = "100 * GL + GW / NPP"
//!
//! [variables.shootAl]
//! title = "Shoot allocation"
//! units = "%"
//!
//! [models.MAXIMIZEWOOD]
//! name = "Maximise wood"
//! color = "#E7298A"
//!
//! [experiments.ELEVAR]
//! line_style = "-."
//! ```
//!
//! [`DerivedCache::new`]: crate::DerivedCache::new

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::cache::InvalidationPolicy;
use crate::error::{Error, Result};
use gday_series_core::{
    Color, Experiment, ExperimentStyle, LineStyle, ModelStyle, PlotMetadata, SourceId,
    VariableInfo, DAYS_PER_YEAR,
};
use gday_series_csv::RawReadOptions;
use gday_series_formula::{FormulaError, FormulaResult, FormulaTable};

/// Built-in formulas: `(name, expression, title, units)`
const DEFAULT_VARIABLES: &[(&str, &str, &str, &str)] = &[
    ("leafAl", "100 * GL / NPP", "Leaf allocation", "%"),
    ("woodAl", "100 * GW / NPP", "Wood allocation", "%"),
    ("rootAl", "100 * GR / NPP", "Root allocation", "%"),
    ("NPP", "NPP", "NPP", "g C m-2 d-1"),
    ("GPP", "GPP", "GPP", "g C m-2 d-1"),
    ("CUE", "NPP / GPP", "Carbon use efficiency", ""),
    ("LAI", "LAI", "LAI", "m2 m-2"),
];

/// Built-in allocation models: `(tag, name, color)`
const DEFAULT_MODELS: &[(&str, &str, Color)] = &[
    ("FIXED", "Fixed", Color::rgb(0x1B, 0x9E, 0x77)),
    ("ALLOMETRIC", "Allometric", Color::rgb(0xD9, 0x5F, 0x02)),
    ("MAXIMIZEGPP", "Maximise GPP", Color::rgb(0x75, 0x70, 0xB3)),
    ("MAXIMIZEWOOD", "Maximise wood", Color::rgb(0xE7, 0x29, 0x8A)),
];

/// Built-in experiments: `(tag, name, line style)`
const DEFAULT_EXPERIMENTS: &[(&str, &str, LineStyle)] = &[
    ("AMBAVG", "Ambient CO2, average climate", LineStyle::Solid),
    ("AMBVAR", "Ambient CO2, variable climate", LineStyle::Dotted),
    ("ELEAVG", "Elevated CO2, average climate", LineStyle::Dashed),
    ("ELEVAR", "Elevated CO2, variable climate", LineStyle::DashDot),
];

/// Immutable run configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding raw model output
    pub data_dir: PathBuf,
    /// Directory for derived-series artifacts
    pub cache_dir: PathBuf,
    /// Site tag used in raw file names
    pub site: String,
    /// Raw file layout
    pub read_options: RawReadOptions,
    /// Days per model year
    pub year_length: usize,
    /// When cached artifacts are recomputed
    pub invalidation: InvalidationPolicy,
    /// Derived-variable recipes
    pub formulas: FormulaTable,
    /// Display metadata
    pub metadata: PlotMetadata,
    /// Model tags in display order
    pub models: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        let formulas = builtin_formulas().unwrap_or_else(|e| {
            tracing::error!(error = %e, "built-in formulas rejected");
            FormulaTable::new()
        });
        let mut metadata = PlotMetadata::default();

        for &(name, _, title, units) in DEFAULT_VARIABLES {
            metadata
                .variables
                .insert(name.to_string(), VariableInfo::new(title, units));
        }
        for &(tag, name, color) in DEFAULT_MODELS {
            metadata.models.insert(
                tag.to_string(),
                ModelStyle {
                    name: name.to_string(),
                    color,
                },
            );
        }
        for &(tag, name, line_style) in DEFAULT_EXPERIMENTS {
            metadata.experiments.insert(
                tag.to_string(),
                ExperimentStyle {
                    name: name.to_string(),
                    line_style,
                },
            );
        }

        Self {
            data_dir: PathBuf::from("outputs"),
            cache_dir: PathBuf::from("cache"),
            site: "EUC".to_string(),
            read_options: RawReadOptions::default(),
            year_length: DAYS_PER_YEAR,
            invalidation: InvalidationPolicy::default(),
            formulas,
            metadata,
            models: DEFAULT_MODELS.iter().map(|m| m.0.to_string()).collect(),
        }
    }
}

/// Formula table of [`DEFAULT_VARIABLES`]
fn builtin_formulas() -> FormulaResult<FormulaTable> {
    let expressions = DEFAULT_VARIABLES.iter().map(|&(name, expr, ..)| (name, expr));
    FormulaTable::from_expressions(expressions)
}

impl Config {
    /// Defaults with the given data and cache directories
    pub fn with_dirs<D: Into<PathBuf>, C: Into<PathBuf>>(data_dir: D, cache_dir: C) -> Self {
        Self {
            data_dir: data_dir.into(),
            cache_dir: cache_dir.into(),
            ..Self::default()
        }
    }

    /// Load a TOML file over the defaults
    ///
    /// Relative paths in the file are resolved against the file's directory.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(Error::io(path))?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Self::from_toml_str(&text, base)
    }

    /// Parse TOML text over the defaults, resolving relative paths against `base`
    pub fn from_toml_str(text: &str, base: &Path) -> Result<Self> {
        let file: ConfigFile = toml::from_str(text).map_err(|e| Error::Config(e.to_string()))?;
        file.apply(Self::default(), base)
    }

    /// Raw file name of one model run at the configured site
    pub fn source(&self, model: &str, experiment: Experiment) -> SourceId {
        SourceId::model_run(&self.site, model, experiment)
    }
}

/// On-disk configuration layout
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    paths: PathsSection,
    site: Option<String>,
    preamble_lines: Option<usize>,
    year_length: Option<usize>,
    invalidation: Option<InvalidationPolicy>,
    formulas: BTreeMap<String, String>,
    variables: BTreeMap<String, VariableEntry>,
    models: BTreeMap<String, ModelEntry>,
    experiments: BTreeMap<String, ExperimentEntry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct PathsSection {
    data_dir: Option<PathBuf>,
    cache_dir: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct VariableEntry {
    title: String,
    #[serde(default)]
    units: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ModelEntry {
    name: Option<String>,
    color: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ExperimentEntry {
    name: Option<String>,
    line_style: String,
}

impl ConfigFile {
    fn apply(self, mut config: Config, base: &Path) -> Result<Config> {
        if let Some(dir) = self.paths.data_dir {
            config.data_dir = base.join(dir);
        }
        if let Some(dir) = self.paths.cache_dir {
            config.cache_dir = base.join(dir);
        }
        if let Some(site) = self.site {
            config.site = site;
        }
        if let Some(lines) = self.preamble_lines {
            config.read_options.preamble_lines = lines;
        }
        if let Some(year_length) = self.year_length {
            if year_length == 0 {
                return Err(Error::Config("year_length must be at least 1".into()));
            }
            config.year_length = year_length;
        }
        if let Some(policy) = self.invalidation {
            config.invalidation = policy;
        }

        let config_error = |e: FormulaError| Error::Config(e.to_string());
        let formulas =
            FormulaTable::from_expressions(&self.formulas).map_err(config_error)?;
        for (name, formula) in formulas.iter() {
            config
                .formulas
                .insert(name, formula.clone())
                .map_err(config_error)?;
        }

        for (name, entry) in self.variables {
            config
                .metadata
                .variables
                .insert(name, VariableInfo::new(entry.title, entry.units));
        }

        for (tag, entry) in self.models {
            let color = entry
                .color
                .parse::<Color>()
                .map_err(|e| Error::Config(format!("model {}: {}", tag, e)))?;
            if !config.models.contains(&tag) {
                config.models.push(tag.clone());
            }
            config.metadata.models.insert(
                tag.clone(),
                ModelStyle {
                    name: entry.name.unwrap_or_else(|| tag.clone()),
                    color,
                },
            );
        }

        for (tag, entry) in self.experiments {
            let line_style = entry
                .line_style
                .parse::<LineStyle>()
                .map_err(|e| Error::Config(format!("experiment {}: {}", tag, e)))?;
            config.metadata.experiments.insert(
                tag.clone(),
                ExperimentStyle {
                    name: entry.name.unwrap_or_else(|| tag.clone()),
                    line_style,
                },
            );
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gday_series_core::{Climate, Treatment};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builtin_formulas_parse() {
        let formulas = builtin_formulas().unwrap();
        assert_eq!(formulas.len(), DEFAULT_VARIABLES.len());
        for &(name, expr, ..) in DEFAULT_VARIABLES {
            assert_eq!(formulas.get(name).unwrap().to_string(), expr);
        }
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.read_options.preamble_lines, 3);
        assert_eq!(config.year_length, 365);
        assert_eq!(config.invalidation, InvalidationPolicy::Never);
        assert_eq!(config.formulas.len(), DEFAULT_VARIABLES.len());
        assert_eq!(
            config.formulas.get("leafAl").unwrap().to_string(),
            "100 * GL / NPP"
        );
        assert_eq!(
            config.models,
            vec!["FIXED", "ALLOMETRIC", "MAXIMIZEGPP", "MAXIMIZEWOOD"]
        );
        assert_eq!(config.metadata.variable("leafAl").units, "%");
    }

    #[test]
    fn test_source_naming() {
        let config = Config::default();
        let exp = Experiment::new(Treatment::Elevated, Climate::Average);
        assert_eq!(
            config.source("ALLOMETRIC", exp).file_name(),
            "D1GDAYEUCALLOMETRICELEAVG.csv"
        );
    }

    #[test]
    fn test_from_toml_overrides() {
        let text = r##"
site = "ORNL"
preamble_lines = 0
invalidation = "source-modified"

[paths]
data_dir = "raw"
cache_dir = "/tmp/derived"

[formulas]
leafAl = "GL / NPP"
shootAl = "100 * GL + GW / NPP"

[variables.shootAl]
title = "Shoot allocation"
units = "%"

[models.PROFIT]
color = "#000080"

[experiments.AMBAVG]
name = "Ambient"
line_style = "--"
"##;
        let config = Config::from_toml_str(text, Path::new("/etc/gday")).unwrap();

        assert_eq!(config.site, "ORNL");
        assert_eq!(config.read_options.preamble_lines, 0);
        assert_eq!(config.invalidation, InvalidationPolicy::SourceModified);
        assert_eq!(config.data_dir, PathBuf::from("/etc/gday/raw"));
        assert_eq!(config.cache_dir, PathBuf::from("/tmp/derived"));
        assert_eq!(config.formulas.get("leafAl").unwrap().to_string(), "GL / NPP");
        assert!(config.formulas.contains("shootAl"));
        assert!(config.formulas.contains("woodAl"));
        assert_eq!(config.metadata.variable("shootAl").title, "Shoot allocation");
        assert_eq!(config.models.last().map(String::as_str), Some("PROFIT"));
        assert_eq!(config.metadata.model("PROFIT").name, "PROFIT");
        assert_eq!(config.metadata.model("PROFIT").color, Color::rgb(0, 0, 0x80));
        assert_eq!(
            config.metadata.experiment("AMBAVG").line_style,
            LineStyle::Dashed
        );
    }

    #[test]
    fn test_from_toml_rejects_bad_entries() {
        let base = Path::new("");
        for text in [
            "[formulas]\nbad = \"GL *\"",
            "[formulas]\na__b = \"GPP\"",
            "[formulas]\n\"../up\" = \"GPP\"",
            "[models.X]\ncolor = \"plaid\"",
            "[experiments.X]\nline_style = \"wavy\"",
            "year_length = 0",
            "unknown_key = 1",
            "invalidation = \"sometimes\"",
        ] {
            assert!(
                matches!(Config::from_toml_str(text, base), Err(Error::Config(_))),
                "accepted: {text}"
            );
        }
    }
}
