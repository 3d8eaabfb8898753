//! Source identifiers
//!
//! A source is one raw model output file: one allocation model run under one
//! experiment. The simulation driver names them
//! `D1GDAY{SITE}{MODEL}{TREATMENT}{CLIMATE}.csv`, e.g. `D1GDAYEUCFIXEDAMBAVG.csv`.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// CO2 treatment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Treatment {
    /// Ambient CO2
    Ambient,
    /// Elevated CO2
    Elevated,
}

impl Treatment {
    /// File name tag
    pub fn tag(&self) -> &'static str {
        match self {
            Treatment::Ambient => "AMB",
            Treatment::Elevated => "ELE",
        }
    }
}

/// Meteorological forcing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Climate {
    /// Repeated average year
    Average,
    /// Observed variable years
    Variable,
}

impl Climate {
    /// File name tag
    pub fn tag(&self) -> &'static str {
        match self {
            Climate::Average => "AVG",
            Climate::Variable => "VAR",
        }
    }
}

/// Experimental treatment: CO2 level crossed with climate forcing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Experiment {
    pub treatment: Treatment,
    pub climate: Climate,
}

impl Experiment {
    /// All four standard experiments, ambient first
    pub const ALL: [Experiment; 4] = [
        Experiment::new(Treatment::Ambient, Climate::Average),
        Experiment::new(Treatment::Ambient, Climate::Variable),
        Experiment::new(Treatment::Elevated, Climate::Average),
        Experiment::new(Treatment::Elevated, Climate::Variable),
    ];

    /// Create an experiment
    pub const fn new(treatment: Treatment, climate: Climate) -> Self {
        Self { treatment, climate }
    }

    /// File name tag, e.g. `AMBAVG`
    pub fn tag(&self) -> String {
        format!("{}{}", self.treatment.tag(), self.climate.tag())
    }
}

impl fmt::Display for Experiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl FromStr for Experiment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let upper = s.trim().to_ascii_uppercase();
        Experiment::ALL
            .into_iter()
            .find(|e| e.tag() == upper)
            .ok_or_else(|| Error::InvalidSource(format!("unknown experiment '{}'", s)))
    }
}

/// Identifies one raw output file
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId {
    file_name: String,
}

impl SourceId {
    /// Name the output of one model run using the simulation driver's convention
    pub fn model_run(site: &str, model: &str, experiment: Experiment) -> Self {
        Self {
            file_name: format!(
                "D1GDAY{}{}{}.csv",
                site.to_ascii_uppercase(),
                model.to_ascii_uppercase(),
                experiment.tag()
            ),
        }
    }

    /// Use an arbitrary file name
    ///
    /// The name must be a bare file name, not a path.
    pub fn from_file_name<S: Into<String>>(file_name: S) -> Result<Self> {
        let file_name = file_name.into();
        if file_name.is_empty()
            || file_name.contains('/')
            || file_name.contains('\\')
            || file_name == "."
            || file_name == ".."
        {
            return Err(Error::InvalidSource(file_name));
        }
        Ok(Self { file_name })
    }

    /// File name within the data directory
    pub fn file_name(&self) -> &str {
        &self.file_name
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.file_name)
    }
}

impl FromStr for SourceId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        SourceId::from_file_name(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_run_naming() {
        let exp = Experiment::new(Treatment::Ambient, Climate::Average);
        let source = SourceId::model_run("euc", "Fixed", exp);
        assert_eq!(source.file_name(), "D1GDAYEUCFIXEDAMBAVG.csv");

        let exp = Experiment::new(Treatment::Elevated, Climate::Variable);
        let source = SourceId::model_run("EUC", "MAXIMIZEGPP", exp);
        assert_eq!(source.to_string(), "D1GDAYEUCMAXIMIZEGPPELEVAR.csv");
    }

    #[test]
    fn test_experiment_parse() {
        assert_eq!(
            "eleavg".parse::<Experiment>().unwrap(),
            Experiment::new(Treatment::Elevated, Climate::Average)
        );
        assert!("AMB".parse::<Experiment>().is_err());
    }

    #[test]
    fn test_source_rejects_paths() {
        assert!(SourceId::from_file_name("../secret.csv").is_err());
        assert!(SourceId::from_file_name("").is_err());
        assert!(SourceId::from_file_name("run.csv").is_ok());
    }
}
