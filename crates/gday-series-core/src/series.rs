//! Derived series

/// Values of one derived variable for one source, one per simulated day.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedSeries {
    variable: String,
    source: String,
    values: Vec<f64>,
}

impl DerivedSeries {
    /// Create a new series
    pub fn new<V, S>(variable: V, source: S, values: Vec<f64>) -> Self
    where
        V: Into<String>,
        S: Into<String>,
    {
        Self {
            variable: variable.into(),
            source: source.into(),
            values,
        }
    }

    /// Variable name the series was derived for
    pub fn variable(&self) -> &str {
        &self.variable
    }

    /// Source file name the series was derived from
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Daily values
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Consume the series, returning its values
    pub fn into_values(self) -> Vec<f64> {
        self.values
    }

    /// Number of values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the series has no values
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of missing (`NaN`) values
    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_nan()).count()
    }

    /// Compare values bit for bit, treating `NaN` payloads as significant
    pub fn bitwise_eq(&self, other: &DerivedSeries) -> bool {
        self.values.len() == other.values.len()
            && self
                .values
                .iter()
                .zip(&other.values)
                .all(|(a, b)| a.to_bits() == b.to_bits())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let series = DerivedSeries::new("leafAl", "D1GDAYEUCFIXEDAMBAVG.csv", vec![1.0, f64::NAN]);
        assert_eq!(series.variable(), "leafAl");
        assert_eq!(series.source(), "D1GDAYEUCFIXEDAMBAVG.csv");
        assert_eq!(series.len(), 2);
        assert_eq!(series.missing_count(), 1);
        assert!(!series.is_empty());
    }

    #[test]
    fn test_bitwise_eq_handles_nan() {
        let a = DerivedSeries::new("x", "s", vec![1.0, f64::NAN]);
        let b = DerivedSeries::new("x", "s", vec![1.0, f64::NAN]);
        assert_ne!(a, b);
        assert!(a.bitwise_eq(&b));
        assert!(!a.bitwise_eq(&DerivedSeries::new("x", "s", vec![1.0])));
    }
}
