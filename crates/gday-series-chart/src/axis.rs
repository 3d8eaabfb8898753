//! Axis types

/// Panel axis
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Axis {
    /// Axis title
    pub title: Option<String>,
    /// Minimum value
    pub minimum: Option<f64>,
    /// Maximum value
    pub maximum: Option<f64>,
}

impl Axis {
    /// Create a new axis
    pub fn new() -> Self {
        Self::default()
    }

    /// Set axis title
    pub fn with_title<S: Into<String>>(mut self, title: S) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set axis bounds
    pub fn with_bounds(mut self, min: f64, max: f64) -> Self {
        self.minimum = Some(min);
        self.maximum = Some(max);
        self
    }

    /// Set bounds to the range of `values`, padded by 5% each side
    ///
    /// Missing values are ignored. Leaves the bounds unset when no value is
    /// finite.
    pub fn fit<'a, I>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = &'a f64>,
    {
        let (min, max) = values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        if min > max {
            return self;
        }

        let pad = if max > min { (max - min) * 0.05 } else { 1.0 };
        self.minimum = Some(min - pad);
        self.maximum = Some(max + pad);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_ignores_missing() {
        let axis = Axis::new().fit(&[0.0, f64::NAN, 10.0]);
        assert_eq!(axis.minimum, Some(-0.5));
        assert_eq!(axis.maximum, Some(10.5));
    }

    #[test]
    fn test_fit_flat_and_empty() {
        let axis = Axis::new().fit(&[3.0, 3.0]);
        assert_eq!(axis.minimum, Some(2.0));
        assert_eq!(axis.maximum, Some(4.0));

        let axis = Axis::new().fit(&[f64::NAN]);
        assert_eq!(axis.minimum, None);
    }
}
