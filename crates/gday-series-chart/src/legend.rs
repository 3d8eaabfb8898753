//! Legend types

/// Panel legend
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Legend {
    /// Position
    pub position: LegendPosition,
    /// Number of entry columns
    pub columns: usize,
}

impl Legend {
    /// Create a new single-column legend
    pub fn new(position: LegendPosition) -> Self {
        Self {
            position,
            columns: 1,
        }
    }

    /// Set the number of entry columns
    pub fn with_columns(mut self, columns: usize) -> Self {
        self.columns = columns.max(1);
        self
    }
}

/// Legend position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum LegendPosition {
    #[default]
    Best,
    UpperRight,
    UpperLeft,
    LowerRight,
    LowerLeft,
    Below,
}
