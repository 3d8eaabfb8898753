//! # gday-series-chart
//!
//! Renderer-independent figure descriptions for gday-series plots: panels of
//! styled lines and shaded bands, with axis titles and legends. Enable the
//! `serde` feature to serialise figures for an external renderer.

mod axis;
mod figure;
mod legend;
mod series;

pub use axis::Axis;
pub use figure::{Figure, Panel, PanelKind};
pub use legend::{Legend, LegendPosition};
pub use series::{Band, SeriesLine};
