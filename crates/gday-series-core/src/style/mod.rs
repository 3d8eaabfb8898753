//! Plot styling types
//!
//! - [`Color`] - Line and band colors
//! - [`LineStyle`] - Dash patterns

mod color;
mod line;

pub use color::Color;
pub use line::LineStyle;
