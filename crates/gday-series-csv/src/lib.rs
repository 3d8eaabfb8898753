//! # gday-series-csv
//!
//! CSV readers and writers for gday-series: raw model output tables with a
//! fixed preamble, and the single-column series files used as cache
//! artifacts.

mod error;
mod options;
mod reader;
mod writer;

pub use error::{CsvError, CsvResult};
pub use options::{LineTerminator, RawReadOptions, SeriesWriteOptions};
pub use reader::{RawTableReader, SeriesReader};
pub use writer::SeriesWriter;
