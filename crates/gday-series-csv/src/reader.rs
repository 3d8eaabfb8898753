//! CSV readers

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use crate::error::{CsvError, CsvResult};
use crate::options::RawReadOptions;
use gday_series_core::RawTable;

/// Reader for raw model output files
///
/// Layout: `preamble_lines` free-form lines, a header row of column names,
/// then one row of numbers per simulated day.
pub struct RawTableReader;

impl RawTableReader {
    /// Read a raw output file
    pub fn read_file<P: AsRef<Path>>(path: P, options: &RawReadOptions) -> CsvResult<RawTable> {
        let file = File::open(path)?;
        Self::read(file, options)
    }

    /// Read raw output from a reader
    pub fn read<R: Read>(reader: R, options: &RawReadOptions) -> CsvResult<RawTable> {
        let mut reader = BufReader::new(reader);

        // Skip the preamble
        let mut line = String::new();
        for _ in 0..options.preamble_lines {
            line.clear();
            if reader.read_line(&mut line)? == 0 {
                return Err(CsvError::MissingHeader {
                    preamble: options.preamble_lines,
                });
            }
        }

        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader
            .headers()?
            .iter()
            .map(|h| h.trim_start_matches('#').trim().to_string())
            .collect();
        if headers.is_empty() || headers.iter().all(String::is_empty) {
            return Err(CsvError::MissingHeader {
                preamble: options.preamble_lines,
            });
        }

        let mut columns: Vec<Vec<f64>> = vec![Vec::new(); headers.len()];

        // Read records
        for (row, result) in csv_reader.records().enumerate() {
            let record = result?;

            for (col, field) in record.iter().enumerate() {
                let value = parse_value(field).ok_or_else(|| CsvError::Parse {
                    row,
                    column: headers[col].clone(),
                    message: format!("'{}' is not a number", field),
                })?;
                columns[col].push(value);
            }
        }

        let table = RawTable::from_columns(headers.into_iter().zip(columns))?;
        tracing::debug!(
            rows = table.row_count(),
            columns = table.column_count(),
            "read raw table"
        );
        Ok(table)
    }
}

/// Reader for single-column series files
pub struct SeriesReader;

impl SeriesReader {
    /// Read a series file
    pub fn read_file<P: AsRef<Path>>(path: P) -> CsvResult<Vec<f64>> {
        let file = File::open(path)?;
        Self::read(file)
    }

    /// Read a series from a reader
    pub fn read<R: Read>(reader: R) -> CsvResult<Vec<f64>> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut values = Vec::new();
        for (row, result) in csv_reader.records().enumerate() {
            let record = result?;
            let field = record.get(0).unwrap_or("");
            let value = parse_value(field).ok_or_else(|| CsvError::Parse {
                row,
                column: "0".into(),
                message: format!("'{}' is not a number", field),
            })?;
            values.push(value);
        }

        Ok(values)
    }
}

/// Parse a numeric field; empty fields and `NaN` are missing values
fn parse_value(field: &str) -> Option<f64> {
    let field = field.trim();

    if field.is_empty() || field.eq_ignore_ascii_case("nan") {
        return Some(f64::NAN);
    }

    field.parse::<f64>().ok()
}
