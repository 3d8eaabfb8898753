//! CSV writer

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::CsvResult;
use crate::options::{LineTerminator, SeriesWriteOptions};

/// Writer for single-column series files (no header)
pub struct SeriesWriter;

impl SeriesWriter {
    /// Write values to a file
    pub fn write_file<P: AsRef<Path>>(
        values: &[f64],
        path: P,
        options: &SeriesWriteOptions,
    ) -> CsvResult<()> {
        let file = File::create(path)?;
        Self::write(values, file, options)
    }

    /// Write values to a writer
    ///
    /// Values are written in shortest round-trip form, so reading them back
    /// reproduces the same bits. Missing values are written as `NaN`.
    pub fn write<W: Write>(
        values: &[f64],
        writer: W,
        options: &SeriesWriteOptions,
    ) -> CsvResult<()> {
        let terminator = match options.line_terminator {
            LineTerminator::LF => csv::Terminator::Any(b'\n'),
            LineTerminator::CRLF => csv::Terminator::CRLF,
        };

        let mut csv_writer = csv::WriterBuilder::new()
            .has_headers(false)
            .terminator(terminator)
            .from_writer(writer);

        for value in values {
            csv_writer.write_record([value.to_string()])?;
        }

        csv_writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::SeriesReader;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_write_series() {
        let mut buf = Vec::new();
        SeriesWriter::write(&[1.0, 0.1, f64::NAN], &mut buf, &SeriesWriteOptions::default())
            .unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "1\n0.1\nNaN\n");
    }

    #[test]
    fn test_write_crlf() {
        let mut buf = Vec::new();
        let options = SeriesWriteOptions {
            line_terminator: LineTerminator::CRLF,
        };
        SeriesWriter::write(&[2.5], &mut buf, &options).unwrap();
        assert_eq!(buf, b"2.5\r\n");
    }

    #[test]
    fn test_file_preserves_bits() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("series.csv");
        let values = vec![1.0 / 3.0, 1e-300, -0.0, 123456.789];

        SeriesWriter::write_file(&values, &path, &SeriesWriteOptions::default()).unwrap();
        let read = SeriesReader::read_file(&path).unwrap();

        let bits = |v: &[f64]| v.iter().map(|x| x.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(&read), bits(&values));
    }
}
