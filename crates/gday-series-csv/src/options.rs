//! CSV options

/// Options for reading raw model output files
#[derive(Debug, Clone)]
pub struct RawReadOptions {
    /// Field delimiter (default: comma)
    pub delimiter: u8,
    /// Non-data lines before the header row (default: 3)
    pub preamble_lines: usize,
}

impl Default for RawReadOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            preamble_lines: 3,
        }
    }
}

/// Options for writing series files
#[derive(Debug, Clone)]
pub struct SeriesWriteOptions {
    /// Line terminator
    pub line_terminator: LineTerminator,
}

impl Default for SeriesWriteOptions {
    fn default() -> Self {
        Self {
            line_terminator: LineTerminator::LF,
        }
    }
}

/// Line terminator type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineTerminator {
    /// Unix-style (LF)
    LF,
    /// Windows-style (CRLF)
    CRLF,
}
