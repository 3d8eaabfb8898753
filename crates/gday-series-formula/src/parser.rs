//! Formula parser
//!
//! Parses the textual form of a formula, e.g. `100 * GL / NPP`. Terms are
//! folded strictly left to right, so `GR + GCR * 100 / NPP` means
//! `((GR + GCR) * 100) / NPP`.

use crate::ast::{Formula, Item, Operand, Operator};
use crate::error::{FormulaError, FormulaResult};

/// Parse a formula string
///
/// # Example
/// ```rust
/// use gday_series_formula::parse_formula;
///
/// let formula = parse_formula("100 * GL / NPP").unwrap();
/// assert_eq!(formula.columns(), vec!["GL", "NPP"]);
/// ```
pub fn parse_formula(formula: &str) -> FormulaResult<Formula> {
    let mut scanner = Scanner::new(formula);
    let mut items = Vec::new();

    loop {
        let expect_operand = !matches!(items.last(), Some(Item::Operand(_)));
        match scanner.next_token(expect_operand)? {
            Some(item) => items.push(item),
            None => break,
        }
    }

    Formula::from_sequence(items)
}

/// Token scanner
struct Scanner<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    // === Token scanning ===

    fn next_token(&mut self, expect_operand: bool) -> FormulaResult<Option<Item>> {
        self.skip_whitespace();

        let c = match self.peek_char() {
            Some(c) => c,
            None => return Ok(None),
        };

        // Negative literal where an operand is due, e.g. `GL * -1`
        if c == '-' && expect_operand && self.peek_char_at(1).map_or(false, is_number_start) {
            self.advance();
            let n = self.scan_number()?;
            return Ok(Some(Item::Operand(Operand::Literal(-n))));
        }

        let op = match c {
            '+' => Some(Operator::Add),
            '-' => Some(Operator::Subtract),
            '*' => Some(Operator::Multiply),
            '/' => Some(Operator::Divide),
            _ => None,
        };
        if let Some(op) = op {
            self.advance();
            return Ok(Some(Item::Operator(op)));
        }

        if c == '"' {
            let name = self.scan_quoted()?;
            return Ok(Some(Item::Operand(Operand::Column(name))));
        }

        if c.is_ascii_digit()
            || (c == '.' && self.peek_char_at(1).map_or(false, |c| c.is_ascii_digit()))
        {
            let n = self.scan_number()?;
            return Ok(Some(Item::Operand(Operand::Literal(n))));
        }

        if c.is_ascii_alphabetic() || c == '_' {
            let name = self.scan_identifier();
            return Ok(Some(Item::Operand(Operand::Column(name))));
        }

        Err(FormulaError::Parse(format!(
            "Unexpected character '{}' at offset {}",
            c, self.pos
        )))
    }

    fn scan_quoted(&mut self) -> FormulaResult<String> {
        let start = self.pos;
        self.advance(); // Skip opening quote

        let mut s = String::new();
        loop {
            match self.peek_char() {
                Some('"') if self.peek_char_at(1) == Some('"') => {
                    s.push('"');
                    self.advance();
                    self.advance();
                }
                Some('"') => {
                    self.advance();
                    break;
                }
                Some(c) => {
                    s.push(c);
                    self.advance();
                }
                None => {
                    return Err(FormulaError::Parse(format!(
                        "Unterminated column name starting at offset {}",
                        start
                    )))
                }
            }
        }

        if s.is_empty() {
            return Err(FormulaError::Parse("Empty column name".into()));
        }
        Ok(s)
    }

    fn scan_number(&mut self) -> FormulaResult<f64> {
        let start = self.pos;

        // Integer part
        while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
            self.advance();
        }

        // Decimal part
        if self.peek_char() == Some('.') {
            self.advance();
            while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        // Exponent part
        if self.peek_char().map_or(false, |c| c == 'e' || c == 'E') {
            self.advance();
            if self.peek_char().map_or(false, |c| c == '+' || c == '-') {
                self.advance();
            }
            while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        let num_str = &self.input[start..self.pos];
        num_str
            .parse()
            .map_err(|_| FormulaError::Parse(format!("Invalid number '{}'", num_str)))
    }

    fn scan_identifier(&mut self) -> String {
        let start = self.pos;
        while self
            .peek_char()
            .map_or(false, |c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
        {
            self.advance();
        }
        self.input[start..self.pos].to_string()
    }

    // === Helper methods ===

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_char_at(&self, offset: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(offset)
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            self.pos += c.len_utf8();
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek_char().map_or(false, |c| c.is_whitespace()) {
            self.advance();
        }
    }
}

fn is_number_start(c: char) -> bool {
    c.is_ascii_digit() || c == '.'
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_single_column() -> FormulaResult<()> {
        assert_eq!(parse_formula("NPP")?, Formula::start("NPP")?);
        assert_eq!(parse_formula("  GPP  ")?, Formula::start("GPP")?);
        Ok(())
    }

    #[test]
    fn test_parse_allocation() -> FormulaResult<()> {
        let formula = parse_formula("100 * GL / NPP")?;
        assert_eq!(
            formula,
            Formula::start(100.0)?
                .then(Operator::Multiply, "GL")?
                .then(Operator::Divide, "NPP")?
        );
        Ok(())
    }

    #[test]
    fn test_parse_numbers() -> FormulaResult<()> {
        assert_eq!(parse_formula("3.5")?, Formula::start(3.5)?);
        assert_eq!(parse_formula(".5")?, Formula::start(0.5)?);
        assert_eq!(parse_formula("1e3")?, Formula::start(1000.0)?);
        assert_eq!(
            parse_formula("GL * -1")?,
            Formula::start("GL")?.then(Operator::Multiply, -1.0)?
        );
        Ok(())
    }

    #[test]
    fn test_parse_binary_minus_between_operands() -> FormulaResult<()> {
        assert_eq!(
            parse_formula("GPP-1")?,
            Formula::start("GPP")?.then(Operator::Subtract, 1.0)?
        );
        Ok(())
    }

    #[test]
    fn test_parse_leading_operator() {
        let formula = parse_formula("- GL").unwrap();
        assert_eq!(formula.terms()[0].op, Operator::Subtract);
    }

    #[test]
    fn test_parse_quoted_column() -> FormulaResult<()> {
        assert_eq!(
            parse_formula("\"leaf C\" / 2")?,
            Formula::start("leaf C")?.then(Operator::Divide, 2.0)?
        );
        assert_eq!(parse_formula("\"a\"\"b\"")?, Formula::start("a\"b")?);
        Ok(())
    }

    #[test]
    fn test_parse_overflowing_literal() {
        // Overflows to infinity, which could not be written back
        assert!(matches!(parse_formula("GL * 1e400"), Err(FormulaError::Parse(_))));
        assert!(matches!(parse_formula("-1e999"), Err(FormulaError::Parse(_))));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(parse_formula(""), Err(FormulaError::Parse(_))));
        assert!(matches!(parse_formula("GL NPP"), Err(FormulaError::Parse(_))));
        assert!(matches!(parse_formula("GL * / NPP"), Err(FormulaError::Parse(_))));
        assert!(matches!(parse_formula("GL *"), Err(FormulaError::Parse(_))));
        assert!(matches!(parse_formula("GL ^ 2"), Err(FormulaError::Parse(_))));
        assert!(matches!(parse_formula("\"GL"), Err(FormulaError::Parse(_))));
        assert!(matches!(parse_formula("(GL)"), Err(FormulaError::Parse(_))));
    }

    #[test]
    fn test_display_reparses() {
        for text in [
            "100 * GL / NPP",
            "GR + GCR * 100 / NPP",
            "GL * -1",
            "- GL",
            "GL * 1e300",
            "\"leaf C\" / 0.001",
        ] {
            let formula = parse_formula(text).unwrap();
            assert_eq!(parse_formula(&formula.to_string()).unwrap(), formula);
        }
    }
}
