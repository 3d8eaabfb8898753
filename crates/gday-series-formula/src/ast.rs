//! Formula representation
//!
//! A formula is a flat sequence of terms folded left to right from zero:
//! `100 * GL / NPP` is `((0 + 100) * GL) / NPP`. There is no operator
//! precedence.

use std::fmt;

use crate::error::{FormulaError, FormulaResult};

/// A formula operand
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// Numeric literal, broadcast over every row
    Literal(f64),
    /// Raw column reference
    Column(String),
}

impl Operand {
    /// Create a column reference
    pub fn column<S: Into<String>>(name: S) -> Self {
        Operand::Column(name.into())
    }
}

impl From<f64> for Operand {
    fn from(value: f64) -> Self {
        Operand::Literal(value)
    }
}

impl From<&str> for Operand {
    fn from(name: &str) -> Self {
        Operand::Column(name.to_string())
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Literal(n) => write!(f, "{}", n),
            Operand::Column(name) if is_bare_name(name) => f.write_str(name),
            Operand::Column(name) => write!(f, "\"{}\"", name.replace('"', "\"\"")),
        }
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    /// Apply the operator to two values
    pub fn apply(self, left: f64, right: f64) -> f64 {
        match self {
            Operator::Add => left + right,
            Operator::Subtract => left - right,
            Operator::Multiply => left * right,
            Operator::Divide => left / right,
        }
    }

    /// Operator symbol
    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Subtract => '-',
            Operator::Multiply => '*',
            Operator::Divide => '/',
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// One step of the fold: `acc = op(acc, operand)`
#[derive(Debug, Clone, PartialEq)]
pub struct Term {
    pub op: Operator,
    pub operand: Operand,
}

/// An item of the alternating operand/operator sequence
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Operand(Operand),
    Operator(Operator),
}

impl From<Operand> for Item {
    fn from(operand: Operand) -> Self {
        Item::Operand(operand)
    }
}

impl From<Operator> for Item {
    fn from(op: Operator) -> Self {
        Item::Operator(op)
    }
}

impl From<f64> for Item {
    fn from(value: f64) -> Self {
        Item::Operand(Operand::Literal(value))
    }
}

impl From<&str> for Item {
    fn from(name: &str) -> Self {
        Item::Operand(Operand::column(name))
    }
}

/// A derived-variable recipe
#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    terms: Vec<Term>,
}

impl Formula {
    /// Start a formula with its first operand (implicit leading `+`)
    pub fn start<O: Into<Operand>>(operand: O) -> FormulaResult<Self> {
        Ok(Self {
            terms: vec![Term {
                op: Operator::Add,
                operand: finite(operand.into())?,
            }],
        })
    }

    /// Append a term
    pub fn then<O: Into<Operand>>(mut self, op: Operator, operand: O) -> FormulaResult<Self> {
        self.terms.push(Term {
            op,
            operand: finite(operand.into())?,
        });
        Ok(self)
    }

    /// Build from an alternating operand/operator sequence
    ///
    /// A leading operand is combined with `+`; a leading operator applies to
    /// the zero accumulator. Operands and operators must alternate and the
    /// sequence must end with an operand.
    pub fn from_sequence<I, T>(items: I) -> FormulaResult<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<Item>,
    {
        let mut terms = Vec::new();
        let mut pending: Option<Operator> = None;
        let mut expect_operand = true;

        for (pos, item) in items.into_iter().map(Into::into).enumerate() {
            match item {
                Item::Operand(operand) => {
                    if !expect_operand {
                        return Err(FormulaError::Parse(format!(
                            "Expected operator at position {}, got operand {}",
                            pos, operand
                        )));
                    }
                    terms.push(Term {
                        op: pending.take().unwrap_or(Operator::Add),
                        operand: finite(operand)?,
                    });
                    expect_operand = false;
                }
                Item::Operator(op) => {
                    if pending.is_some() {
                        return Err(FormulaError::Parse(format!(
                            "Expected operand at position {}, got operator {}",
                            pos, op
                        )));
                    }
                    pending = Some(op);
                    expect_operand = true;
                }
            }
        }

        if let Some(op) = pending {
            return Err(FormulaError::Parse(format!(
                "Formula ends with operator {}",
                op
            )));
        }
        if terms.is_empty() {
            return Err(FormulaError::Parse("Formula is empty".into()));
        }

        Ok(Self { terms })
    }

    /// Terms in fold order
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// Distinct column names referenced, in first-use order
    pub fn columns(&self) -> Vec<&str> {
        let mut columns: Vec<&str> = Vec::new();
        for term in &self.terms {
            if let Operand::Column(name) = &term.operand {
                if !columns.contains(&name.as_str()) {
                    columns.push(name);
                }
            }
        }
        columns
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, term) in self.terms.iter().enumerate() {
            match (i, term.op) {
                (0, Operator::Add) => write!(f, "{}", term.operand)?,
                (0, op) => write!(f, "{} {}", op, term.operand)?,
                (_, op) => write!(f, " {} {}", op, term.operand)?,
            }
        }
        Ok(())
    }
}

/// Reject `NaN` and infinite literals, which have no textual form
fn finite(operand: Operand) -> FormulaResult<Operand> {
    match operand {
        Operand::Literal(n) if !n.is_finite() => Err(FormulaError::Parse(format!(
            "Literal {} is not a finite number",
            n
        ))),
        operand => Ok(operand),
    }
}

/// Whether a column name can be written without quotes
pub(crate) fn is_bare_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}
