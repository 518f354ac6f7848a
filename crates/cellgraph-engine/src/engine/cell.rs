//! Cell data structures for the spreadsheet grid.
//!
//! This module provides the core data types for representing cells:
//! - [`Contents`] - What the user entered (empty, number, text, or formula)
//! - [`Value`] - What a cell evaluates to (number, text, or an evaluation error)
//! - [`Cell`] - A stored cell: entry text, contents and cached value
//! - [`Grid`] - Sparse storage for non-empty cells (backed by `DashMap`)

use dashmap::DashMap;
use std::collections::BTreeSet;
use std::fmt;

use super::eval::EvalError;
use super::formula::{FormatError, Formula};

/// The contents of a cell as entered.
#[derive(Clone, Debug, PartialEq)]
pub enum Contents {
    Empty,
    Number(f64),
    Text(String),
    Formula(Formula),
}

impl Contents {
    /// Classify user input with the default formula parser.
    pub fn from_input(input: &str) -> Result<Contents, FormatError> {
        Self::from_input_with(input, |name| name.to_ascii_uppercase(), |_| true)
    }

    /// Classify user input.
    /// - Empty string or whitespace -> Empty
    /// - Starts with '=' -> Formula (without the '='), parsed with the given hooks
    /// - Finite number -> Number
    /// - Otherwise -> Text
    pub fn from_input_with<N, V>(
        input: &str,
        normalize: N,
        is_valid: V,
    ) -> Result<Contents, FormatError>
    where
        N: Fn(&str) -> String,
        V: Fn(&str) -> bool,
    {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(Contents::Empty);
        }

        if let Some(formula) = trimmed.strip_prefix('=') {
            return Formula::parse_with(formula, normalize, is_valid).map(Contents::Formula);
        }

        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(Contents::Number(n)),
            _ => Ok(Contents::Text(trimmed.to_string())),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Contents::Empty)
    }

    pub fn formula(&self) -> Option<&Formula> {
        match self {
            Contents::Formula(formula) => Some(formula),
            _ => None,
        }
    }

    /// Cells these contents read from. Empty for anything but a formula.
    pub fn referenced_cells(&self) -> BTreeSet<String> {
        self.formula()
            .map(Formula::referenced_cells)
            .unwrap_or_default()
    }

    /// Get a display string for the contents (for editing).
    pub fn to_input_string(&self) -> String {
        match self {
            Contents::Empty => String::new(),
            Contents::Number(n) => n.to_string(),
            Contents::Text(s) => s.clone(),
            Contents::Formula(formula) => format!("={}", formula),
        }
    }
}

impl fmt::Display for Contents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_input_string())
    }
}

/// The evaluated value of a cell.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
    Error(EvalError),
}

impl Value {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Text(String::new())
    }
}

impl From<Result<f64, EvalError>> for Value {
    fn from(result: Result<f64, EvalError>) -> Self {
        match result {
            Ok(n) => Value::Number(n),
            Err(e) => Value::Error(e),
        }
    }
}

/// A non-empty cell in the spreadsheet grid.
#[derive(Clone, Debug)]
pub struct Cell {
    /// Trimmed text as the user entered it; this is what gets saved.
    pub entry: String,
    pub contents: Contents,
    /// Last computed value. Literal cells hold their literal.
    pub value: Value,
}

impl Cell {
    /// Create a cell from its entry text and classified contents.
    /// Formula cells start with a placeholder value until recomputed.
    pub fn new(entry: &str, contents: Contents) -> Cell {
        let value = match &contents {
            Contents::Number(n) => Value::Number(*n),
            Contents::Text(s) => Value::Text(s.clone()),
            Contents::Empty | Contents::Formula(_) => Value::default(),
        };
        Cell {
            entry: entry.trim().to_string(),
            contents,
            value,
        }
    }
}

/// Sparse grid storage keyed by normalized cell name.
pub type Grid = DashMap<String, Cell>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_input_classifies() {
        assert_eq!(Contents::from_input("   ").unwrap(), Contents::Empty);
        assert_eq!(Contents::from_input(" 5 ").unwrap(), Contents::Number(5.0));
        assert_eq!(Contents::from_input("-2.5e1").unwrap(), Contents::Number(-25.0));
        assert_eq!(
            Contents::from_input("hello world").unwrap(),
            Contents::Text("hello world".to_string())
        );
        assert!(matches!(
            Contents::from_input("=a1*2").unwrap(),
            Contents::Formula(_)
        ));
    }

    #[test]
    fn test_non_finite_numbers_are_text() {
        assert_eq!(
            Contents::from_input("NaN").unwrap(),
            Contents::Text("NaN".to_string())
        );
        assert_eq!(
            Contents::from_input("inf").unwrap(),
            Contents::Text("inf".to_string())
        );
    }

    #[test]
    fn test_bad_formula_is_an_error() {
        assert!(Contents::from_input("=1+").is_err());
        assert!(Contents::from_input("=").is_err());
    }

    #[test]
    fn test_to_input_string() {
        let formula = Contents::from_input("= a1 + 1").unwrap();
        assert_eq!(formula.to_input_string(), "=A1+1");
        assert_eq!(Contents::Number(5.0).to_input_string(), "5");
        assert_eq!(Contents::Empty.to_input_string(), "");
    }

    #[test]
    fn test_cell_new_sets_literal_values() {
        let cell = Cell::new(" 7 ", Contents::Number(7.0));
        assert_eq!(cell.entry, "7");
        assert_eq!(cell.value, Value::Number(7.0));

        let text = Cell::new("hi", Contents::Text("hi".to_string()));
        assert_eq!(text.value, Value::Text("hi".to_string()));
    }

    #[test]
    fn test_referenced_cells_only_for_formulas() {
        assert!(Contents::Number(1.0).referenced_cells().is_empty());
        let formula = Contents::from_input("=B2+c3").unwrap();
        let refs: Vec<_> = formula.referenced_cells().into_iter().collect();
        assert_eq!(refs, vec!["B2", "C3"]);
    }
}
