//! Cell name parsing, formatting and validation.
//!
//! Provides bidirectional conversion between spreadsheet-style cell names
//! (e.g., "A1", "B2", "AA10") and zero-indexed column/row coordinates, plus
//! the default naming rules a spreadsheet is built with.
//!
//! # Examples
//!
//! ```
//! use cellgraph_engine::engine::{CellRef, NameRules};
//!
//! let cell = CellRef::from_str("b3").unwrap();
//! assert_eq!(cell.col, 1); // 0-indexed
//! assert_eq!(cell.row, 2);
//! assert_eq!(cell.to_string(), "B3");
//!
//! let rules = NameRules::default();
//! assert!(rules.is_valid("Z99"));
//! assert!(!rules.is_valid("A100"));
//! ```

use regex::Regex;
use serde::Deserialize;
use std::fmt;
use std::sync::OnceLock;

/// A reference to a cell by column and row indices (0-indexed).
#[derive(Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct CellRef {
    pub row: usize,
    pub col: usize,
}

impl CellRef {
    pub fn new(col: usize, row: usize) -> CellRef {
        CellRef { row, col }
    }

    /// Parse a cell reference from spreadsheet notation (e.g., "A1", "b2", "AA10").
    /// Returns None if the input is invalid.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(name: &str) -> Option<CellRef> {
        Self::parse_a1(name)
    }

    fn parse_a1(name: &str) -> Option<CellRef> {
        let caps = name_re().captures(name)?;
        let letters = &caps["letters"];
        let numbers = &caps["numbers"];

        let mut col_acc = 0usize;
        for c in letters.to_ascii_uppercase().bytes() {
            let digit = (c - b'A') as usize + 1;
            col_acc = col_acc.checked_mul(26)?.checked_add(digit)?;
        }
        let col = col_acc.checked_sub(1)?;

        let row = numbers.parse::<usize>().ok()?.checked_sub(1)?;

        Some(CellRef::new(col, row))
    }

    /// Convert column index to spreadsheet-style letters (0 -> A, 25 -> Z, 26 -> AA).
    pub fn col_to_letters(col: usize) -> String {
        let mut result = String::new();
        let mut n = col as u128 + 1;
        while n > 0 {
            n -= 1;
            result.insert(0, (b'A' + (n % 26) as u8) as char);
            n /= 26;
        }
        result
    }
}

impl std::str::FromStr for CellRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_a1(s).ok_or_else(|| format!("Invalid cell reference: {}", s))
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", CellRef::col_to_letters(self.col), self.row + 1)
    }
}

fn name_re() -> &'static Regex {
    static NAME_RE: OnceLock<Regex> = OnceLock::new();
    NAME_RE.get_or_init(|| {
        Regex::new(r"^(?<letters>[A-Za-z]+)(?<numbers>[0-9]+)$")
            .expect("cell name regex must compile")
    })
}

/// Whether `name` has the basic shape of a cell name: letters followed by digits.
///
/// This is checked before any caller-supplied hooks run, so a normalizer never
/// sees arbitrary text.
pub fn is_cell_name(name: &str) -> bool {
    name_re().is_match(name)
}

/// Default naming hooks: bounded column width and row range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NameRules {
    /// Maximum number of column letters (2 allows A..ZZ).
    pub max_column_letters: usize,
    /// Highest valid row number (1-based, inclusive).
    pub max_row: usize,
}

impl Default for NameRules {
    fn default() -> Self {
        NameRules {
            max_column_letters: 2,
            max_row: 99,
        }
    }
}

impl NameRules {
    pub fn new(max_column_letters: usize, max_row: usize) -> Self {
        NameRules {
            max_column_letters,
            max_row,
        }
    }

    /// Trim and uppercase. Idempotent.
    pub fn normalize(name: &str) -> String {
        name.trim().to_ascii_uppercase()
    }

    /// Check a name against the column width and row range.
    pub fn is_valid(&self, name: &str) -> bool {
        let Some(caps) = name_re().captures(name) else {
            return false;
        };
        let letters = &caps["letters"];
        let numbers = &caps["numbers"];

        if letters.len() > self.max_column_letters || numbers.starts_with('0') {
            return false;
        }
        match numbers.parse::<usize>() {
            Ok(row) => (1..=self.max_row).contains(&row),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CellRef, NameRules, is_cell_name};

    #[test]
    fn test_parse_a1_overflow_returns_none() {
        let huge = format!("{}1", "Z".repeat(40));
        assert!(CellRef::from_str(&huge).is_none());
    }

    #[test]
    fn test_col_to_letters_handles_max_usize() {
        let letters = CellRef::col_to_letters(usize::MAX);
        assert!(!letters.is_empty());
        assert!(letters.chars().all(|c| c.is_ascii_uppercase()));
    }

    #[test]
    fn test_is_cell_name_shape() {
        assert!(is_cell_name("a1"));
        assert!(is_cell_name("ZZ100"));
        assert!(!is_cell_name("1A"));
        assert!(!is_cell_name("A"));
        assert!(!is_cell_name("A 1"));
        assert!(!is_cell_name(""));
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for name in ["a1", " b12 ", "Zz9", "AA99", "q7"] {
            let once = NameRules::normalize(name);
            assert_eq!(NameRules::normalize(&once), once);
        }
        assert_eq!(NameRules::normalize(" ab3 "), "AB3");
    }

    #[test]
    fn test_default_rules_row_boundaries() {
        let rules = NameRules::default();
        assert!(rules.is_valid("A1"));
        assert!(rules.is_valid("A99"));
        assert!(!rules.is_valid("A0"));
        assert!(!rules.is_valid("A100"));
        assert!(!rules.is_valid("A01"));
    }

    #[test]
    fn test_configured_row_limit() {
        let rules = NameRules::new(2, 500);
        assert!(rules.is_valid("B1"));
        assert!(rules.is_valid("B500"));
        assert!(!rules.is_valid("B501"));
    }

    #[test]
    fn test_column_letter_limit() {
        let rules = NameRules::default();
        assert!(rules.is_valid("ZZ5"));
        assert!(!rules.is_valid("AAA5"));
        assert!(NameRules::new(3, 99).is_valid("AAA5"));
    }
}
