//! Spreadsheet engine API.
//!
//! This module provides the computation pieces the spreadsheet store is built from:
//!
//! - [`Cell`], [`Contents`], [`Value`], [`Grid`] - Data structures for cell storage
//! - [`CellRef`], [`NameRules`] - Cell name parsing and the default naming hooks
//! - [`Formula`] - Formula parsing, referenced cells and evaluation
//! - [`DependencyGraph`] - Dependency edges, recalculation order, cycle detection
//! - [`format_value`] - Format values for display

mod cell;
mod cell_ref;
mod eval;
mod format;
mod formula;
mod graph;

pub use cell::{Cell, Contents, Grid, Value};
pub use cell_ref::{CellRef, NameRules, is_cell_name};
pub use eval::EvalError;
pub use format::{format_number, format_value};
pub use formula::{FormatError, Formula, Op, Token};
pub use graph::{CycleError, DependencyGraph};
