//! Error types for the spreadsheet store.

use cellgraph_engine::engine::{CycleError, FormatError};
use thiserror::Error;

/// Errors returned by spreadsheet operations.
///
/// Formula faults at evaluation time are not errors; they are stored as
/// [`Value::Error`](cellgraph_engine::engine::Value::Error) cell values.
#[derive(Error, Debug)]
pub enum SheetError {
    #[error("Invalid cell name: {0}")]
    InvalidName(String),

    #[error("Formula error: {0}")]
    Format(#[from] FormatError),

    #[error("Circular dependency detected through {0}")]
    CircularDependency(String),

    #[error("Version mismatch: file has '{found}', expected '{expected}'")]
    VersionMismatch { expected: String, found: String },

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("File has no version line")]
    MissingVersion,

    #[error("Cannot restore cell {cell}: {source}")]
    Entry {
        cell: String,
        #[source]
        source: Box<SheetError>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<CycleError> for SheetError {
    fn from(err: CycleError) -> Self {
        SheetError::CircularDependency(err.cell)
    }
}

pub type Result<T> = std::result::Result<T, SheetError>;
