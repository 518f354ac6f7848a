//! Error types for the cellgraph command line

use std::path::PathBuf;
use thiserror::Error;

/// Errors in arguments and configuration
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0} requires a value")]
    MissingValue(&'static str),

    #[error("Unknown option: {0}")]
    UnknownOption(String),

    #[error("Unexpected argument: {0}")]
    UnexpectedArgument(String),

    #[error("Expected CELL=CONTENTS, got '{0}'")]
    InvalidAssignment(String),

    #[error("Failed to read {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Refusing to read {path}: file too large ({size} bytes, max {max})")]
    ConfigTooLarge { path: PathBuf, size: u64, max: u64 },

    #[error("Failed to parse {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },
}
