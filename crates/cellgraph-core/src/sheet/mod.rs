//! Spreadsheet store: contents, cached values and the dependency graph.

mod io;
mod ops;
mod state;

pub use state::{DEFAULT_VERSION, Normalizer, Spreadsheet, Validator};
