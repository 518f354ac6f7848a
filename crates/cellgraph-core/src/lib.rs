//! cellgraph-core - Spreadsheet store, recalculation and file storage.

pub mod error;
pub mod sheet;
pub mod storage;

pub use error::{Result, SheetError};
pub use sheet::{Normalizer, Spreadsheet, Validator};

pub use cellgraph_engine::engine::{Contents, EvalError, NameRules, Value, format_value};
