//! Storage for the .cgs file format.
//!
//! ```text
//! # cellgraph spreadsheet
//! version: v1
//! A1: 5
//! B1: =A1 + 1
//! C1: Total
//! ```
//!
//! Each cell line holds the entry text exactly as typed (trimmed), so loading
//! replays the same edits. Backslash, newline and carriage return are escaped.

mod parser;
mod writer;

pub use parser::{SheetFile, parse_sheet, parse_sheet_content, read_version};
pub use writer::{write_sheet, write_sheet_content};

/// Key of the version line.
pub(crate) const VERSION_KEY: &str = "version";

/// Refuse to read sheet files larger than this.
pub(crate) const MAX_SHEET_FILE_BYTES: u64 = 16 * 1_048_576; // 16 MiB
