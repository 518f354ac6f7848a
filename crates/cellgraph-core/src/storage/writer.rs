//! Writer for .cgs file format

use super::VERSION_KEY;
use crate::error::Result;
use std::fs;
use std::path::Path;

/// Write a version tag and `(name, entry)` pairs to a .cgs file
pub fn write_sheet(path: &Path, version: &str, cells: &[(String, String)]) -> Result<()> {
    let content = write_sheet_content(version, cells);
    fs::write(path, content)?;
    Ok(())
}

/// Write a version tag and `(name, entry)` pairs to a .cgs format string.
/// Cells are written in the order given; empty entries are skipped.
pub fn write_sheet_content(version: &str, cells: &[(String, String)]) -> String {
    let mut lines = vec![
        "# cellgraph spreadsheet".to_string(),
        format!("{}: {}", VERSION_KEY, escape_entry(version)),
    ];

    for (name, entry) in cells {
        if entry.trim().is_empty() {
            continue;
        }
        lines.push(format!("{}: {}", name, escape_entry(entry)));
    }

    lines.join("\n") + "\n"
}

fn escape_entry(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(ch),
        }
    }
    out
}
