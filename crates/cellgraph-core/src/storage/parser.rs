//! Parser for .cgs file format

use super::{MAX_SHEET_FILE_BYTES, VERSION_KEY};
use crate::error::{Result, SheetError};
use std::fs;
use std::path::Path;

/// Raw contents of a sheet file: the version tag and `(name, entry)` pairs in
/// file order. Names and entries are not validated here.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SheetFile {
    pub version: String,
    pub cells: Vec<(String, String)>,
}

fn read_sheet_file(path: &Path) -> Result<String> {
    let meta = fs::metadata(path)?;
    if meta.len() > MAX_SHEET_FILE_BYTES {
        return Err(SheetError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!(
                "Refusing to read {}: sheet file too large ({} bytes, max {})",
                path.display(),
                meta.len(),
                MAX_SHEET_FILE_BYTES
            ),
        )));
    }
    Ok(fs::read_to_string(path)?)
}

/// Parse a .cgs file
pub fn parse_sheet(path: &Path) -> Result<SheetFile> {
    let content = read_sheet_file(path)?;
    parse_sheet_content(&content)
}

/// Read only the version tag of a .cgs file.
pub fn read_version(path: &Path) -> Result<String> {
    let content = read_sheet_file(path)?;
    for (line_num, line) in content.lines().enumerate() {
        if is_blank_or_comment(line) {
            continue;
        }
        return match parse_line(line, line_num + 1)? {
            (key, value) if key == VERSION_KEY => Ok(value),
            _ => Err(SheetError::MissingVersion),
        };
    }
    Err(SheetError::MissingVersion)
}

/// Parse .cgs content from a string
pub fn parse_sheet_content(content: &str) -> Result<SheetFile> {
    let mut version: Option<String> = None;
    let mut cells = Vec::new();

    for (line_num, line) in content.lines().enumerate() {
        if is_blank_or_comment(line) {
            continue;
        }

        let (key, value) = parse_line(line, line_num + 1)?;

        if key == VERSION_KEY {
            if version.is_some() {
                return Err(SheetError::Parse {
                    line: line_num + 1,
                    message: "Duplicate version line".to_string(),
                });
            }
            version = Some(value);
            continue;
        }

        if version.is_none() {
            return Err(SheetError::Parse {
                line: line_num + 1,
                message: "Cell entry before version line".to_string(),
            });
        }
        cells.push((key, value));
    }

    let version = version.ok_or(SheetError::MissingVersion)?;
    Ok(SheetFile { version, cells })
}

fn is_blank_or_comment(line: &str) -> bool {
    let line = line.trim_start();
    line.is_empty() || line.starts_with('#')
}

/// Split a "KEY: VALUE" line and unescape the value.
///
/// Only the single space the writer puts after `:` is dropped; the rest of
/// the value is kept as written so version tags round-trip exactly.
fn parse_line(line: &str, line_num: usize) -> Result<(String, String)> {
    let Some((key, value)) = line.split_once(':') else {
        return Err(SheetError::Parse {
            line: line_num,
            message: "Expected 'NAME: ENTRY' format".to_string(),
        });
    };

    let key = key.trim();
    if key.is_empty() {
        return Err(SheetError::Parse {
            line: line_num,
            message: "Missing cell name".to_string(),
        });
    }

    let value = value.strip_prefix(' ').unwrap_or(value);
    Ok((key.to_string(), unescape_entry(value)))
}

fn unescape_entry(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            if let Some(next) = chars.next() {
                match next {
                    '\\' => out.push('\\'),
                    'n' => out.push('\n'),
                    'r' => out.push('\r'),
                    _ => {
                        out.push('\\');
                        out.push(next);
                    }
                }
            } else {
                out.push('\\');
            }
        } else {
            out.push(ch);
        }
    }
    out
}
