use super::Spreadsheet;
use crate::error::{Result, SheetError};
use crate::storage::{SheetFile, parse_sheet, parse_sheet_content, write_sheet, write_sheet_content};
use cellgraph_engine::engine::NameRules;
use std::path::Path;

impl Spreadsheet {
    /// `(name, entry)` pairs for every non-empty cell, by row then column.
    fn entries(&self) -> Vec<(String, String)> {
        self.nonempty_cell_names()
            .into_iter()
            .filter_map(|name| {
                let entry = self.grid.get(&name)?.entry.clone();
                Some((name, entry))
            })
            .collect()
    }

    /// Serialize to .cgs content.
    pub fn to_content(&self) -> String {
        write_sheet_content(&self.version, &self.entries())
    }

    /// Save every non-empty cell and clear the change flag.
    pub fn save(&mut self, path: &Path) -> Result<()> {
        write_sheet(path, &self.version, &self.entries())?;
        self.changed = false;
        log::info!("Saved {} cells to {}", self.grid.len(), path.display());
        Ok(())
    }

    /// Load a spreadsheet saved with tag `expected_version`.
    ///
    /// Every entry is replayed through [`Spreadsheet::set_contents`] with the
    /// given hooks (saved names the normalizer produced are accepted as
    /// written), rebuilding the graph and all values. Any failure aborts the
    /// load; no partial sheet is returned.
    pub fn load<V, N>(
        path: &Path,
        is_valid: V,
        normalize: N,
        expected_version: &str,
    ) -> Result<Self>
    where
        V: Fn(&str) -> bool + 'static,
        N: Fn(&str) -> String + 'static,
    {
        let file = parse_sheet(path)?;
        let sheet = Self::from_file(file, Self::new(is_valid, normalize, expected_version))?;
        log::info!(
            "Loaded {} cells from {}",
            sheet.grid.len(),
            path.display()
        );
        Ok(sheet)
    }

    /// [`Spreadsheet::load`] with [`NameRules`] as the naming hooks.
    pub fn load_with_rules(path: &Path, rules: NameRules, expected_version: &str) -> Result<Self> {
        let file = parse_sheet(path)?;
        let sheet = Self::from_file(file, Self::with_rules(rules, expected_version))?;
        log::info!("Loaded {} cells from {}", sheet.grid.len(), path.display());
        Ok(sheet)
    }

    /// Load from .cgs content.
    pub fn from_content<V, N>(
        content: &str,
        is_valid: V,
        normalize: N,
        expected_version: &str,
    ) -> Result<Self>
    where
        V: Fn(&str) -> bool + 'static,
        N: Fn(&str) -> String + 'static,
    {
        let file = parse_sheet_content(content)?;
        Self::from_file(file, Self::new(is_valid, normalize, expected_version))
    }

    /// Replay a parsed file into an empty sheet whose version is the expected tag.
    fn from_file(file: SheetFile, mut sheet: Spreadsheet) -> Result<Self> {
        if file.version != sheet.version {
            return Err(SheetError::VersionMismatch {
                expected: sheet.version.clone(),
                found: file.version,
            });
        }

        for (name, entry) in &file.cells {
            sheet
                .resolve_saved_name(name)
                .and_then(|resolved| sheet.set_resolved(resolved, entry))
                .map_err(|err| SheetError::Entry {
                    cell: name.clone(),
                    source: Box::new(err),
                })?;
        }

        sheet.changed = false;
        Ok(sheet)
    }
}
