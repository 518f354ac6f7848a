use crate::error::{Result, SheetError};
use cellgraph_engine::engine::{DependencyGraph, Grid, NameRules, is_cell_name};
use std::fmt;

/// Version tag used by [`Spreadsheet::default`].
pub const DEFAULT_VERSION: &str = "default";

/// Caller-supplied cell name validity predicate, applied to normalized names.
pub type Validator = Box<dyn Fn(&str) -> bool>;

/// Caller-supplied cell name normalizer.
pub type Normalizer = Box<dyn Fn(&str) -> String>;

/// A single spreadsheet: non-empty cells, their cached values and the
/// dependency edges between them.
///
/// The naming hooks and version tag are fixed for the lifetime of the store.
/// Not meant for shared access; callers serialize edits.
pub struct Spreadsheet {
    /// Non-empty cells keyed by normalized name
    pub(crate) grid: Grid,
    /// Edges derived from the formulas currently in `grid`
    pub(crate) graph: DependencyGraph,
    pub(crate) is_valid: Validator,
    pub(crate) normalize: Normalizer,
    pub(crate) version: String,
    /// Set by every successful edit, cleared on save and load
    pub(crate) changed: bool,
}

impl Spreadsheet {
    /// Create an empty spreadsheet with the given naming hooks and version tag.
    ///
    /// Names passed to the public operations must look like `[A-Za-z]+[0-9]+`
    /// before `normalize` runs. The normalizer's output may take any form, but
    /// it should map its own output to itself so saved names reload unchanged.
    pub fn new<V, N>(is_valid: V, normalize: N, version: impl Into<String>) -> Self
    where
        V: Fn(&str) -> bool + 'static,
        N: Fn(&str) -> String + 'static,
    {
        Spreadsheet {
            grid: Grid::new(),
            graph: DependencyGraph::new(),
            is_valid: Box::new(is_valid),
            normalize: Box::new(normalize),
            version: version.into(),
            changed: false,
        }
    }

    /// Create an empty spreadsheet using [`NameRules`] as its naming hooks.
    pub fn with_rules(rules: NameRules, version: impl Into<String>) -> Self {
        Self::new(move |name| rules.is_valid(name), NameRules::normalize, version)
    }

    /// The version tag written on save and required on load.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Whether any cell was set since construction, load, or the last save.
    pub fn changed(&self) -> bool {
        self.changed
    }

    /// Validate and normalize a cell name.
    pub(crate) fn resolve_name(&self, name: &str) -> Result<String> {
        let trimmed = name.trim();
        if !is_cell_name(trimmed) {
            return Err(SheetError::InvalidName(name.to_string()));
        }
        let normalized = (self.normalize)(trimmed);
        if !(self.is_valid)(&normalized) {
            return Err(SheetError::InvalidName(name.to_string()));
        }
        Ok(normalized)
    }

    /// Resolve a name read back from a saved file.
    ///
    /// Saved names are normalizer output. One outside the base shape is kept
    /// as written when `is_valid` accepts it.
    pub(crate) fn resolve_saved_name(&self, name: &str) -> Result<String> {
        let trimmed = name.trim();
        if is_cell_name(trimmed) {
            return self.resolve_name(trimmed);
        }
        if (self.is_valid)(trimmed) {
            return Ok(trimmed.to_string());
        }
        Err(SheetError::InvalidName(name.to_string()))
    }
}

impl Default for Spreadsheet {
    fn default() -> Self {
        Self::with_rules(NameRules::default(), DEFAULT_VERSION)
    }
}

impl fmt::Debug for Spreadsheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Spreadsheet")
            .field("cells", &self.grid.len())
            .field("edges", &self.graph.len())
            .field("version", &self.version)
            .field("changed", &self.changed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_sheet_is_unchanged() {
        let sheet = Spreadsheet::default();
        assert!(!sheet.changed());
        assert_eq!(sheet.version(), DEFAULT_VERSION);
    }

    #[test]
    fn test_resolve_name_normalizes() {
        let sheet = Spreadsheet::default();
        assert_eq!(sheet.resolve_name(" b7 ").unwrap(), "B7");
        assert_eq!(sheet.resolve_name("zz99").unwrap(), "ZZ99");
    }

    #[test]
    fn test_resolve_name_rejects_bad_shapes_and_ranges() {
        let sheet = Spreadsheet::default();
        for name in ["", "7", "A", "A-1", "A100", "AAA1", "A0"] {
            assert!(
                matches!(sheet.resolve_name(name), Err(SheetError::InvalidName(_))),
                "{:?}",
                name
            );
        }
    }

    #[test]
    fn test_saved_names_outside_base_shape() {
        let sheet = Spreadsheet::new(
            |name| name.starts_with("cell_"),
            |name| format!("cell_{}", name.to_ascii_uppercase()),
            "prefixed",
        );
        assert_eq!(sheet.resolve_saved_name("cell_B2").unwrap(), "cell_B2");
        assert_eq!(sheet.resolve_saved_name("b2").unwrap(), "cell_B2");
        assert!(sheet.resolve_saved_name("other_B2").is_err());
        assert!(sheet.resolve_name("cell_B2").is_err());
    }

    #[test]
    fn test_custom_hooks() {
        // Lowercase storage, only column A allowed.
        let sheet = Spreadsheet::new(
            |name| name.starts_with('a'),
            |name| name.to_ascii_lowercase(),
            "custom",
        );
        assert_eq!(sheet.resolve_name("A12").unwrap(), "a12");
        assert!(sheet.resolve_name("B1").is_err());
    }
}
