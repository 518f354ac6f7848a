use super::Spreadsheet;
use crate::error::{Result, SheetError};
use cellgraph_engine::engine::{Cell, CellRef, Contents, EvalError, Value};

impl Spreadsheet {
    /// Contents of a cell. Unset cells are [`Contents::Empty`].
    pub fn get_contents(&self, name: &str) -> Result<Contents> {
        let name = self.resolve_name(name)?;
        Ok(self
            .grid
            .get(&name)
            .map(|cell| cell.contents.clone())
            .unwrap_or(Contents::Empty))
    }

    /// Entry text of a cell as it was typed (trimmed). Empty for unset cells.
    pub fn get_entry(&self, name: &str) -> Result<String> {
        let name = self.resolve_name(name)?;
        Ok(self
            .grid
            .get(&name)
            .map(|cell| cell.entry.clone())
            .unwrap_or_default())
    }

    /// Last computed value of a cell. Unset cells read as empty text.
    pub fn get_value(&self, name: &str) -> Result<Value> {
        let name = self.resolve_name(name)?;
        Ok(self
            .grid
            .get(&name)
            .map(|cell| cell.value.clone())
            .unwrap_or_default())
    }

    /// Names of all non-empty cells, by row then column.
    pub fn nonempty_cell_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.grid.iter().map(|entry| entry.key().clone()).collect();
        names.sort_by_cached_key(|name| (CellRef::from_str(name), name.clone()));
        names
    }

    /// Cells whose formulas read `name` directly.
    pub fn dependents(&self, name: &str) -> Result<Vec<String>> {
        let name = self.resolve_name(name)?;
        Ok(self.graph.dependents(&name).map(str::to_string).collect())
    }

    /// Set a cell from user input and recalculate everything it affects.
    ///
    /// Input starting with `=` is a formula, a finite number is a number, and
    /// anything else is text; blank input clears the cell. Returns the
    /// recalculated cells, `name` first, each after the cells it reads.
    ///
    /// On an invalid name, a malformed formula or a circular reference the
    /// sheet is left exactly as it was.
    pub fn set_contents(&mut self, name: &str, input: &str) -> Result<Vec<String>> {
        let name = self.resolve_name(name)?;
        self.set_resolved(name, input)
    }

    /// [`Spreadsheet::set_contents`] for a name that is already normalized and valid.
    pub(crate) fn set_resolved(&mut self, name: String, input: &str) -> Result<Vec<String>> {
        let contents = Contents::from_input_with(
            input,
            |cell| (self.normalize)(cell),
            |cell| (self.is_valid)(cell),
        )
        .inspect_err(|err| log::warn!("Rejected formula for {}: {}", name, err))?;

        let order = self
            .graph
            .set_dependees_checked(&name, contents.referenced_cells())
            .map_err(|err| {
                log::warn!("Rejected edit of {}: {}", name, err);
                SheetError::from(err)
            })?;

        if contents.is_empty() {
            self.grid.remove(&name);
        } else {
            self.grid.insert(name.clone(), Cell::new(input, contents));
        }
        self.changed = true;

        self.recalculate(&order);
        log::debug!("Set {}; recalculated {:?}", name, order);
        Ok(order)
    }

    /// Re-evaluate formula cells in `order`. Literal cells already hold their value.
    fn recalculate(&self, order: &[String]) {
        for name in order {
            // Release the grid guard before lookups touch other cells.
            let formula = match self.grid.get(name) {
                Some(cell) => match cell.contents.formula() {
                    Some(formula) => formula.clone(),
                    None => continue,
                },
                None => continue,
            };
            let value = Value::from(formula.evaluate(|dep| self.lookup(dep)));
            if let Some(mut cell) = self.grid.get_mut(name) {
                cell.value = value;
            }
        }
    }

    /// Value of a referenced cell during evaluation; unset cells are an error.
    fn lookup(&self, name: &str) -> Value {
        self.grid
            .get(name)
            .map(|cell| cell.value.clone())
            .unwrap_or_else(|| Value::Error(EvalError::UnknownCell(name.to_string())))
    }
}
