//! Dependency graph between formula cells.
//!
//! Edges are stored twice, as dependees (cells a formula reads) and as
//! dependents (cells that read a given cell), keyed by cell name. Ordered
//! sets keep traversal deterministic.
//!
//! When a cell changes, [`DependencyGraph::cells_to_recalculate`] walks the
//! dependents with a depth-first search and reverses the post-order, which
//! yields every affected cell after everything it reads. Reaching a cell that
//! is still on the active path means the edit closed a cycle.

use std::collections::{BTreeSet, HashMap, HashSet};
use thiserror::Error;

/// An edit would make a cell depend on itself.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("circular dependency through {cell}")]
pub struct CycleError {
    /// The cell reached a second time on the active path.
    pub cell: String,
}

#[derive(Clone, Debug, Default)]
pub struct DependencyGraph {
    /// cell -> cells its formula reads
    dependees: HashMap<String, BTreeSet<String>>,
    /// cell -> cells whose formulas read it
    dependents: HashMap<String, BTreeSet<String>>,
    edges: usize,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of (dependent, dependee) edges.
    pub fn len(&self) -> usize {
        self.edges
    }

    pub fn is_empty(&self) -> bool {
        self.edges == 0
    }

    /// Cells that directly read `cell`.
    pub fn dependents(&self, cell: &str) -> impl Iterator<Item = &str> + '_ {
        self.dependents
            .get(cell)
            .into_iter()
            .flatten()
            .map(String::as_str)
    }

    /// Cells that `cell` directly reads.
    pub fn dependees(&self, cell: &str) -> impl Iterator<Item = &str> + '_ {
        self.dependees
            .get(cell)
            .into_iter()
            .flatten()
            .map(String::as_str)
    }

    pub fn has_dependents(&self, cell: &str) -> bool {
        self.dependents.get(cell).is_some_and(|set| !set.is_empty())
    }

    pub fn has_dependees(&self, cell: &str) -> bool {
        self.dependees.get(cell).is_some_and(|set| !set.is_empty())
    }

    /// Replace every outgoing edge of `cell` and return the previous dependees.
    pub fn replace_dependees<I>(&mut self, cell: &str, new_dependees: I) -> BTreeSet<String>
    where
        I: IntoIterator<Item = String>,
    {
        let old = self.dependees.remove(cell).unwrap_or_default();
        for dependee in &old {
            if let Some(set) = self.dependents.get_mut(dependee) {
                set.remove(cell);
                if set.is_empty() {
                    self.dependents.remove(dependee);
                }
            }
        }
        self.edges -= old.len();

        let new: BTreeSet<String> = new_dependees.into_iter().collect();
        for dependee in &new {
            self.dependents
                .entry(dependee.clone())
                .or_default()
                .insert(cell.to_string());
        }
        self.edges += new.len();
        if !new.is_empty() {
            self.dependees.insert(cell.to_string(), new);
        }

        old
    }

    /// Replace the dependees of `cell` and return its recalculation order.
    ///
    /// If the new edges close a cycle, the previous edges are restored before
    /// the error is returned.
    pub fn set_dependees_checked<I>(
        &mut self,
        cell: &str,
        new_dependees: I,
    ) -> Result<Vec<String>, CycleError>
    where
        I: IntoIterator<Item = String>,
    {
        let old = self.replace_dependees(cell, new_dependees);
        match self.cells_to_recalculate(cell) {
            Ok(order) => Ok(order),
            Err(err) => {
                self.replace_dependees(cell, old);
                Err(err)
            }
        }
    }

    /// `cell` followed by all of its transitive dependents, each listed after
    /// every cell it depends on.
    pub fn cells_to_recalculate(&self, cell: &str) -> Result<Vec<String>, CycleError> {
        let mut finished: HashSet<&str> = HashSet::new();
        let mut on_path: HashSet<&str> = HashSet::new();
        let mut post_order: Vec<&str> = Vec::new();

        // Explicit stack of (node, its pending dependents) so long chains
        // cannot overflow the call stack.
        let mut stack: Vec<(&str, std::vec::IntoIter<&str>)> = Vec::new();
        on_path.insert(cell);
        stack.push((cell, self.dependents(cell).collect::<Vec<_>>().into_iter()));

        while let Some((node, pending)) = stack.last_mut() {
            match pending.next() {
                Some(next) => {
                    if on_path.contains(next) {
                        return Err(CycleError {
                            cell: next.to_string(),
                        });
                    }
                    if finished.contains(next) {
                        continue;
                    }
                    on_path.insert(next);
                    let children = self.dependents(next).collect::<Vec<_>>().into_iter();
                    stack.push((next, children));
                }
                None => {
                    let node = *node;
                    on_path.remove(node);
                    finished.insert(node);
                    post_order.push(node);
                    stack.pop();
                }
            }
        }

        Ok(post_order.into_iter().rev().map(str::to_string).collect())
    }
}
