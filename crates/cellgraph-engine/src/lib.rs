//! cellgraph_engine - Cell names, formulas and the dependency graph.

pub mod engine;

#[cfg(test)]
mod tests {
    use crate::engine::*;

    #[test]
    fn test_from_str_single_letter_columns() {
        let a1 = CellRef::from_str("A1").unwrap();
        assert_eq!(a1.row, 0);
        assert_eq!(a1.col, 0);

        let z1 = CellRef::from_str("Z1").unwrap();
        assert_eq!(z1.row, 0);
        assert_eq!(z1.col, 25);
    }

    #[test]
    fn test_from_str_multi_letter_columns() {
        assert_eq!(CellRef::from_str("AA1").unwrap().col, 26);
        assert_eq!(CellRef::from_str("AZ1").unwrap().col, 51);
        assert_eq!(CellRef::from_str("BA1").unwrap().col, 52);
    }

    #[test]
    fn test_from_str_case_insensitive() {
        let lower = CellRef::from_str("a1").unwrap();
        assert_eq!(lower, CellRef::new(0, 0));

        let mixed = CellRef::from_str("aA1").unwrap();
        assert_eq!(mixed.col, 26);
    }

    #[test]
    fn test_from_str_invalid_inputs() {
        assert!(CellRef::from_str("").is_none());
        assert!(CellRef::from_str("123").is_none());
        assert!(CellRef::from_str("ABC").is_none());
        assert!(CellRef::from_str("A0").is_none());
        assert!(CellRef::from_str("1A").is_none());
        assert!(CellRef::from_str("A 1").is_none());
    }

    #[test]
    fn test_display_round_trips_normalized_names() {
        for name in ["A1", "Z99", "AA10", "ZZ1"] {
            assert_eq!(CellRef::from_str(name).unwrap().to_string(), name);
        }
    }

    #[test]
    fn test_formula_edges_feed_graph() {
        let mut graph = DependencyGraph::new();
        let b1 = Formula::parse("a1 + 1").unwrap();
        let c1 = Formula::parse("b1 * a1").unwrap();
        graph
            .set_dependees_checked("B1", b1.referenced_cells())
            .unwrap();
        graph
            .set_dependees_checked("C1", c1.referenced_cells())
            .unwrap();

        assert_eq!(
            graph.cells_to_recalculate("A1").unwrap(),
            vec!["A1", "B1", "C1"]
        );
    }

    #[test]
    fn test_evaluate_with_grid_lookup() {
        let grid = Grid::new();
        grid.insert("A1".to_string(), Cell::new("5", Contents::Number(5.0)));
        let formula = Formula::parse("A1 + 1").unwrap();
        let value = formula.evaluate(|name| {
            grid.get(name)
                .map(|cell| cell.value.clone())
                .unwrap_or_else(|| Value::Error(EvalError::UnknownCell(name.to_string())))
        });
        assert_eq!(value, Ok(6.0));
    }
}
