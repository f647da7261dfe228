//! Static 8-connected topology computed once per grid.

use pursuit_core::{CellCoord, Direction};

use crate::cell::NeighborLink;

/// Builds the in-bounds neighbour links for every position of a fixed extent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NeighborTable {
    columns: u32,
    rows: u32,
}

impl NeighborTable {
    /// Creates a table for a `columns x rows` grid.
    #[must_use]
    pub const fn new(columns: u32, rows: u32) -> Self {
        Self { columns, rows }
    }

    /// Links leaving `cell`, in [`Direction::ALL`] order, filtered to the grid bounds.
    #[must_use]
    pub fn links(&self, cell: CellCoord) -> Vec<NeighborLink> {
        let mut links = Vec::with_capacity(Direction::ALL.len());
        for direction in Direction::ALL {
            let Some(neighbor) = cell.offset(direction) else {
                continue;
            };
            if !self.contains(neighbor) {
                continue;
            }
            links.push(NeighborLink::new(neighbor, direction));
        }
        links
    }

    fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interior_cell_has_eight_links() {
        let table = NeighborTable::new(3, 3);
        let links = table.links(CellCoord::new(1, 1));
        let directions: Vec<_> = links.iter().map(NeighborLink::direction).collect();
        assert_eq!(directions, Direction::ALL.to_vec());
    }

    #[test]
    fn corner_cell_keeps_only_in_bounds_links() {
        let table = NeighborTable::new(3, 3);
        let links = table.links(CellCoord::new(0, 0));
        let targets: Vec<_> = links.iter().map(NeighborLink::target).collect();
        assert_eq!(
            targets,
            vec![
                CellCoord::new(0, 1),
                CellCoord::new(1, 0),
                CellCoord::new(1, 1)
            ]
        );
    }

    #[test]
    fn link_costs_follow_direction() {
        let table = NeighborTable::new(2, 2);
        for link in table.links(CellCoord::new(0, 0)) {
            if link.direction().is_diagonal() {
                assert!((link.cost() - 2f64.sqrt()).abs() < f64::EPSILON);
            } else {
                assert_eq!(link.cost(), 1.0);
            }
        }
    }

    #[test]
    fn single_cell_grid_has_no_links() {
        let table = NeighborTable::new(1, 1);
        assert!(table.links(CellCoord::new(0, 0)).is_empty());
    }
}
