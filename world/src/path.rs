//! Greedy descent over a fresh distance field.

use pursuit_core::{CellCoord, GridError};

use crate::grid::Grid;

/// Walks downhill through the distances left by the last recompute.
///
/// Callers must only trace while the field is fresh and reports a path.
#[derive(Clone, Copy, Debug, Default)]
pub struct PathTracer;

impl PathTracer {
    /// Neighbour of `from` with the lowest distance among visited open cells.
    ///
    /// Ties resolve to the first minimal link in stored order. Returns
    /// `Ok(None)` when no link leads to a visited open cell.
    pub fn next_step(grid: &Grid, from: CellCoord) -> Result<Option<CellCoord>, GridError> {
        let origin = grid.get(from)?;
        let mut best: Option<(CellCoord, f64)> = None;

        for link in origin.links() {
            let neighbor = grid.get(link.target())?;
            if !neighbor.visited() || neighbor.is_wall() {
                continue;
            }

            let lower = match best {
                None => true,
                Some((_, distance)) => neighbor.distance() < distance,
            };
            if lower {
                best = Some((link.target(), neighbor.distance()));
            }
        }

        Ok(best.map(|(cell, _)| cell))
    }

    /// Lazily traces the path from `from` to the target, marking each yielded cell.
    ///
    /// The trace stops after yielding the target (the visited cell at distance
    /// zero) or when no further step exists, and never yields more cells than
    /// the grid holds. Starting from a cell the field never reached yields
    /// nothing.
    pub fn trace(grid: &mut Grid, from: CellCoord) -> PathTrace<'_> {
        let remaining = grid.len();
        PathTrace {
            grid,
            current: Some(from),
            remaining,
        }
    }
}

/// Iterator returned by [`PathTracer::trace`].
#[derive(Debug)]
pub struct PathTrace<'a> {
    grid: &'a mut Grid,
    current: Option<CellCoord>,
    remaining: usize,
}

impl Iterator for PathTrace<'_> {
    type Item = Result<CellCoord, GridError>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current.take()?;
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let cell = match self.grid.get_mut(current) {
            Ok(cell) => cell,
            Err(error) => return Some(Err(error)),
        };
        if !cell.visited() {
            return None;
        }
        cell.set_on_path(true);
        if cell.distance() == 0.0 {
            return Some(Ok(current));
        }

        match PathTracer::next_step(self.grid, current) {
            Ok(next) => self.current = next,
            Err(error) => return Some(Err(error)),
        }
        Some(Ok(current))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance_field::DistanceField;
    use pursuit_core::Role;

    fn fresh_grid(columns: u32, rows: u32, walls: &[(u32, u32)], target: CellCoord) -> Grid {
        let mut grid = Grid::build(columns, rows).expect("extent");
        for &(column, row) in walls {
            grid.get_mut(CellCoord::new(column, row))
                .expect("in bounds")
                .set_wall(true);
        }
        let _ = DistanceField::new()
            .recompute(&mut grid, target)
            .expect("recompute");
        grid
    }

    #[test]
    fn seeker_in_corner_steps_diagonally_onto_target() {
        let target = CellCoord::new(1, 1);
        let mut grid = fresh_grid(3, 3, &[], target);
        let seeker = CellCoord::new(0, 0);

        assert_eq!(PathTracer::next_step(&grid, seeker), Ok(Some(target)));

        let path: Vec<_> = PathTracer::trace(&mut grid, seeker)
            .collect::<Result<_, _>>()
            .expect("trace");
        assert_eq!(path, vec![seeker, target]);
        assert!(grid.get(seeker).expect("in bounds").on_path());
        assert!(grid.get(target).expect("in bounds").on_path());
    }

    #[test]
    fn next_step_skips_walls_and_unvisited_cells() {
        let target = CellCoord::new(2, 0);
        let grid = fresh_grid(3, 2, &[(1, 0)], target);

        // (1, 1) is the only open neighbour of (0, 0) closer to the target.
        assert_eq!(
            PathTracer::next_step(&grid, CellCoord::new(0, 0)),
            Ok(Some(CellCoord::new(1, 1)))
        );
    }

    #[test]
    fn next_step_returns_none_for_isolated_cell() {
        let target = CellCoord::new(2, 2);
        let grid = fresh_grid(3, 3, &[(0, 1), (1, 0), (1, 1)], target);

        assert_eq!(PathTracer::next_step(&grid, CellCoord::new(0, 0)), Ok(None));
    }

    #[test]
    fn trace_from_unreached_cell_yields_nothing() {
        let target = CellCoord::new(2, 2);
        let seeker = CellCoord::new(0, 0);
        let mut grid = fresh_grid(3, 3, &[(0, 1), (1, 0), (1, 1)], target);

        let path: Vec<_> = PathTracer::trace(&mut grid, seeker)
            .collect::<Result<_, _>>()
            .expect("trace");
        assert!(path.is_empty());
        assert!(!grid.get(seeker).expect("in bounds").on_path());
    }

    #[test]
    fn ties_resolve_to_first_link_in_stored_order() {
        let target = CellCoord::new(2, 2);
        let grid = fresh_grid(3, 3, &[(1, 1)], target);

        // (0, 1) and (1, 0) both sit at 1 + sqrt(2); the south link is stored first.
        assert_eq!(
            PathTracer::next_step(&grid, CellCoord::new(0, 0)),
            Ok(Some(CellCoord::new(0, 1)))
        );
    }

    #[test]
    fn trace_descends_strictly_to_target() {
        let target = CellCoord::new(4, 4);
        let mut grid = fresh_grid(5, 5, &[(2, 1), (2, 2), (2, 3)], target);
        grid.get_mut(CellCoord::new(0, 0))
            .expect("in bounds")
            .set_role(Role::Seeker);

        let path: Vec<_> = PathTracer::trace(&mut grid, CellCoord::new(0, 0))
            .collect::<Result<_, _>>()
            .expect("trace");

        assert_eq!(path.last(), Some(&target));
        for pair in path.windows(2) {
            let before = grid.get(pair[0]).expect("in bounds").distance();
            let after = grid.get(pair[1]).expect("in bounds").distance();
            assert!(after < before);
            assert!(pair[0].direction_to(pair[1]).is_some());
        }
    }

    #[test]
    fn trace_from_target_yields_only_target() {
        let target = CellCoord::new(0, 0);
        let mut grid = fresh_grid(2, 2, &[], target);

        let path: Vec<_> = PathTracer::trace(&mut grid, target)
            .collect::<Result<_, _>>()
            .expect("trace");
        assert_eq!(path, vec![target]);
    }
}
