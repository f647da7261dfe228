//! Weighted distance-from-target field with corner-cutting suppression.

use std::collections::VecDeque;

use pursuit_core::{CellCoord, GridError, Role};

use crate::{cell::NeighborLink, grid::Grid};

/// Smallest improvement accepted when relaxing an already visited cell.
///
/// Distances are sums of `1` and `sqrt(2)`; equal costs reached through
/// different summation orders may differ in the last bits.
const RELAXATION_EPSILON: f64 = 1e-9;

/// Validity of the distance values stored in the grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FieldState {
    /// Walls or the target changed since the last pass.
    #[default]
    Stale,
    /// A pass is running.
    Computing,
    /// The stored distances match the current topology.
    Fresh,
}

/// Summary of a completed recompute pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldOutcome {
    /// Whether a surviving link into the seeker's cell was relaxed.
    pub path_exists: bool,
    /// Number of cells reached from the target.
    pub visited: usize,
}

/// Breadth-first propagation of distance-from-target over a [`Grid`].
///
/// Distances are written into the grid's cells. The pass always drains the
/// frontier and re-enqueues any cell whose distance is lowered, so every
/// visited cell ends with its true shortest cost even though the FIFO order
/// does not pop cells in cost order.
#[derive(Clone, Debug, Default)]
pub struct DistanceField {
    state: FieldState,
    path_exists: bool,
    visited: usize,
    queue: VecDeque<CellCoord>,
    links: Vec<NeighborLink>,
}

impl DistanceField {
    /// Creates a stale field.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current validity state.
    #[must_use]
    pub const fn state(&self) -> FieldState {
        self.state
    }

    /// Reports whether the stored distances may be traced.
    #[must_use]
    pub fn is_fresh(&self) -> bool {
        self.state == FieldState::Fresh
    }

    /// Result of the last completed pass; `false` while stale.
    #[must_use]
    pub fn path_exists(&self) -> bool {
        self.is_fresh() && self.path_exists
    }

    /// Number of cells reached by the last completed pass.
    #[must_use]
    pub const fn visited(&self) -> usize {
        self.visited
    }

    /// Records that walls or the target moved since the last pass.
    pub fn invalidate(&mut self) {
        self.state = FieldState::Stale;
    }

    /// Recomputes every cell's distance from `target`.
    ///
    /// Diagonal links that would squeeze between two wall corners are removed
    /// from the popped cell's link list as they are encountered; removal is
    /// permanent for the lifetime of the grid.
    pub fn recompute(
        &mut self,
        grid: &mut Grid,
        target: CellCoord,
    ) -> Result<FieldOutcome, GridError> {
        // Fail before touching any state so an invalid target leaves the field as it was.
        let _ = grid.get(target)?;

        self.state = FieldState::Computing;
        self.path_exists = false;
        self.visited = 0;
        self.queue.clear();

        grid.for_each_cell_mut(|cell| cell.reset_search());

        grid.get_mut(target)?.visit(0.0);
        self.visited = 1;
        self.queue.push_back(target);

        let mut links = std::mem::take(&mut self.links);
        let result = self.propagate(grid, &mut links);
        self.links = links;
        if let Err(error) = result {
            self.state = FieldState::Stale;
            return Err(error);
        }

        self.state = FieldState::Fresh;
        tracing::debug!(
            target_cell = %target,
            visited = self.visited,
            path_exists = self.path_exists,
            "distance field recomputed"
        );

        Ok(FieldOutcome {
            path_exists: self.path_exists,
            visited: self.visited,
        })
    }

    fn propagate(
        &mut self,
        grid: &mut Grid,
        links: &mut Vec<NeighborLink>,
    ) -> Result<(), GridError> {
        while let Some(current) = self.queue.pop_front() {
            let current_distance = grid.get(current)?.distance();

            links.clear();
            links.extend_from_slice(grid.get(current)?.links());

            for link in links.iter() {
                if cuts_corner(grid, current, link)? {
                    grid.get_mut(current)?.remove_link(link.direction());
                    tracing::trace!(
                        cell = %current,
                        direction = %link.direction(),
                        "suppressed corner-cutting link"
                    );
                    continue;
                }

                let tentative = current_distance + link.cost();
                let neighbor = grid.get_mut(link.target())?;

                if neighbor.role() == Role::Seeker {
                    self.path_exists = true;
                }

                if neighbor.visited() {
                    if tentative < neighbor.distance() - RELAXATION_EPSILON {
                        neighbor.lower_distance(tentative);
                        self.queue.push_back(link.target());
                    }
                    continue;
                }

                if neighbor.is_wall() {
                    continue;
                }

                neighbor.visit(tentative);
                self.visited += 1;
                self.queue.push_back(link.target());
            }
        }

        Ok(())
    }
}

/// Reports whether a diagonal link passes between two wall corners into an open cell.
fn cuts_corner(grid: &Grid, from: CellCoord, link: &NeighborLink) -> Result<bool, GridError> {
    let Some((first, second)) = link.direction().orthogonal_components() else {
        return Ok(false);
    };
    let origin = grid.get(from)?;
    let (Some(first), Some(second)) = (origin.link(first), origin.link(second)) else {
        return Ok(false);
    };

    let flanked = grid.get(first.target())?.is_wall() && grid.get(second.target())?.is_wall();
    Ok(flanked && !grid.get(link.target())?.is_wall())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pursuit_core::Direction;
    use std::f64::consts::SQRT_2;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    fn wall(grid: &mut Grid, column: u32, row: u32) {
        grid.get_mut(CellCoord::new(column, row))
            .expect("in bounds")
            .set_wall(true);
    }

    #[test]
    fn open_grid_assigns_orthogonal_and_diagonal_costs() {
        let mut grid = Grid::build(3, 3).expect("extent");
        let mut field = DistanceField::new();
        let target = CellCoord::new(1, 1);

        let outcome = field.recompute(&mut grid, target).expect("recompute");

        assert_eq!(outcome.visited, 9);
        assert!(field.is_fresh());
        for cell in grid.iter() {
            let expected = match target.direction_to(cell.coord()) {
                None => 0.0,
                Some(direction) => direction.cost(),
            };
            assert!(cell.visited());
            assert_close(cell.distance(), expected);
        }
    }

    #[test]
    fn corner_cut_diagonal_is_suppressed() {
        let mut grid = Grid::build(3, 3).expect("extent");
        wall(&mut grid, 0, 1);
        wall(&mut grid, 1, 0);
        let mut field = DistanceField::new();

        let _ = field
            .recompute(&mut grid, CellCoord::new(1, 1))
            .expect("recompute");

        let corner = grid.get(CellCoord::new(0, 0)).expect("in bounds");
        assert!(!corner.visited());
        let target = grid.get(CellCoord::new(1, 1)).expect("in bounds");
        assert!(target.link(Direction::NorthWest).is_none());
        assert!(target.link(Direction::NorthEast).is_some());
    }

    #[test]
    fn seeker_behind_corner_has_no_path() {
        let mut grid = Grid::build(3, 3).expect("extent");
        wall(&mut grid, 0, 1);
        wall(&mut grid, 1, 0);
        grid.get_mut(CellCoord::new(0, 0))
            .expect("in bounds")
            .set_role(Role::Seeker);
        let mut field = DistanceField::new();

        let outcome = field
            .recompute(&mut grid, CellCoord::new(1, 1))
            .expect("recompute");

        assert!(!outcome.path_exists);
        assert!(!field.path_exists());
    }

    #[test]
    fn single_wall_corner_does_not_block_diagonal() {
        let mut grid = Grid::build(3, 3).expect("extent");
        wall(&mut grid, 1, 0);
        let mut field = DistanceField::new();

        let _ = field
            .recompute(&mut grid, CellCoord::new(1, 1))
            .expect("recompute");

        assert_close(
            grid.get(CellCoord::new(0, 0)).expect("in bounds").distance(),
            SQRT_2,
        );
    }

    #[test]
    fn walls_are_never_visited() {
        let mut grid = Grid::build(4, 4).expect("extent");
        wall(&mut grid, 2, 2);
        let mut field = DistanceField::new();

        let outcome = field
            .recompute(&mut grid, CellCoord::new(0, 0))
            .expect("recompute");

        assert_eq!(outcome.visited, 15);
        assert!(!grid.get(CellCoord::new(2, 2)).expect("in bounds").visited());
    }

    #[test]
    fn detour_around_walls_mixes_costs() {
        // The direct route to (3, 0) along row 0 is walled off at (1, 0) and
        // (2, 0); the only openings force mixed diagonal/orthogonal routes.
        let mut grid = Grid::build(5, 3).expect("extent");
        wall(&mut grid, 1, 0);
        wall(&mut grid, 2, 0);
        let mut field = DistanceField::new();

        let _ = field
            .recompute(&mut grid, CellCoord::new(0, 0))
            .expect("recompute");

        // (0,0) -> (1,1) -> (2,1) -> (3,0)
        assert_close(
            grid.get(CellCoord::new(3, 0)).expect("in bounds").distance(),
            SQRT_2 + 1.0 + SQRT_2,
        );
    }

    #[test]
    fn invalid_target_leaves_state_untouched() {
        let mut grid = Grid::build(2, 2).expect("extent");
        let mut field = DistanceField::new();
        let _ = field
            .recompute(&mut grid, CellCoord::new(0, 0))
            .expect("recompute");

        assert!(field.recompute(&mut grid, CellCoord::new(5, 5)).is_err());
        assert!(field.is_fresh());
    }

    #[test]
    fn invalidate_marks_field_stale() {
        let mut grid = Grid::build(2, 2).expect("extent");
        let mut field = DistanceField::new();
        assert_eq!(field.state(), FieldState::Stale);

        let _ = field
            .recompute(&mut grid, CellCoord::new(0, 0))
            .expect("recompute");
        assert_eq!(field.state(), FieldState::Fresh);

        field.invalidate();
        assert_eq!(field.state(), FieldState::Stale);
        assert!(!field.path_exists());
    }
}
