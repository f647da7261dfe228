//! Per-position state stored by the grid.

use pursuit_core::{CellCoord, Direction, Role};

/// Directed connection from a cell to one of its in-bounds neighbours.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NeighborLink {
    target: CellCoord,
    cost: f64,
    direction: Direction,
}

impl NeighborLink {
    /// Creates a link toward `target`, priced by the direction's connection cost.
    #[must_use]
    pub fn new(target: CellCoord, direction: Direction) -> Self {
        Self {
            target,
            cost: direction.cost(),
            direction,
        }
    }

    /// Cell the link points at.
    #[must_use]
    pub const fn target(&self) -> CellCoord {
        self.target
    }

    /// Connection cost of traversing the link.
    #[must_use]
    pub const fn cost(&self) -> f64 {
        self.cost
    }

    /// Compass label of the link.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }
}

/// A single grid position.
///
/// `visited`, `distance` and `on_path` belong to the distance field and the
/// path tracer; they are only meaningful after a completed recompute.
#[derive(Clone, Debug)]
pub struct Cell {
    coord: CellCoord,
    wall: bool,
    role: Role,
    visited: bool,
    distance: f64,
    on_path: bool,
    links: Vec<NeighborLink>,
}

impl Cell {
    pub(crate) fn new(coord: CellCoord, links: Vec<NeighborLink>) -> Self {
        Self {
            coord,
            wall: false,
            role: Role::None,
            visited: false,
            distance: 0.0,
            on_path: false,
            links,
        }
    }

    /// Position of the cell within the grid.
    #[must_use]
    pub const fn coord(&self) -> CellCoord {
        self.coord
    }

    /// Reports whether the cell blocks occupancy and propagation.
    #[must_use]
    pub const fn is_wall(&self) -> bool {
        self.wall
    }

    /// Sets or clears the wall flag.
    pub fn set_wall(&mut self, wall: bool) {
        self.wall = wall;
    }

    /// Entity hosted by the cell.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Replaces the entity hosted by the cell.
    pub fn set_role(&mut self, role: Role) {
        self.role = role;
    }

    /// Reports whether the last recompute reached this cell.
    #[must_use]
    pub const fn visited(&self) -> bool {
        self.visited
    }

    /// Shortest known cost from the target, valid when [`Cell::visited`] is set.
    #[must_use]
    pub const fn distance(&self) -> f64 {
        self.distance
    }

    /// Reports whether the cell lies on the most recently traced path.
    #[must_use]
    pub const fn on_path(&self) -> bool {
        self.on_path
    }

    /// Surviving neighbour links in their stored order.
    #[must_use]
    pub fn links(&self) -> &[NeighborLink] {
        &self.links
    }

    /// Link carrying the provided compass label, if it still exists.
    #[must_use]
    pub fn link(&self, direction: Direction) -> Option<&NeighborLink> {
        self.links.iter().find(|link| link.direction == direction)
    }

    pub(crate) fn reset_search(&mut self) {
        self.visited = false;
        self.distance = 0.0;
        self.on_path = false;
    }

    pub(crate) fn visit(&mut self, distance: f64) {
        self.visited = true;
        self.distance = distance;
    }

    pub(crate) fn lower_distance(&mut self, distance: f64) {
        self.distance = distance;
    }

    pub(crate) fn set_on_path(&mut self, on_path: bool) {
        self.on_path = on_path;
    }

    pub(crate) fn remove_link(&mut self, direction: Direction) {
        self.links.retain(|link| link.direction != direction);
    }
}
