#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative session state for the pursuit engine.
//!
//! The [`World`] owns the grid, the distance field and the placement of the
//! seeker and the target. Adapters and systems mutate it exclusively through
//! [`apply`] and observe it through the [`query`] module.

mod cell;
mod distance_field;
mod grid;
mod neighbors;
mod path;

pub use cell::{Cell, NeighborLink};
pub use distance_field::{DistanceField, FieldOutcome, FieldState};
pub use grid::{Grid, MAX_GRID_CELLS};
pub use neighbors::NeighborTable;
pub use path::{PathTrace, PathTracer};

use pursuit_core::{
    CellCoord, Command, Direction, Event, GridError, IntentError, Phase, PlacementError, Role,
};

/// Number of columns used when no grid has been configured.
pub const DEFAULT_COLUMNS: u32 = 30;
/// Number of rows used when no grid has been configured.
pub const DEFAULT_ROWS: u32 = 30;

const _: () = assert!((DEFAULT_COLUMNS as usize) * (DEFAULT_ROWS as usize) <= MAX_GRID_CELLS);

/// Represents one pursuit session.
#[derive(Debug)]
pub struct World {
    grid: Grid,
    field: DistanceField,
    seeker: Option<CellCoord>,
    target: Option<CellCoord>,
    facing: Direction,
    phase: Phase,
}

impl World {
    /// Creates a session on the default grid, waiting for the seeker placement.
    #[must_use]
    pub fn new() -> Self {
        Self::on_grid(Grid::allocate(DEFAULT_COLUMNS, DEFAULT_ROWS))
    }

    /// Creates a session on a `columns x rows` grid.
    pub fn with_dimensions(columns: u32, rows: u32) -> Result<Self, GridError> {
        Grid::build(columns, rows).map(Self::on_grid)
    }

    fn on_grid(grid: Grid) -> Self {
        Self {
            grid,
            field: DistanceField::new(),
            seeker: None,
            target: None,
            facing: Direction::North,
            phase: Phase::PlacingSeeker,
        }
    }

    fn enter_phase(&mut self, phase: Phase, out_events: &mut Vec<Event>) {
        if self.phase == phase {
            return;
        }
        tracing::debug!(from = ?self.phase, to = ?phase, "phase changed");
        self.phase = phase;
        out_events.push(Event::PhaseChanged { phase });
    }

    fn place_role(
        &mut self,
        cell: CellCoord,
        role: Role,
        required: Phase,
    ) -> Result<(), PlacementError> {
        if self.phase != required {
            return Err(PlacementError::InvalidPhase);
        }
        let slot = self
            .grid
            .get_mut(cell)
            .map_err(|_| PlacementError::OutOfBounds)?;
        if slot.is_wall() {
            return Err(PlacementError::Wall);
        }
        if slot.role() != Role::None {
            return Err(PlacementError::Occupied);
        }
        slot.set_role(role);
        self.field.invalidate();
        Ok(())
    }

    fn edit_wall(&mut self, cell: CellCoord, wall: bool) -> Result<bool, PlacementError> {
        if self.phase != Phase::PlacingWalls {
            return Err(PlacementError::InvalidPhase);
        }
        let slot = self
            .grid
            .get_mut(cell)
            .map_err(|_| PlacementError::OutOfBounds)?;
        if wall && slot.role() != Role::None {
            return Err(PlacementError::Occupied);
        }
        if slot.is_wall() == wall {
            return Ok(false);
        }
        slot.set_wall(wall);
        self.field.invalidate();
        Ok(true)
    }

    fn recompute(&mut self, out_events: &mut Vec<Event>) -> Result<bool, GridError> {
        let Some(target) = self.target else {
            return Ok(false);
        };
        let outcome = self.field.recompute(&mut self.grid, target)?;
        out_events.push(Event::FieldRecomputed {
            path_exists: outcome.path_exists,
            visited: outcome.visited,
        });
        self.mark_path()?;
        Ok(outcome.path_exists)
    }

    fn mark_path(&mut self) -> Result<(), GridError> {
        self.grid.for_each_cell_mut(|cell| cell.set_on_path(false));
        let Some(seeker) = self.seeker else {
            return Ok(());
        };
        if !self.field.path_exists() {
            return Ok(());
        }
        for step in PathTracer::trace(&mut self.grid, seeker) {
            let _ = step?;
        }
        Ok(())
    }

    fn start(&mut self, out_events: &mut Vec<Event>) -> Result<(), GridError> {
        if self.phase != Phase::PlacingWalls {
            tracing::debug!(phase = ?self.phase, "start ignored outside wall placement");
            return Ok(());
        }
        let (Some(seeker), Some(target)) = (self.seeker, self.target) else {
            return Ok(());
        };

        if self.recompute(out_events)? {
            self.enter_phase(Phase::Running, out_events);
        } else {
            tracing::debug!(%seeker, target_cell = %target, "start refused without a path");
            out_events.push(Event::NoPath { seeker, target });
        }
        Ok(())
    }

    fn move_target(
        &mut self,
        direction: Direction,
    ) -> Result<(CellCoord, CellCoord), IntentError> {
        if self.phase != Phase::Running {
            return Err(IntentError::InvalidPhase);
        }
        let from = self.target.ok_or(IntentError::InvalidPhase)?;
        let link = self
            .grid
            .get(from)
            .ok()
            .and_then(|cell| cell.link(direction))
            .map(NeighborLink::target);
        let to = match link {
            Some(to) => to,
            // In bounds but unlinked: the diagonal squeezes between two walls.
            None if from
                .offset(direction)
                .is_some_and(|cell| self.grid.contains(cell)) =>
            {
                return Err(IntentError::Wall)
            }
            None => return Err(IntentError::OutOfBounds),
        };

        let destination = self.grid.get(to).map_err(|_| IntentError::OutOfBounds)?;
        if destination.is_wall() {
            return Err(IntentError::Wall);
        }
        if destination.role() == Role::Seeker {
            return Err(IntentError::Seeker);
        }

        if let Ok(cell) = self.grid.get_mut(from) {
            cell.set_role(Role::None);
        }
        if let Ok(cell) = self.grid.get_mut(to) {
            cell.set_role(Role::Target);
        }
        self.target = Some(to);
        self.facing = direction;
        self.field.invalidate();
        Ok((from, to))
    }

    fn fire(&mut self, out_events: &mut Vec<Event>) {
        if self.phase != Phase::Running {
            tracing::debug!(phase = ?self.phase, "shot ignored outside a running session");
            return;
        }
        let Some(from) = self.target else {
            return;
        };
        let direction = self.facing;
        let mut current = from;
        loop {
            let Some(next) = current
                .offset(direction)
                .filter(|cell| self.grid.contains(*cell))
            else {
                out_events.push(Event::ShotMissed { from, direction });
                return;
            };
            if let Some(wall) = self.shot_stopper(current, next, direction) {
                tracing::debug!(%from, %wall, "shot blocked");
                out_events.push(Event::ShotBlocked {
                    from,
                    direction,
                    wall,
                });
                return;
            }
            if self.seeker == Some(next) {
                tracing::debug!(%from, seeker = %next, "seeker shot down");
                out_events.push(Event::SeekerShot {
                    target: from,
                    seeker: next,
                    direction,
                });
                self.enter_phase(Phase::Ended, out_events);
                return;
            }
            current = next;
        }
    }

    /// Wall that stops a shot crossing from `current` into `next`, if any.
    ///
    /// A diagonal shot squeezing between two walls stops at the first flank.
    fn shot_stopper(
        &self,
        current: CellCoord,
        next: CellCoord,
        direction: Direction,
    ) -> Option<CellCoord> {
        let is_wall = |cell: CellCoord| self.grid.get(cell).is_ok_and(Cell::is_wall);
        if is_wall(next) {
            return Some(next);
        }
        let (first, second) = direction.orthogonal_components()?;
        let first = current.offset(first)?;
        let second = current.offset(second)?;
        (is_wall(first) && is_wall(second)).then_some(first)
    }

    fn advance_seeker(&mut self, out_events: &mut Vec<Event>) -> Result<(), GridError> {
        if self.phase != Phase::Running {
            return Ok(());
        }
        let (Some(seeker), Some(target)) = (self.seeker, self.target) else {
            return Ok(());
        };

        if !self.field.is_fresh() {
            let _ = self.recompute(out_events)?;
        }

        let next = if self.field.path_exists() {
            PathTracer::next_step(&self.grid, seeker)?
        } else {
            None
        };

        let Some(next) = next else {
            out_events.push(Event::NoPath { seeker, target });
            self.enter_phase(Phase::Ended, out_events);
            return Ok(());
        };

        if next == target {
            tracing::debug!(%seeker, target_cell = %target, "seeker caught the target");
            out_events.push(Event::Collision { seeker, target });
            self.enter_phase(Phase::Ended, out_events);
            return Ok(());
        }

        self.grid.get_mut(seeker)?.set_role(Role::None);
        self.grid.get_mut(next)?.set_role(Role::Seeker);
        self.seeker = Some(next);
        out_events.push(Event::SeekerAdvanced {
            from: seeker,
            to: next,
        });
        self.mark_path()
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    let result = match command {
        Command::ConfigureGrid { columns, rows } => {
            match World::with_dimensions(columns, rows) {
                Ok(fresh) => {
                    *world = fresh;
                    out_events.push(Event::GridConfigured { columns, rows });
                    out_events.push(Event::PhaseChanged {
                        phase: Phase::PlacingSeeker,
                    });
                }
                Err(reason) => {
                    tracing::warn!(columns, rows, %reason, "grid extent refused");
                    out_events.push(Event::GridRejected {
                        columns,
                        rows,
                        reason,
                    });
                }
            }
            Ok(())
        }
        Command::PlaceSeeker { cell } => {
            match world.place_role(cell, Role::Seeker, Phase::PlacingSeeker) {
                Ok(()) => {
                    world.seeker = Some(cell);
                    out_events.push(Event::SeekerPlaced { cell });
                    world.enter_phase(Phase::PlacingTarget, out_events);
                }
                Err(reason) => out_events.push(Event::PlacementRejected { cell, reason }),
            }
            Ok(())
        }
        Command::PlaceTarget { cell } => {
            match world.place_role(cell, Role::Target, Phase::PlacingTarget) {
                Ok(()) => {
                    world.target = Some(cell);
                    out_events.push(Event::TargetPlaced { cell });
                    world.enter_phase(Phase::PlacingWalls, out_events);
                }
                Err(reason) => out_events.push(Event::PlacementRejected { cell, reason }),
            }
            Ok(())
        }
        Command::PaintWall { cell } => {
            match world.edit_wall(cell, true) {
                Ok(true) => out_events.push(Event::WallPainted { cell }),
                Ok(false) => {}
                Err(reason) => out_events.push(Event::PlacementRejected { cell, reason }),
            }
            Ok(())
        }
        Command::EraseWall { cell } => {
            match world.edit_wall(cell, false) {
                Ok(true) => out_events.push(Event::WallErased { cell }),
                Ok(false) => {}
                Err(reason) => out_events.push(Event::PlacementRejected { cell, reason }),
            }
            Ok(())
        }
        Command::Start => world.start(out_events),
        Command::MoveTarget { direction } => match world.move_target(direction) {
            Ok((from, to)) => {
                out_events.push(Event::TargetMoved {
                    from,
                    to,
                    direction,
                });
                world.recompute(out_events).map(|_| ())
            }
            Err(reason) => {
                tracing::debug!(%direction, %reason, "target intent discarded");
                out_events.push(Event::IntentRejected { direction, reason });
                Ok(())
            }
        },
        Command::AdvanceSeeker => world.advance_seeker(out_events),
        Command::Fire => {
            world.fire(out_events);
            Ok(())
        }
    };

    if let Err(error) = result {
        tracing::error!(%error, ?command, "command violated a grid invariant");
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{Cell, FieldState, Grid, PathTracer, World};
    use pursuit_core::{CellCoord, Direction, GridError, Phase, Role};

    /// Provides read-only access to the session grid.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        &world.grid
    }

    /// Looks up a single cell.
    pub fn cell(world: &World, coord: CellCoord) -> Result<&Cell, GridError> {
        world.grid.get(coord)
    }

    /// Cell currently hosting the seeker.
    #[must_use]
    pub fn seeker(world: &World) -> Option<CellCoord> {
        world.seeker
    }

    /// Cell currently hosting the target.
    #[must_use]
    pub fn target(world: &World) -> Option<CellCoord> {
        world.target
    }

    /// Direction of the target's last successful move; shots travel this way.
    ///
    /// North until the target first moves.
    #[must_use]
    pub fn facing(world: &World) -> Direction {
        world.facing
    }

    /// Current session phase.
    #[must_use]
    pub fn phase(world: &World) -> Phase {
        world.phase
    }

    /// Validity of the stored distances.
    #[must_use]
    pub fn field_state(world: &World) -> FieldState {
        world.field.state()
    }

    /// Whether the last completed recompute reached the seeker.
    #[must_use]
    pub fn path_exists(world: &World) -> bool {
        world.field.path_exists()
    }

    /// Cells from the seeker to the target along the current shortest path.
    ///
    /// Empty when no fresh path exists.
    #[must_use]
    pub fn path_cells(world: &World) -> Vec<CellCoord> {
        let mut path = Vec::new();
        let Some(mut current) = world.seeker else {
            return path;
        };
        if !world.field.path_exists() {
            return path;
        }

        for _ in 0..world.grid.len() {
            path.push(current);
            let at_target = world
                .grid
                .get(current)
                .map_or(true, |cell| cell.visited() && cell.distance() == 0.0);
            if at_target {
                break;
            }
            match PathTracer::next_step(&world.grid, current) {
                Ok(Some(next)) => current = next,
                _ => break,
            }
        }
        path
    }

    /// Text dump of the grid, one line per row.
    ///
    /// `S` seeker, `T` target, `#` wall, `*` path, `.` reached, space unreached.
    #[must_use]
    pub fn render_ascii(world: &World) -> String {
        let width = usize::try_from(world.grid.columns()).unwrap_or(0);
        let mut out = String::with_capacity(world.grid.len() + width);
        for cell in world.grid.iter() {
            let glyph = match cell.role() {
                Role::Seeker => 'S',
                Role::Target => 'T',
                Role::None if cell.is_wall() => '#',
                Role::None if cell.on_path() => '*',
                Role::None if cell.visited() => '.',
                Role::None => ' ',
            };
            out.push(glyph);
            if cell.coord().column() + 1 == world.grid.columns() {
                out.push('\n');
            }
        }
        out
    }
}
