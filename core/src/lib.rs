#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the pursuit engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::{f64::consts::SQRT_2, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Cost of a single step toward one of the four orthogonal neighbours.
pub const ORTHOGONAL_COST: f64 = 1.0;

/// Cost of a single step toward one of the four diagonal neighbours.
pub const DIAGONAL_COST: f64 = SQRT_2;

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Discards the current grid and builds a fresh one with the provided extent.
    ConfigureGrid {
        /// Number of columns laid out in the grid.
        columns: u32,
        /// Number of rows laid out in the grid.
        rows: u32,
    },
    /// Places the seeker on the provided cell during setup.
    PlaceSeeker {
        /// Cell that should host the seeker.
        cell: CellCoord,
    },
    /// Places the target on the provided cell during setup.
    PlaceTarget {
        /// Cell that should host the target.
        cell: CellCoord,
    },
    /// Marks the provided cell as a wall during setup.
    PaintWall {
        /// Cell that should become a wall.
        cell: CellCoord,
    },
    /// Clears the wall flag of the provided cell during setup.
    EraseWall {
        /// Cell whose wall should be removed.
        cell: CellCoord,
    },
    /// Leaves setup and begins the pursuit if the seeker can reach the target.
    Start,
    /// Requests that the target advance one step in the provided direction.
    MoveTarget {
        /// Compass direction of the attempted step.
        direction: Direction,
    },
    /// Requests that the seeker advance one step along the shortest path.
    AdvanceSeeker,
    /// Fires a straight shot from the target along the last direction it moved.
    Fire,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    /// Confirms that a new grid replaced the previous one.
    GridConfigured {
        /// Number of columns contained in the new grid.
        columns: u32,
        /// Number of rows contained in the new grid.
        rows: u32,
    },
    /// Announces that the session entered a new phase.
    PhaseChanged {
        /// Phase that became active after processing commands.
        phase: Phase,
    },
    /// Confirms that the seeker was placed during setup.
    SeekerPlaced {
        /// Cell now occupied by the seeker.
        cell: CellCoord,
    },
    /// Confirms that the target was placed during setup.
    TargetPlaced {
        /// Cell now occupied by the target.
        cell: CellCoord,
    },
    /// Confirms that a wall was painted onto a cell.
    WallPainted {
        /// Cell that became a wall.
        cell: CellCoord,
    },
    /// Confirms that a wall was removed from a cell.
    WallErased {
        /// Cell whose wall was removed.
        cell: CellCoord,
    },
    /// Reports that a grid extent was refused; the previous session is kept.
    GridRejected {
        /// Requested number of columns.
        columns: u32,
        /// Requested number of rows.
        rows: u32,
        /// Specific reason the extent was refused.
        reason: GridError,
    },
    /// Reports that a setup placement request was rejected.
    PlacementRejected {
        /// Cell provided in the placement request.
        cell: CellCoord,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Reports that the distance field completed a recompute pass.
    FieldRecomputed {
        /// Whether the seeker was reached from the target during the pass.
        path_exists: bool,
        /// Number of cells the pass visited.
        visited: usize,
    },
    /// Confirms that the target moved between two adjacent cells.
    TargetMoved {
        /// Cell the target occupied before moving.
        from: CellCoord,
        /// Cell the target occupies after moving.
        to: CellCoord,
        /// Direction of the completed step.
        direction: Direction,
    },
    /// Reports that a movement intent was discarded.
    IntentRejected {
        /// Direction of the discarded intent.
        direction: Direction,
        /// Specific reason the intent was discarded.
        reason: IntentError,
    },
    /// Confirms that the seeker moved one step closer to the target.
    SeekerAdvanced {
        /// Cell the seeker occupied before moving.
        from: CellCoord,
        /// Cell the seeker occupies after moving.
        to: CellCoord,
    },
    /// Reports that the seeker cannot reach the target.
    NoPath {
        /// Cell occupied by the seeker.
        seeker: CellCoord,
        /// Cell occupied by the target.
        target: CellCoord,
    },
    /// Reports that the seeker caught the target. Terminal.
    Collision {
        /// Cell occupied by the seeker when it caught the target.
        seeker: CellCoord,
        /// Cell occupied by the target when it was caught.
        target: CellCoord,
    },
    /// Reports that a shot stopped against a wall.
    ShotBlocked {
        /// Cell the shot left from.
        from: CellCoord,
        /// Direction the shot travelled.
        direction: Direction,
        /// Wall cell that stopped the shot.
        wall: CellCoord,
    },
    /// Reports that a shot left the grid without hitting anything.
    ShotMissed {
        /// Cell the shot left from.
        from: CellCoord,
        /// Direction the shot travelled.
        direction: Direction,
    },
    /// Reports that a shot from the target hit the seeker. Terminal.
    SeekerShot {
        /// Cell the shot left from.
        target: CellCoord,
        /// Cell occupied by the seeker when it was hit.
        seeker: CellCoord,
        /// Direction the shot travelled.
        direction: Direction,
    },
}

impl Event {
    /// Reports whether the event ends the pursuit.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Collision { .. }
                | Self::SeekerShot { .. }
                | Self::PhaseChanged {
                    phase: Phase::Ended
                }
        )
    }
}

/// Lifecycle of a single game session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Waiting for the player to choose the seeker's starting cell.
    PlacingSeeker,
    /// Waiting for the player to choose the target's starting cell.
    PlacingTarget,
    /// Walls may be painted and erased until the pursuit starts.
    PlacingWalls,
    /// The pursuit is in progress; only movement commands are honoured.
    Running,
    /// The pursuit finished through a collision or because no path remained.
    Ended,
}

/// Occupant role carried by a cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// The cell hosts neither entity.
    #[default]
    None,
    /// The cell hosts the pursuing entity.
    Seeker,
    /// The cell hosts the pursued entity.
    Target,
}

/// Compass labels for the eight links a cell may have.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    /// Toward decreasing row indices.
    #[serde(rename = "N")]
    North,
    /// Toward decreasing rows and increasing columns.
    #[serde(rename = "NE")]
    NorthEast,
    /// Toward increasing column indices.
    #[serde(rename = "E")]
    East,
    /// Toward increasing rows and increasing columns.
    #[serde(rename = "SE")]
    SouthEast,
    /// Toward increasing row indices.
    #[serde(rename = "S")]
    South,
    /// Toward increasing rows and decreasing columns.
    #[serde(rename = "SW")]
    SouthWest,
    /// Toward decreasing column indices.
    #[serde(rename = "W")]
    West,
    /// Toward decreasing rows and decreasing columns.
    #[serde(rename = "NW")]
    NorthWest,
}

impl Direction {
    /// Every direction in neighbour-table order.
    ///
    /// Column offsets form the outer loop and row offsets the inner loop, both
    /// running from -1 to 1, so links are stored west-to-east and, within a
    /// column, north-to-south.
    pub const ALL: [Direction; 8] = [
        Direction::NorthWest,
        Direction::West,
        Direction::SouthWest,
        Direction::North,
        Direction::South,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
    ];

    /// Column and row offsets applied by a single step.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::NorthEast => (1, -1),
            Self::East => (1, 0),
            Self::SouthEast => (1, 1),
            Self::South => (0, 1),
            Self::SouthWest => (-1, 1),
            Self::West => (-1, 0),
            Self::NorthWest => (-1, -1),
        }
    }

    /// Resolves the direction matching a unit offset, if any.
    #[must_use]
    pub const fn from_delta(column: i32, row: i32) -> Option<Self> {
        match (column, row) {
            (0, -1) => Some(Self::North),
            (1, -1) => Some(Self::NorthEast),
            (1, 0) => Some(Self::East),
            (1, 1) => Some(Self::SouthEast),
            (0, 1) => Some(Self::South),
            (-1, 1) => Some(Self::SouthWest),
            (-1, 0) => Some(Self::West),
            (-1, -1) => Some(Self::NorthWest),
            _ => None,
        }
    }

    /// Reports whether the direction moves along both axes.
    #[must_use]
    pub const fn is_diagonal(self) -> bool {
        matches!(
            self,
            Self::NorthEast | Self::SouthEast | Self::SouthWest | Self::NorthWest
        )
    }

    /// Connection cost of a link pointing in this direction.
    #[must_use]
    pub const fn cost(self) -> f64 {
        if self.is_diagonal() {
            DIAGONAL_COST
        } else {
            ORTHOGONAL_COST
        }
    }

    /// The two orthogonal directions flanking a diagonal.
    ///
    /// Returns `None` for orthogonal directions.
    #[must_use]
    pub const fn orthogonal_components(self) -> Option<(Direction, Direction)> {
        match self {
            Self::NorthEast => Some((Self::North, Self::East)),
            Self::SouthEast => Some((Self::South, Self::East)),
            Self::SouthWest => Some((Self::South, Self::West)),
            Self::NorthWest => Some((Self::North, Self::West)),
            _ => None,
        }
    }

    /// Direction pointing the opposite way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::NorthEast => Self::SouthWest,
            Self::East => Self::West,
            Self::SouthEast => Self::NorthWest,
            Self::South => Self::North,
            Self::SouthWest => Self::NorthEast,
            Self::West => Self::East,
            Self::NorthWest => Self::SouthEast,
        }
    }

    /// Short compass label, e.g. `"NE"`.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::North => "N",
            Self::NorthEast => "NE",
            Self::East => "E",
            Self::SouthEast => "SE",
            Self::South => "S",
            Self::SouthWest => "SW",
            Self::West => "W",
            Self::NorthWest => "NW",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a string is not a compass label.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("'{0}' is not a compass direction (expected one of N, NE, E, SE, S, SW, W, NW)")]
pub struct ParseDirectionError(String);

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|direction| direction.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseDirectionError(trimmed.to_owned()))
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Coordinate one step away in the provided direction.
    ///
    /// Returns `None` when the step would leave the non-negative quadrant or
    /// overflow; the upper grid bounds are checked by the grid itself.
    #[must_use]
    pub fn offset(self, direction: Direction) -> Option<CellCoord> {
        let (column_delta, row_delta) = direction.delta();
        let column = self.column.checked_add_signed(column_delta)?;
        let row = self.row.checked_add_signed(row_delta)?;
        Some(CellCoord::new(column, row))
    }

    /// Direction of the single step leading from `self` to `other`, if adjacent.
    #[must_use]
    pub fn direction_to(self, other: CellCoord) -> Option<Direction> {
        let column = i64::from(other.column) - i64::from(self.column);
        let row = i64::from(other.row) - i64::from(self.row);
        let column = i32::try_from(column).ok()?;
        let row = i32::try_from(row).ok()?;
        Direction::from_delta(column, row)
    }

    /// Computes the Chebyshev (king-move) distance between two coordinates.
    #[must_use]
    pub fn chebyshev_distance(self, other: CellCoord) -> u32 {
        self.column
            .abs_diff(other.column)
            .max(self.row.abs_diff(other.row))
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

/// Failures raised by coordinate-bounded grid lookups.
///
/// These indicate bad caller input rather than game states.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum GridError {
    /// The coordinate lies outside `[0, columns) x [0, rows)`.
    #[error("cell {cell} lies outside the {columns}x{rows} grid")]
    OutOfBounds {
        /// Coordinate that was requested.
        cell: CellCoord,
        /// Number of columns in the grid.
        columns: u32,
        /// Number of rows in the grid.
        rows: u32,
    },
    /// The requested extent holds more cells than a grid may allocate.
    #[error("a {columns}x{rows} grid exceeds the limit of {limit} cells")]
    TooLarge {
        /// Requested number of columns.
        columns: u32,
        /// Requested number of rows.
        rows: u32,
        /// Largest accepted cell count.
        limit: usize,
    },
}

/// Reasons a setup placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum PlacementError {
    /// The session is not in the phase that accepts this placement.
    #[error("placement is not allowed in the current phase")]
    InvalidPhase,
    /// The requested cell lies beyond the configured grid bounds.
    #[error("cell lies outside the grid")]
    OutOfBounds,
    /// The requested cell already hosts the seeker or the target.
    #[error("cell is occupied by the seeker or the target")]
    Occupied,
    /// The requested cell is a wall.
    #[error("cell is a wall")]
    Wall,
}

/// Reasons a target movement intent may be discarded by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum IntentError {
    /// The pursuit is not running.
    #[error("the pursuit is not running")]
    InvalidPhase,
    /// The target has no link in the requested direction.
    #[error("no neighbour in that direction")]
    OutOfBounds,
    /// The destination is a wall, or the diagonal passes between two walls.
    #[error("destination is a wall")]
    Wall,
    /// The destination cell hosts the seeker.
    #[error("destination is occupied by the seeker")]
    Seeker,
}
