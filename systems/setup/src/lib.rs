#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure setup-phase system that turns pointer input into placement commands.

use pursuit_core::{CellCoord, Command, Event, Phase};

/// Input snapshot distilled from adapter-provided pointer data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SetupInput {
    /// Primary button is held or was clicked this frame.
    pub primary_action: bool,
    /// Secondary button is held or was clicked this frame.
    pub secondary_action: bool,
    /// Player asked to begin the pursuit this frame.
    pub start_action: bool,
    /// Cell currently under the pointer.
    pub cursor_cell: Option<CellCoord>,
}

impl SetupInput {
    /// Creates a new input descriptor with explicit field values.
    #[must_use]
    pub const fn new(
        primary_action: bool,
        secondary_action: bool,
        start_action: bool,
        cursor_cell: Option<CellCoord>,
    ) -> Self {
        Self {
            primary_action,
            secondary_action,
            start_action,
            cursor_cell,
        }
    }
}

/// Setup system that follows the session phase and emits placement commands.
///
/// The first primary action places the seeker, the second the target; after
/// that primary actions paint walls and secondary actions erase them.
#[derive(Clone, Debug)]
pub struct Setup {
    phase: Phase,
}

impl Default for Setup {
    fn default() -> Self {
        Self::new()
    }
}

impl Setup {
    /// Creates a setup system waiting for the seeker placement.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: Phase::PlacingSeeker,
        }
    }

    /// Phase last observed through world events.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Consumes world events and pointer input to emit setup commands.
    pub fn handle(&mut self, events: &[Event], input: SetupInput, out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::PhaseChanged { phase } => self.phase = *phase,
                Event::GridConfigured { .. } => self.phase = Phase::PlacingSeeker,
                _ => {}
            }
        }

        if let Some(cell) = input.cursor_cell {
            let command = match self.phase {
                Phase::PlacingSeeker if input.primary_action => Some(Command::PlaceSeeker { cell }),
                Phase::PlacingTarget if input.primary_action => Some(Command::PlaceTarget { cell }),
                Phase::PlacingWalls if input.primary_action => Some(Command::PaintWall { cell }),
                Phase::PlacingWalls if input.secondary_action => Some(Command::EraseWall { cell }),
                _ => None,
            };
            out.extend(command);
        }

        if input.start_action && self.phase == Phase::PlacingWalls {
            out.push(Command::Start);
        }
    }
}
