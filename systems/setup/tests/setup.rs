use pursuit_core::{CellCoord, Command, Event, Phase};
use pursuit_system_setup::{Setup, SetupInput};

fn click(cell: CellCoord) -> SetupInput {
    SetupInput {
        primary_action: true,
        cursor_cell: Some(cell),
        ..SetupInput::default()
    }
}

#[test]
fn first_click_places_seeker() {
    let mut setup = Setup::default();
    let mut commands = Vec::new();

    setup.handle(&[], click(CellCoord::new(3, 4)), &mut commands);

    assert_eq!(
        commands,
        vec![Command::PlaceSeeker {
            cell: CellCoord::new(3, 4)
        }],
        "the opening click must place the seeker",
    );
}

#[test]
fn clicks_follow_phase_changes() {
    let mut setup = Setup::default();
    let mut commands = Vec::new();

    setup.handle(
        &[Event::PhaseChanged {
            phase: Phase::PlacingTarget,
        }],
        click(CellCoord::new(1, 1)),
        &mut commands,
    );
    setup.handle(
        &[Event::PhaseChanged {
            phase: Phase::PlacingWalls,
        }],
        click(CellCoord::new(2, 2)),
        &mut commands,
    );

    assert_eq!(
        commands,
        vec![
            Command::PlaceTarget {
                cell: CellCoord::new(1, 1)
            },
            Command::PaintWall {
                cell: CellCoord::new(2, 2)
            },
        ]
    );
}

#[test]
fn secondary_action_erases_only_while_placing_walls() {
    let mut setup = Setup::default();
    let mut commands = Vec::new();
    let erase = SetupInput {
        secondary_action: true,
        cursor_cell: Some(CellCoord::new(0, 2)),
        ..SetupInput::default()
    };

    setup.handle(&[], erase, &mut commands);
    assert!(commands.is_empty(), "erasing before walls phase is ignored");

    setup.handle(
        &[Event::PhaseChanged {
            phase: Phase::PlacingWalls,
        }],
        erase,
        &mut commands,
    );
    assert_eq!(
        commands,
        vec![Command::EraseWall {
            cell: CellCoord::new(0, 2)
        }]
    );
}

#[test]
fn start_only_emitted_from_wall_phase() {
    let mut setup = Setup::default();
    let mut commands = Vec::new();
    let start = SetupInput {
        start_action: true,
        ..SetupInput::default()
    };

    setup.handle(&[], start, &mut commands);
    assert!(commands.is_empty());

    setup.handle(
        &[Event::PhaseChanged {
            phase: Phase::PlacingWalls,
        }],
        start,
        &mut commands,
    );
    assert_eq!(commands, vec![Command::Start]);
}

#[test]
fn running_session_ignores_pointer() {
    let mut setup = Setup::default();
    let mut commands = Vec::new();

    setup.handle(
        &[Event::PhaseChanged {
            phase: Phase::Running,
        }],
        click(CellCoord::new(0, 0)),
        &mut commands,
    );

    assert!(commands.is_empty());
    assert_eq!(setup.phase(), Phase::Running);
}

#[test]
fn grid_reconfiguration_restarts_placement() {
    let mut setup = Setup::default();
    let mut commands = Vec::new();

    setup.handle(
        &[
            Event::PhaseChanged {
                phase: Phase::Ended,
            },
            Event::GridConfigured {
                columns: 10,
                rows: 10,
            },
        ],
        click(CellCoord::new(5, 5)),
        &mut commands,
    );

    assert_eq!(
        commands,
        vec![Command::PlaceSeeker {
            cell: CellCoord::new(5, 5)
        }]
    );
}
