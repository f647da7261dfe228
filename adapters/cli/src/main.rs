#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Headless command-line adapter that plays one pursuit session.

mod board;
mod config;
mod keys;

use std::{path::PathBuf, thread};

use anyhow::{bail, Context, Result};
use clap::Parser;
use pursuit_core::{CellCoord, Direction, Event};
use pursuit_system_controls::Controls;
use pursuit_system_scheduler::{Config, Difficulty, MotionScheduler, SchedulerState};
use pursuit_system_setup::{Setup, SetupInput};
use pursuit_world::{self as world, query, World};
use tracing_subscriber::EnvFilter;

use crate::{
    config::{SessionConfig, Settings},
    keys::KeyStep,
};

/// Runs a seeker/target pursuit on a weighted grid and reports the outcome.
#[derive(Parser, Debug)]
#[command(name = "pursuit", version)]
pub(crate) struct Cli {
    /// TOML file supplying defaults for every other option
    #[arg(long, value_name = "FILE")]
    pub(crate) config: Option<PathBuf>,

    /// Number of grid columns
    #[arg(long)]
    pub(crate) columns: Option<u32>,

    /// Number of grid rows
    #[arg(long)]
    pub(crate) rows: Option<u32>,

    /// Starting cell of the seeker
    #[arg(long, value_name = "X,Y", value_parser = board::parse_cell)]
    pub(crate) seeker: Option<CellCoord>,

    /// Starting cell of the target
    #[arg(long, value_name = "X,Y", value_parser = board::parse_cell)]
    pub(crate) target: Option<CellCoord>,

    /// Wall cell; may be repeated
    #[arg(long = "wall", value_name = "X,Y", value_parser = board::parse_cell)]
    pub(crate) walls: Vec<CellCoord>,

    /// Probability of a random wall on each cell
    #[arg(long)]
    pub(crate) wall_density: Option<f64>,

    /// Seed for the random wall layout
    #[arg(long)]
    pub(crate) seed: Option<u64>,

    /// Seeker speed: relaxed, normal, hard or brutal
    #[arg(long)]
    pub(crate) difficulty: Option<Difficulty>,

    /// Target moves submitted one per tick, e.g. `N,NE,E`
    #[arg(long, value_delimiter = ',')]
    pub(crate) intents: Vec<Direction>,

    /// Key transitions replayed one per tick, e.g. `+w,+d,-w,fire`
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub(crate) keys: Vec<KeyStep>,

    /// Give up after this many ticks
    #[arg(long)]
    pub(crate) max_ticks: Option<u64>,

    /// Simulated time per tick in milliseconds
    #[arg(long)]
    pub(crate) tick_ms: Option<u64>,

    /// Sleep for each tick instead of simulating time
    #[arg(long)]
    pub(crate) realtime: bool,

    /// Log at debug level
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Outcome {
    Caught { ticks: u64 },
    Shot { ticks: u64 },
    NoPath { ticks: u64 },
    Blocked,
    TimedOut { ticks: u64 },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let file = match &cli.config {
        Some(path) => SessionConfig::load(path)?,
        None => SessionConfig::default(),
    };
    let settings = Settings::resolve(&cli, file)?;

    let mut world = build_world(&settings)?;
    let outcome = play(&settings, &mut world);

    print!("{}", query::render_ascii(&world));
    match outcome {
        Outcome::Caught { ticks } => println!("seeker caught the target after {ticks} ticks"),
        Outcome::Shot { ticks } => println!("seeker shot down after {ticks} ticks"),
        Outcome::NoPath { ticks } => println!("target escaped: no path after {ticks} ticks"),
        Outcome::Blocked => println!("no path between seeker and target"),
        Outcome::TimedOut { ticks } => println!("gave up after {ticks} ticks"),
    }
    Ok(())
}

fn init_tracing(verbose: bool) -> Result<()> {
    let directive = if verbose { "pursuit=debug" } else { "pursuit=info" };
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) if verbose => filter.add_directive(directive.parse()?),
        Ok(filter) => filter,
        Err(_) => EnvFilter::new(directive),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

/// Places roles and walls through the setup system, as a pointer would.
fn build_world(settings: &Settings) -> Result<World> {
    let mut world = World::with_dimensions(settings.columns, settings.rows).with_context(|| {
        format!("cannot build a {}x{} board", settings.columns, settings.rows)
    })?;
    let mut setup = Setup::new();

    let random = if settings.wall_density > 0.0 {
        board::random_walls(
            settings.columns,
            settings.rows,
            settings.wall_density,
            settings.seed,
            &[settings.seeker, settings.target],
        )?
    } else {
        Vec::new()
    };

    let clicks = [settings.seeker, settings.target]
        .into_iter()
        .chain(settings.walls.iter().copied())
        .chain(random);

    let mut events = Vec::new();
    for (index, cell) in clicks.enumerate() {
        let mut commands = Vec::new();
        setup.handle(
            &events,
            SetupInput::new(true, false, false, Some(cell)),
            &mut commands,
        );
        events.clear();
        for command in commands {
            world::apply(&mut world, command, &mut events);
        }

        for event in &events {
            if let Event::PlacementRejected { cell, reason } = event {
                match index {
                    0 => bail!("cannot place seeker at {cell}: {reason}"),
                    1 => bail!("cannot place target at {cell}: {reason}"),
                    _ => tracing::warn!(%cell, %reason, "wall skipped"),
                }
            }
        }
    }

    tracing::info!(
        columns = settings.columns,
        rows = settings.rows,
        walls = query::grid(&world).iter().filter(|cell| cell.is_wall()).count(),
        "board ready"
    );
    Ok(world)
}

fn play(settings: &Settings, world: &mut World) -> Outcome {
    let mut scheduler = MotionScheduler::new(Config::from_difficulty(settings.difficulty));
    let mut events = Vec::new();
    if !scheduler.start(world, &mut events) {
        return Outcome::Blocked;
    }
    log_events(&events);

    let mut controls = Controls::new();
    controls.handle(&events);

    let mut intents = settings.intents.iter().copied();
    let mut keys = settings.keys.iter().copied();
    for tick in 1..=settings.max_ticks {
        if let Some(direction) = intents.next() {
            let _ = scheduler.submit_intent(direction);
        }
        match keys.next() {
            Some(KeyStep::Down(key)) => {
                if let Some(direction) = controls.key_down(key) {
                    let _ = scheduler.submit_intent(direction);
                }
            }
            Some(KeyStep::Up(key)) => {
                if let Some(direction) = controls.key_up(key) {
                    let _ = scheduler.submit_intent(direction);
                }
            }
            Some(KeyStep::Fire) => {
                let _ = scheduler.submit_fire();
            }
            None => {}
        }

        events.clear();
        scheduler.advance(settings.tick, world, &mut events);
        log_events(&events);
        controls.handle(&events);

        if scheduler.state() == SchedulerState::Stopped {
            return events
                .iter()
                .find_map(|event| match event {
                    Event::Collision { .. } => Some(Outcome::Caught { ticks: tick }),
                    Event::SeekerShot { .. } => Some(Outcome::Shot { ticks: tick }),
                    _ => None,
                })
                .unwrap_or(Outcome::NoPath { ticks: tick });
        }

        if settings.realtime {
            thread::sleep(settings.tick);
        }
    }
    Outcome::TimedOut {
        ticks: settings.max_ticks,
    }
}

fn log_events(events: &[Event]) {
    for event in events {
        match event {
            Event::Collision { seeker, target } => {
                tracing::info!(%seeker, target_cell = %target, "collision");
            }
            Event::NoPath { seeker, target } => {
                tracing::info!(%seeker, target_cell = %target, "no path");
            }
            Event::SeekerShot {
                target,
                seeker,
                direction,
            } => {
                tracing::info!(%seeker, target_cell = %target, %direction, "seeker shot");
            }
            other => tracing::debug!(event = ?other),
        }
    }
}
