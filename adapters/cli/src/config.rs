//! Session settings merged from a TOML file and command-line flags.

use std::{fs, path::Path, time::Duration};

use anyhow::{bail, Context, Result};
use pursuit_core::{CellCoord, Direction};
use pursuit_system_scheduler::Difficulty;
use serde::Deserialize;

use crate::{keys::KeyStep, Cli};

const DEFAULT_SIDE: u32 = 30;
const DEFAULT_MAX_TICKS: u64 = 10_000;
const DEFAULT_TICK_MS: u64 = 10;

/// Optional defaults loaded from `--config`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct SessionConfig {
    pub(crate) columns: Option<u32>,
    pub(crate) rows: Option<u32>,
    pub(crate) seeker: Option<[u32; 2]>,
    pub(crate) target: Option<[u32; 2]>,
    pub(crate) walls: Vec<[u32; 2]>,
    pub(crate) wall_density: Option<f64>,
    pub(crate) seed: Option<u64>,
    pub(crate) difficulty: Option<Difficulty>,
    pub(crate) intents: Vec<Direction>,
    pub(crate) keys: Vec<String>,
    pub(crate) max_ticks: Option<u64>,
    pub(crate) tick_ms: Option<u64>,
    pub(crate) realtime: Option<bool>,
}

impl SessionConfig {
    /// Reads and parses a TOML session file.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read session config at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("invalid session config at {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse session config toml contents")
    }
}

/// Fully resolved settings for one headless run.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Settings {
    pub(crate) columns: u32,
    pub(crate) rows: u32,
    pub(crate) seeker: CellCoord,
    pub(crate) target: CellCoord,
    pub(crate) walls: Vec<CellCoord>,
    pub(crate) wall_density: f64,
    pub(crate) seed: u64,
    pub(crate) difficulty: Difficulty,
    pub(crate) intents: Vec<Direction>,
    pub(crate) keys: Vec<KeyStep>,
    pub(crate) max_ticks: u64,
    pub(crate) tick: Duration,
    pub(crate) realtime: bool,
}

impl Settings {
    /// Layers command-line flags over file values over built-in defaults.
    pub(crate) fn resolve(cli: &Cli, file: SessionConfig) -> Result<Self> {
        let columns = cli.columns.or(file.columns).unwrap_or(DEFAULT_SIDE);
        let rows = cli.rows.or(file.rows).unwrap_or(DEFAULT_SIDE);
        if columns == 0 || rows == 0 {
            bail!("grid must have at least one column and one row, got {columns}x{rows}");
        }

        let seeker = cli
            .seeker
            .or(file.seeker.map(to_cell))
            .unwrap_or(CellCoord::new(0, 0));
        let target = cli
            .target
            .or(file.target.map(to_cell))
            .unwrap_or(CellCoord::new(columns - 1, rows - 1));
        for (name, cell) in [("seeker", seeker), ("target", target)] {
            if cell.column() >= columns || cell.row() >= rows {
                bail!("{name} {cell} lies outside the {columns}x{rows} grid");
            }
        }
        if seeker == target {
            bail!("seeker and target must start on different cells, both at {seeker}");
        }

        let walls = if cli.walls.is_empty() {
            file.walls.into_iter().map(to_cell).collect()
        } else {
            cli.walls.clone()
        };
        let intents = if cli.intents.is_empty() {
            file.intents
        } else {
            cli.intents.clone()
        };
        let keys = if cli.keys.is_empty() {
            file.keys
                .iter()
                .map(|step| {
                    step.parse::<KeyStep>()
                        .with_context(|| format!("invalid key step `{step}`"))
                })
                .collect::<Result<_>>()?
        } else {
            cli.keys.clone()
        };

        Ok(Self {
            columns,
            rows,
            seeker,
            target,
            walls,
            wall_density: cli.wall_density.or(file.wall_density).unwrap_or(0.0),
            seed: cli.seed.or(file.seed).unwrap_or(0),
            difficulty: cli.difficulty.or(file.difficulty).unwrap_or_default(),
            intents,
            keys,
            max_ticks: cli.max_ticks.or(file.max_ticks).unwrap_or(DEFAULT_MAX_TICKS),
            tick: Duration::from_millis(cli.tick_ms.or(file.tick_ms).unwrap_or(DEFAULT_TICK_MS)),
            realtime: cli.realtime || file.realtime.unwrap_or(false),
        })
    }
}

fn to_cell([column, row]: [u32; 2]) -> CellCoord {
    CellCoord::new(column, row)
}
