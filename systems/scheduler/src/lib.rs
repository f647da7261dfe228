#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Cooperative motion scheduler driving the target and the seeker.
//!
//! Two repeating actions share the world: the target action consumes at most
//! one queued intent and then at most one queued shot per tick, and the
//! seeker action advances the seeker by one step. Both run to completion on
//! the caller's thread, so the distance field is always recomputed before the
//! next trace.

use std::{collections::VecDeque, fmt, str::FromStr, time::Duration};

use pursuit_core::{Command, Direction, Event, Phase};
use pursuit_world::{self as world, query, World};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_TARGET_PERIOD: Duration = Duration::from_millis(50);

/// Seeker cadence presets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Seeker steps every 300 ms.
    Relaxed,
    /// Seeker steps every 150 ms.
    #[default]
    Normal,
    /// Seeker steps every 100 ms.
    Hard,
    /// Seeker steps every 50 ms.
    Brutal,
}

impl Difficulty {
    /// Every preset, from slowest to fastest.
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Relaxed,
        Difficulty::Normal,
        Difficulty::Hard,
        Difficulty::Brutal,
    ];

    /// Interval between two seeker steps.
    #[must_use]
    pub const fn seeker_period(self) -> Duration {
        match self {
            Self::Relaxed => Duration::from_millis(300),
            Self::Normal => Duration::from_millis(150),
            Self::Hard => Duration::from_millis(100),
            Self::Brutal => Duration::from_millis(50),
        }
    }

    /// Lowercase name accepted by [`FromStr`].
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Relaxed => "relaxed",
            Self::Normal => "normal",
            Self::Hard => "hard",
            Self::Brutal => "brutal",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a difficulty name is not recognised.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown difficulty `{0}` (expected relaxed, normal, hard or brutal)")]
pub struct ParseDifficultyError(String);

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|difficulty| difficulty.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseDifficultyError(trimmed.to_owned()))
    }
}

/// Cadence of the two scheduled actions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    target_period: Duration,
    seeker_period: Duration,
}

impl Config {
    /// Creates a configuration with explicit periods.
    ///
    /// A zero period disables the corresponding action.
    #[must_use]
    pub const fn new(target_period: Duration, seeker_period: Duration) -> Self {
        Self {
            target_period,
            seeker_period,
        }
    }

    /// Default target cadence with the seeker paced by `difficulty`.
    #[must_use]
    pub const fn from_difficulty(difficulty: Difficulty) -> Self {
        Self::new(DEFAULT_TARGET_PERIOD, difficulty.seeker_period())
    }

    /// Interval between two target ticks.
    #[must_use]
    pub const fn target_period(&self) -> Duration {
        self.target_period
    }

    /// Interval between two seeker ticks.
    #[must_use]
    pub const fn seeker_period(&self) -> Duration {
        self.seeker_period
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_difficulty(Difficulty::default())
    }
}

/// Lifecycle of the scheduler.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SchedulerState {
    /// Not started yet.
    #[default]
    Idle,
    /// Ticks are being produced.
    Running,
    /// Suspended between ticks.
    Paused,
    /// Stopped by a terminal event or an explicit stop.
    Stopped,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Action {
    Target,
    Seeker,
}

/// Scheduler owning the intent queue and both action cadences.
#[derive(Debug)]
pub struct MotionScheduler {
    config: Config,
    state: SchedulerState,
    intents: VecDeque<Direction>,
    last_consumed: Option<Direction>,
    shots: usize,
    target_accumulator: Duration,
    seeker_accumulator: Duration,
}

impl MotionScheduler {
    /// Creates an idle scheduler using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: SchedulerState::Idle,
            intents: VecDeque::new(),
            last_consumed: None,
            shots: 0,
            target_accumulator: Duration::ZERO,
            seeker_accumulator: Duration::ZERO,
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> SchedulerState {
        self.state
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> Config {
        self.config
    }

    /// Number of intents waiting for a target tick.
    #[must_use]
    pub fn pending_intents(&self) -> usize {
        self.intents.len()
    }

    /// Number of shots waiting for a target tick.
    #[must_use]
    pub const fn pending_shots(&self) -> usize {
        self.shots
    }

    /// Replaces the cadence; the next tick already uses the new periods.
    pub fn set_config(&mut self, config: Config) {
        tracing::debug!(
            target_ms = config.target_period.as_millis(),
            seeker_ms = config.seeker_period.as_millis(),
            "scheduler cadence changed"
        );
        self.config = config;
    }

    /// Starts the pursuit.
    ///
    /// Issues [`Command::Start`] when the world is still in setup. Returns
    /// `false` and stays idle when the world refuses to start, typically
    /// because no path connects the seeker to the target.
    pub fn start(&mut self, world: &mut World, out: &mut Vec<Event>) -> bool {
        if self.state != SchedulerState::Idle {
            return self.state == SchedulerState::Running;
        }

        if query::phase(world) == Phase::PlacingWalls {
            world::apply(world, Command::Start, out);
        }

        if query::phase(world) != Phase::Running {
            tracing::debug!(phase = ?query::phase(world), "scheduler start refused");
            return false;
        }

        self.state = SchedulerState::Running;
        self.target_accumulator = Duration::ZERO;
        self.seeker_accumulator = Duration::ZERO;
        tracing::debug!("scheduler started");
        true
    }

    /// Suspends ticking. Partial periods are discarded.
    pub fn pause(&mut self) {
        if self.state != SchedulerState::Running {
            return;
        }
        self.state = SchedulerState::Paused;
        self.target_accumulator = Duration::ZERO;
        self.seeker_accumulator = Duration::ZERO;
        tracing::debug!("scheduler paused");
    }

    /// Resumes ticking after a pause.
    pub fn resume(&mut self) {
        if self.state != SchedulerState::Paused {
            return;
        }
        self.state = SchedulerState::Running;
        tracing::debug!("scheduler resumed");
    }

    /// Flips between running and paused; other states are left alone.
    pub fn toggle_pause(&mut self) {
        match self.state {
            SchedulerState::Running => self.pause(),
            SchedulerState::Paused => self.resume(),
            SchedulerState::Idle | SchedulerState::Stopped => {}
        }
    }

    /// Stops the scheduler for good and drops pending intents and shots.
    pub fn stop(&mut self) {
        if self.state == SchedulerState::Stopped {
            return;
        }
        self.state = SchedulerState::Stopped;
        self.intents.clear();
        self.shots = 0;
        tracing::debug!("scheduler stopped");
    }

    /// Queues a target intent. Returns `false` unless the scheduler is running.
    pub fn submit_intent(&mut self, direction: Direction) -> bool {
        if self.state != SchedulerState::Running {
            tracing::trace!(%direction, state = ?self.state, "intent ignored");
            return false;
        }
        self.intents.push_back(direction);
        true
    }

    /// Queues a shot from the target. Returns `false` unless the scheduler is running.
    pub fn submit_fire(&mut self) -> bool {
        if self.state != SchedulerState::Running {
            tracing::trace!(state = ?self.state, "shot ignored");
            return false;
        }
        self.shots += 1;
        true
    }

    /// Advances both cadences by `dt` and runs every action that fell due.
    ///
    /// Actions run in deadline order; when both fall due at the same instant
    /// the target moves first. A terminal event stops the scheduler before
    /// any further action runs.
    pub fn advance(&mut self, dt: Duration, world: &mut World, out: &mut Vec<Event>) {
        if self.state != SchedulerState::Running {
            return;
        }

        self.target_accumulator = self.target_accumulator.saturating_add(dt);
        self.seeker_accumulator = self.seeker_accumulator.saturating_add(dt);

        while self.state == SchedulerState::Running {
            let Some(action) = self.next_due() else {
                break;
            };

            let mut events = Vec::new();
            match action {
                Action::Target => {
                    self.target_accumulator -= self.config.target_period;
                    self.run_target(world, &mut events);
                }
                Action::Seeker => {
                    self.seeker_accumulator -= self.config.seeker_period;
                    world::apply(world, Command::AdvanceSeeker, &mut events);
                }
            }

            if events.iter().any(Event::is_terminal) {
                self.stop();
            }
            out.append(&mut events);
        }
    }

    fn next_due(&self) -> Option<Action> {
        let overdue = |accumulator: Duration, period: Duration| {
            if period.is_zero() {
                None
            } else {
                accumulator.checked_sub(period)
            }
        };
        let target = overdue(self.target_accumulator, self.config.target_period);
        let seeker = overdue(self.seeker_accumulator, self.config.seeker_period);

        match (target, seeker) {
            (Some(target), Some(seeker)) if seeker > target => Some(Action::Seeker),
            (Some(_), _) => Some(Action::Target),
            (None, Some(_)) => Some(Action::Seeker),
            (None, None) => None,
        }
    }

    fn run_target(&mut self, world: &mut World, out: &mut Vec<Event>) {
        self.move_target(world, out);
        if self.shots > 0 {
            self.shots -= 1;
            world::apply(world, Command::Fire, out);
        }
    }

    fn move_target(&mut self, world: &mut World, out: &mut Vec<Event>) {
        let Some(direction) = self.intents.pop_front() else {
            return;
        };

        if self.last_consumed.is_some_and(|last| last != direction) {
            tracing::trace!(
                %direction,
                dropped = self.intents.len(),
                "direction changed, clearing queued intents"
            );
            self.intents.clear();
        }
        self.last_consumed = Some(direction);

        world::apply(world, Command::MoveTarget { direction }, out);
    }
}

impl Default for MotionScheduler {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_names_round_trip() {
        for difficulty in Difficulty::ALL {
            assert_eq!(difficulty.name().parse(), Ok(difficulty));
        }
        assert_eq!(" HARD ".parse(), Ok(Difficulty::Hard));
        assert!("impossible".parse::<Difficulty>().is_err());
    }

    #[test]
    fn default_config_matches_normal_difficulty() {
        let config = Config::default();
        assert_eq!(config.target_period(), Duration::from_millis(50));
        assert_eq!(config.seeker_period(), Duration::from_millis(150));
    }

    #[test]
    fn zero_period_never_falls_due() {
        let mut scheduler = MotionScheduler::new(Config::new(Duration::ZERO, Duration::ZERO));
        scheduler.target_accumulator = Duration::from_secs(10);
        scheduler.seeker_accumulator = Duration::from_secs(10);
        assert_eq!(scheduler.next_due(), None);
    }

    #[test]
    fn shots_are_refused_until_running() {
        let mut scheduler = MotionScheduler::default();
        assert!(!scheduler.submit_fire());
        assert_eq!(scheduler.pending_shots(), 0);

        scheduler.state = SchedulerState::Running;
        assert!(scheduler.submit_fire());
        assert!(scheduler.submit_fire());
        assert_eq!(scheduler.pending_shots(), 2);

        scheduler.stop();
        assert_eq!(scheduler.pending_shots(), 0);
    }

    #[test]
    fn earlier_deadline_runs_first() {
        let mut scheduler = MotionScheduler::new(Config::new(
            Duration::from_millis(50),
            Duration::from_millis(30),
        ));
        scheduler.target_accumulator = Duration::from_millis(60);
        scheduler.seeker_accumulator = Duration::from_millis(60);
        assert_eq!(scheduler.next_due(), Some(Action::Seeker));

        scheduler.seeker_accumulator = Duration::from_millis(30);
        assert_eq!(scheduler.next_due(), Some(Action::Target));
    }
}
