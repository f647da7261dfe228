#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Keyboard chord tracking that turns held keys into compass intents.

use std::collections::BTreeSet;

use pursuit_core::{Direction, Event, Phase};

/// Maximum number of simultaneously held keys that still form a chord.
const MAX_CHORD_KEYS: usize = 2;

/// Keyboard key as reported by an adapter.
///
/// Characters are case sensitive so `w` and `W` are tracked as separate keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    /// Up arrow.
    ArrowUp,
    /// Down arrow.
    ArrowDown,
    /// Left arrow.
    ArrowLeft,
    /// Right arrow.
    ArrowRight,
    /// Any character key.
    Char(char),
}

impl Key {
    fn axis(self) -> Option<Direction> {
        match self {
            Self::ArrowUp | Self::Char('w' | 'W') => Some(Direction::North),
            Self::ArrowDown | Self::Char('s' | 'S') => Some(Direction::South),
            Self::ArrowLeft | Self::Char('a' | 'A') => Some(Direction::West),
            Self::ArrowRight | Self::Char('d' | 'D') => Some(Direction::East),
            Self::Char(_) => None,
        }
    }
}

/// Set of currently held keys.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyChord {
    held: BTreeSet<Key>,
}

impl KeyChord {
    /// Creates an empty chord.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a key press.
    pub fn press(&mut self, key: Key) {
        let _ = self.held.insert(key);
    }

    /// Records a key release.
    pub fn release(&mut self, key: Key) {
        let _ = self.held.remove(&key);
    }

    /// Forgets every held key.
    pub fn clear(&mut self) {
        self.held.clear();
    }

    /// Number of held keys, including keys without a direction.
    #[must_use]
    pub fn held(&self) -> usize {
        self.held.len()
    }

    fn holds(&self, axis: Direction) -> bool {
        self.held.iter().any(|key| key.axis() == Some(axis))
    }

    /// Direction encoded by the held keys, if they form a valid chord.
    ///
    /// A chord is valid when at least one direction key is held, no opposing
    /// pair is held and no more than two keys are held in total.
    #[must_use]
    pub fn direction(&self) -> Option<Direction> {
        let up = self.holds(Direction::North);
        let down = self.holds(Direction::South);
        let left = self.holds(Direction::West);
        let right = self.holds(Direction::East);

        if (up && down) || (left && right) || self.held.len() > MAX_CHORD_KEYS {
            return None;
        }

        match (up, down, left, right) {
            (true, _, true, _) => Some(Direction::NorthWest),
            (true, _, _, true) => Some(Direction::NorthEast),
            (_, true, _, true) => Some(Direction::SouthEast),
            (_, true, true, _) => Some(Direction::SouthWest),
            (_, true, _, _) => Some(Direction::South),
            (true, _, _, _) => Some(Direction::North),
            (_, _, true, _) => Some(Direction::West),
            (_, _, _, true) => Some(Direction::East),
            _ => None,
        }
    }
}

/// Controls system translating key transitions into target intents.
///
/// Keys are only tracked while the session is running; every press or release
/// that leaves a valid chord yields one intent.
#[derive(Clone, Debug)]
pub struct Controls {
    chord: KeyChord,
    phase: Phase,
}

impl Default for Controls {
    fn default() -> Self {
        Self::new()
    }
}

impl Controls {
    /// Creates a controls system that waits for the session to start.
    #[must_use]
    pub fn new() -> Self {
        Self {
            chord: KeyChord::new(),
            phase: Phase::PlacingSeeker,
        }
    }

    /// Currently held keys.
    #[must_use]
    pub const fn chord(&self) -> &KeyChord {
        &self.chord
    }

    /// Observes world events to follow the session phase.
    pub fn handle(&mut self, events: &[Event]) {
        for event in events {
            if let Event::PhaseChanged { phase } = event {
                self.phase = *phase;
                if *phase != Phase::Running {
                    self.chord.clear();
                }
            }
        }
    }

    /// Records a key press and returns the resulting intent.
    pub fn key_down(&mut self, key: Key) -> Option<Direction> {
        if self.phase != Phase::Running {
            return None;
        }
        self.chord.press(key);
        self.chord.direction()
    }

    /// Records a key release and returns the resulting intent.
    pub fn key_up(&mut self, key: Key) -> Option<Direction> {
        if self.phase != Phase::Running {
            return None;
        }
        self.chord.release(key);
        self.chord.direction()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn other_characters_have_no_axis() {
        assert_eq!(Key::Char('x').axis(), None);
        assert_eq!(Key::Char('W').axis(), Some(Direction::North));
    }
}
