//! Scripted keyboard input replayed one step per tick.

use std::str::FromStr;

use anyhow::{bail, Error, Result};
use pursuit_system_controls::Key;

/// One scripted keyboard transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum KeyStep {
    /// Key pressed, written `+KEY`.
    Down(Key),
    /// Key released, written `-KEY`.
    Up(Key),
    /// Fire button, written `fire`.
    Fire,
}

impl FromStr for KeyStep {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        let token = value.trim();
        if token.eq_ignore_ascii_case("fire") {
            return Ok(Self::Fire);
        }
        if let Some(key) = token.strip_prefix('+') {
            return parse_key(key).map(Self::Down);
        }
        if let Some(key) = token.strip_prefix('-') {
            return parse_key(key).map(Self::Up);
        }
        bail!("expected `+KEY`, `-KEY` or `fire`, got `{token}`")
    }
}

fn parse_key(name: &str) -> Result<Key> {
    let key = match name.to_ascii_lowercase().as_str() {
        "up" => Key::ArrowUp,
        "down" => Key::ArrowDown,
        "left" => Key::ArrowLeft,
        "right" => Key::ArrowRight,
        _ => {
            let mut chars = name.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Key::Char(c),
                _ => bail!("unknown key `{name}`"),
            }
        }
    };
    Ok(key)
}
