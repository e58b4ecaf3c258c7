use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Errors from input parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("unknown key: {0:?}")]
    UnknownKey(String),
}

/// Keys the game listens to. Host events are translated into these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Key {
    W,
    A,
    S,
    D,
    E,
    F,
    C,
    R,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
}

impl Key {
    pub const ALL: [Key; 12] = [
        Key::W,
        Key::A,
        Key::S,
        Key::D,
        Key::E,
        Key::F,
        Key::C,
        Key::R,
        Key::ArrowUp,
        Key::ArrowDown,
        Key::ArrowLeft,
        Key::ArrowRight,
    ];

    /// Lower-case name, matching what browsers report in `KeyboardEvent.key`.
    pub fn name(&self) -> &'static str {
        match self {
            Key::W => "w",
            Key::A => "a",
            Key::S => "s",
            Key::D => "d",
            Key::E => "e",
            Key::F => "f",
            Key::C => "c",
            Key::R => "r",
            Key::ArrowUp => "arrowup",
            Key::ArrowDown => "arrowdown",
            Key::ArrowLeft => "arrowleft",
            Key::ArrowRight => "arrowright",
        }
    }
}

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for Key {
    type Err = InputError;

    /// Case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Key::ALL
            .into_iter()
            .find(|k| k.name() == lower)
            .ok_or(InputError::UnknownKey(s.to_string()))
    }
}
