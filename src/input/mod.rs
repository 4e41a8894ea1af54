//! # Input Module
//!
//! Normalization of symbolic key names into player intents.
//!
//! Raw pointer/touch/keyboard handling is external; the core consumes grid
//! taps (handled by the interaction module) and symbolic key names
//! normalized here.

use crate::game::Direction;

/// A player intent decoded from one key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerInput {
    Move(Direction),
    Wait,
    Cancel,
}

/// Decodes a symbolic key name (`"w"`, `"arrowup"`, ...) into an intent.
/// Unknown keys decode to `None` and are ignored by the dispatcher.
pub fn parse_key(key: &str) -> Option<PlayerInput> {
    match key.to_ascii_lowercase().as_str() {
        "w" | "arrowup" | "up" => Some(PlayerInput::Move(Direction::North)),
        "s" | "arrowdown" | "down" => Some(PlayerInput::Move(Direction::South)),
        "d" | "arrowright" | "right" => Some(PlayerInput::Move(Direction::East)),
        "a" | "arrowleft" | "left" => Some(PlayerInput::Move(Direction::West)),
        " " | "space" | "." => Some(PlayerInput::Wait),
        "escape" | "esc" => Some(PlayerInput::Cancel),
        _ => None,
    }
}
