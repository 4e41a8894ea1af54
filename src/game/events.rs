//! # Events Module
//!
//! The outbound boundary between the core and its render/audio/UI
//! collaborators. Core logic emits events into a queue and never blocks on
//! (or observes) anything a consumer does with them, so a headless context
//! can simply drain and discard.

use crate::game::Position;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// How prominently a message should be surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageImportance {
    Info,
    Warning,
    Critical,
}

/// One structured notification for an external consumer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// The renderer should play a named animation at a grid position.
    /// `waypoints` describes a travel path (straight or L-shaped) when the
    /// animation moves across tiles; it is cosmetic data, never gameplay
    /// state.
    AnimationRequested {
        name: String,
        position: Position,
        waypoints: Vec<Position>,
    },
    /// Play a sound by symbolic name (`"whoosh"`, `"splode"`, ...).
    SoundRequested { name: String },
    /// Points were awarded; the renderer floats them at the position.
    PointsAwarded { amount: u32, position: Position },
    /// The player reached a kill streak of `count`.
    ComboAchieved { count: u32 },
    /// A message-log entry.
    Message {
        text: String,
        importance: MessageImportance,
    },
    /// A request to show an overlay message.
    OverlayMessage {
        text: String,
        persistent: bool,
        typewriter: bool,
    },
    /// Player vitals changed; the HUD should refresh.
    StatsChanged,
}

/// FIFO queue of pending outbound events.
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    events: VecDeque<GameEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an event.
    pub fn emit(&mut self, event: GameEvent) {
        self.events.push_back(event);
    }

    /// Convenience for sound triggers.
    pub fn play_sound(&mut self, name: &str) {
        self.emit(GameEvent::SoundRequested {
            name: name.to_string(),
        });
    }

    /// Convenience for message-log entries.
    pub fn message(&mut self, text: impl Into<String>, importance: MessageImportance) {
        self.emit(GameEvent::Message {
            text: text.into(),
            importance,
        });
    }

    /// Convenience for transient overlay messages.
    pub fn overlay(&mut self, text: impl Into<String>) {
        self.emit(GameEvent::OverlayMessage {
            text: text.into(),
            persistent: false,
            typewriter: false,
        });
    }

    /// Removes and returns all pending events in emission order.
    pub fn drain(&mut self) -> Vec<GameEvent> {
        self.events.drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Peek at pending events without draining, for assertions.
    pub fn iter(&self) -> impl Iterator<Item = &GameEvent> {
        self.events.iter()
    }
}
