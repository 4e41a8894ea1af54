//! # Zone Module
//!
//! Zone persistence and the dimension-transition state machine.
//!
//! A zone is generated on first visit, mutated during play, persisted to the
//! store when the player leaves, and reloaded verbatim on return. Broken
//! walls, picked-up items, and killed enemies must all survive round trips.

pub mod transitions;

use crate::game::{Direction, Enemy, Grid, Position, ZoneCoord};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How the player is arriving in a zone. Drives spawn placement and the
/// emergence-tile patch applied after generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryKind {
    /// Walked in across a shared edge from the adjacent zone.
    Edge(Direction),
    /// Descended through a surface cistern.
    Cistern,
    /// Descended through a surface hole.
    Hole,
    /// Descended a stairdown port.
    StairDown,
    /// Ascended a stairup port (still underground).
    StairUp,
    /// Fell through a pitfall.
    Pitfall,
    /// Walked through a surface door into an interior.
    InteriorDoor,
    /// Returned to the surface out of an interior.
    InteriorReturn,
    /// Game start; no prior zone.
    Spawn,
}

/// Transition metadata: the entry kind plus where the player lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub kind: EntryKind,
    pub position: Position,
}

impl Entry {
    pub fn new(kind: EntryKind, position: Position) -> Self {
        Self { kind, position }
    }

    /// Whether this entry arrived by descending from the level above.
    pub fn is_descent(&self) -> bool {
        matches!(
            self.kind,
            EntryKind::Cistern | EntryKind::Hole | EntryKind::StairDown | EntryKind::Pitfall
        )
    }
}

/// One persisted zone: grid, enemies, and back-reference coordinates for
/// nested dimensions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneRecord {
    pub grid: Grid,
    pub enemies: Vec<Enemy>,
    pub player_spawn: Option<Position>,
    /// Where ascending out of this zone emerges. For depth-1 underground
    /// zones these are surface coordinates; for deeper levels, the stair
    /// position in the level above.
    pub return_to_surface: Option<Position>,
    /// For interior zones, the surface tile of the entry door.
    pub return_to_interior: Option<Position>,
}

impl ZoneRecord {
    pub fn new(grid: Grid, enemies: Vec<Enemy>, player_spawn: Option<Position>) -> Self {
        Self {
            grid,
            enemies,
            player_spawn,
            return_to_surface: None,
            return_to_interior: None,
        }
    }
}

/// Keyed repository of every zone the player has generated.
///
/// Keys are the string form of [`ZoneCoord::key`] so the whole store
/// serializes to plain JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ZoneStore {
    zones: HashMap<String, ZoneRecord>,
}

impl ZoneStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Persists a zone record, replacing any prior save for the same key.
    pub fn save(&mut self, coord: ZoneCoord, record: ZoneRecord) {
        self.zones.insert(coord.key(), record);
    }

    pub fn get(&self, coord: ZoneCoord) -> Option<&ZoneRecord> {
        self.zones.get(&coord.key())
    }

    pub fn get_mut(&mut self, coord: ZoneCoord) -> Option<&mut ZoneRecord> {
        self.zones.get_mut(&coord.key())
    }

    pub fn contains(&self, coord: ZoneCoord) -> bool {
        self.zones.contains_key(&coord.key())
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}
