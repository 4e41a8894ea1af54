//! # Tile Module
//!
//! The tile sum type for zone grids.
//!
//! Every grid cell holds exactly one [`Tile`]. Stateful tiles (bombs, ports,
//! dropped items) carry their data inline, so tile identity is always an
//! exhaustive `match` rather than a runtime shape check.

use crate::items::Item;
use serde::{Deserialize, Serialize};

/// Sub-kind of a [`Tile::Port`], determining where the port leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortKind {
    /// Ascend one underground level (or surface from depth 1).
    StairUp,
    /// Descend one underground level.
    StairDown,
    /// A door between the surface and an interior zone.
    Interior,
}

/// One cell of a zone grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Tile {
    Floor,
    Wall,
    Grass,
    Rock,
    Shrubbery,
    Water,
    /// A border tile connecting to the adjacent zone.
    Exit,
    /// A concealed trap; stepping on it forces an underground transition.
    Pitfall,
    /// The visible pit left behind after a pitfall has been triggered.
    OpenPit,
    /// A surface well leading underground.
    Cistern,
    /// A dug or natural hole leading underground.
    Hole,
    /// A non-player character; tapping it produces dialogue.
    Npc,
    /// A dimension-changing transition tile.
    Port(PortKind),
    /// A live bomb with its fuse state.
    Bomb {
        just_placed: bool,
        actions_since_placed: u8,
    },
    /// An item lying on the ground, picked up by stepping onto it.
    Item(Item),
}

impl Tile {
    /// Creates a freshly placed bomb tile. The fuse does not start on the
    /// turn the bomb was placed.
    pub fn new_bomb() -> Tile {
        Tile::Bomb {
            just_placed: true,
            actions_since_placed: 0,
        }
    }

    /// Whether the player and enemies can stand on this tile.
    pub fn is_walkable(&self) -> bool {
        match self {
            Tile::Floor
            | Tile::Grass
            | Tile::Exit
            | Tile::Pitfall
            | Tile::OpenPit
            | Tile::Cistern
            | Tile::Hole
            | Tile::Port(_)
            | Tile::Item(_) => true,
            Tile::Wall | Tile::Rock | Tile::Shrubbery | Tile::Water | Tile::Npc | Tile::Bomb { .. } => {
                false
            }
        }
    }

    /// Whether an explosion destroys this tile.
    pub fn is_destructible(&self) -> bool {
        matches!(self, Tile::Wall | Tile::Rock | Tile::Shrubbery | Tile::Grass)
    }

    /// Whether stepping onto this tile forces an underground fall.
    pub fn is_pit(&self) -> bool {
        matches!(self, Tile::Pitfall | Tile::OpenPit)
    }

    /// Whether this tile is still in a primitive pre-transition state that an
    /// emergence patch may overwrite. Richer tiles are never clobbered.
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            Tile::Floor | Tile::Grass | Tile::Pitfall | Tile::OpenPit
        )
    }

    /// Single-character glyph for headless/ASCII dumps.
    pub fn glyph(&self) -> char {
        match self {
            Tile::Floor => '.',
            Tile::Wall => '#',
            Tile::Grass => '"',
            Tile::Rock => '*',
            Tile::Shrubbery => '%',
            Tile::Water => '~',
            Tile::Exit => '+',
            Tile::Pitfall => '.',
            Tile::OpenPit => 'o',
            Tile::Cistern => 'U',
            Tile::Hole => 'O',
            Tile::Npc => '@',
            Tile::Port(PortKind::StairUp) => '<',
            Tile::Port(PortKind::StairDown) => '>',
            Tile::Port(PortKind::Interior) => 'D',
            Tile::Bomb { .. } => 'b',
            Tile::Item(_) => '$',
        }
    }
}
