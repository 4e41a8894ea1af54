//! # Game Module
//!
//! Core data model and state management for the zone grid world.
//!
//! This module contains the fundamental building blocks of Zonefall:
//! - Grid coordinates, directions, and zone addressing
//! - The tile sum type and the 9x9 grid
//! - Player and enemy state
//! - The outbound event queue and the delayed-effect scheduler
//! - Central game state and the turn-resolution pipeline

pub mod enemy;
pub mod events;
pub mod grid;
pub mod player;
pub mod schedule;
pub mod state;
pub mod tile;

pub use enemy::*;
pub use events::*;
pub use grid::*;
pub use player::*;
pub use schedule::*;
pub use state::*;
pub use tile::*;

use crate::config::GRID_SIZE;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a 2D coordinate on a zone grid.
///
/// # Examples
///
/// ```
/// use zonefall::Position;
///
/// let pos = Position::new(4, 4);
/// assert_eq!(pos.x, 4);
/// assert!(pos.in_grid());
/// assert_eq!(pos.adjacent_positions().len(), 8);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Creates a new position with the given coordinates.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the center of a zone grid.
    pub fn center() -> Self {
        Self::new(GRID_SIZE / 2, GRID_SIZE / 2)
    }

    /// Calculates the Manhattan distance to another position.
    pub fn manhattan_distance(self, other: Position) -> u32 {
        ((self.x - other.x).abs() + (self.y - other.y).abs()) as u32
    }

    /// Calculates the Chebyshev distance to another position.
    pub fn chebyshev_distance(self, other: Position) -> u32 {
        (self.x - other.x).abs().max((self.y - other.y).abs()) as u32
    }

    /// Returns true if this position falls inside the 9x9 zone grid.
    pub fn in_grid(self) -> bool {
        self.x >= 0 && self.x < GRID_SIZE && self.y >= 0 && self.y < GRID_SIZE
    }

    /// Returns true if this position lies on the zone grid border.
    pub fn on_border(self) -> bool {
        self.in_grid()
            && (self.x == 0 || self.y == 0 || self.x == GRID_SIZE - 1 || self.y == GRID_SIZE - 1)
    }

    /// Returns all 8 adjacent positions (including diagonals), without
    /// bounds-checking.
    pub fn adjacent_positions(self) -> Vec<Position> {
        let mut out = Vec::with_capacity(8);
        for dy in -1..=1 {
            for dx in -1..=1 {
                if dx != 0 || dy != 0 {
                    out.push(Position::new(self.x + dx, self.y + dy));
                }
            }
        }
        out
    }

    /// Returns only the 4 cardinal adjacent positions (no diagonals).
    pub fn cardinal_adjacent_positions(self) -> Vec<Position> {
        Direction::all()
            .into_iter()
            .map(|d| self + d.to_delta())
            .collect()
    }
}

impl std::ops::Add for Position {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl std::ops::Sub for Position {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

/// Cardinal directions used for movement, zone edges, and exits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// Converts a direction to a position delta.
    ///
    /// North decreases `y`; the grid's row zero is its north edge.
    pub fn to_delta(self) -> Position {
        match self {
            Direction::North => Position::new(0, -1),
            Direction::South => Position::new(0, 1),
            Direction::East => Position::new(1, 0),
            Direction::West => Position::new(-1, 0),
        }
    }

    /// Converts a position delta to a direction, if it is a unit cardinal step.
    pub fn from_delta(delta: Position) -> Option<Direction> {
        match (delta.x, delta.y) {
            (0, -1) => Some(Direction::North),
            (0, 1) => Some(Direction::South),
            (1, 0) => Some(Direction::East),
            (-1, 0) => Some(Direction::West),
            _ => None,
        }
    }

    /// Returns the opposite direction.
    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }

    /// Returns all 4 cardinal directions.
    pub fn all() -> [Direction; 4] {
        [
            Direction::North,
            Direction::South,
            Direction::East,
            Direction::West,
        ]
    }

    /// The border tile on this zone's edge for an exit coordinate along it.
    ///
    /// The exit coordinate runs along the edge: an `x` for north/south edges,
    /// a `y` for east/west edges.
    pub fn edge_tile(self, exit_coord: i32) -> Position {
        match self {
            Direction::North => Position::new(exit_coord, 0),
            Direction::South => Position::new(exit_coord, GRID_SIZE - 1),
            Direction::East => Position::new(GRID_SIZE - 1, exit_coord),
            Direction::West => Position::new(0, exit_coord),
        }
    }
}

/// Which world layer a zone belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dimension {
    Surface,
    Interior,
    Underground,
}

impl Dimension {
    fn tag(self) -> u8 {
        match self {
            Dimension::Surface => 0,
            Dimension::Interior => 1,
            Dimension::Underground => 2,
        }
    }
}

/// Address of one zone: grid coordinates, dimension, and (for underground
/// zones) a stacked sub-level depth.
///
/// # Examples
///
/// ```
/// use zonefall::ZoneCoord;
///
/// let coord = ZoneCoord::underground(2, -1, 3);
/// assert_eq!(coord.key(), "2,-1:2:3");
/// assert_eq!(coord.below().depth, 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ZoneCoord {
    pub x: i32,
    pub y: i32,
    pub dimension: Dimension,
    /// Sub-level index; meaningful only for [`Dimension::Underground`],
    /// where it starts at 1.
    pub depth: u32,
}

impl ZoneCoord {
    /// A surface zone at the given zone coordinates.
    pub fn surface(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            dimension: Dimension::Surface,
            depth: 0,
        }
    }

    /// The interior zone behind the surface zone at the given coordinates.
    pub fn interior(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            dimension: Dimension::Interior,
            depth: 0,
        }
    }

    /// An underground zone at the given coordinates and depth (>= 1).
    pub fn underground(x: i32, y: i32, depth: u32) -> Self {
        Self {
            x,
            y,
            dimension: Dimension::Underground,
            depth,
        }
    }

    /// The persistence key for this zone: `"x,y:dimension:depth"`.
    pub fn key(&self) -> String {
        format!("{},{}:{}:{}", self.x, self.y, self.dimension.tag(), self.depth)
    }

    /// The underground zone one level below this one.
    pub fn below(&self) -> ZoneCoord {
        let depth = match self.dimension {
            Dimension::Underground => self.depth + 1,
            _ => 1,
        };
        ZoneCoord::underground(self.x, self.y, depth)
    }

    /// The zone one level above this one. Depth 1 ascends to the surface.
    pub fn above(&self) -> ZoneCoord {
        match self.dimension {
            Dimension::Underground if self.depth > 1 => {
                ZoneCoord::underground(self.x, self.y, self.depth - 1)
            }
            _ => ZoneCoord::surface(self.x, self.y),
        }
    }

    /// The adjacent zone in the given direction, same dimension and depth.
    pub fn neighbor(&self, direction: Direction) -> ZoneCoord {
        let delta = direction.to_delta();
        ZoneCoord {
            x: self.x + delta.x,
            y: self.y + delta.y,
            ..*self
        }
    }

    /// Chebyshev distance of the zone coordinates from the world origin.
    pub fn origin_distance(&self) -> i32 {
        self.x.abs().max(self.y.abs())
    }
}

/// Unique, serialization-stable identifier for enemies.
pub type EnemyId = Uuid;

/// Creates a new unique enemy ID.
pub fn new_enemy_id() -> EnemyId {
    Uuid::new_v4()
}
