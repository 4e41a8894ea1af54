//! # Grid Module
//!
//! The fixed 9x9 tile matrix owned by the active zone.

use crate::config::GRID_SIZE;
use crate::game::{Position, Tile};
use serde::{Deserialize, Serialize};

/// A 9x9 tile matrix. Ownership is exclusive to the currently active zone;
/// inactive zones hold persisted copies in the zone store.
///
/// # Examples
///
/// ```
/// use zonefall::{Grid, Position, Tile};
///
/// let mut grid = Grid::filled(Tile::Floor);
/// grid.set(Position::new(3, 3), Tile::Wall);
/// assert_eq!(grid.get(Position::new(3, 3)), Some(&Tile::Wall));
/// assert!(!grid.is_walkable(Position::new(3, 3)));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    tiles: Vec<Vec<Tile>>,
}

impl Grid {
    /// Creates a grid with every cell set to the given tile.
    pub fn filled(tile: Tile) -> Self {
        let size = GRID_SIZE as usize;
        Self {
            tiles: vec![vec![tile; size]; size],
        }
    }

    /// Creates an all-floor grid enclosed by walls.
    pub fn walled_floor() -> Self {
        let mut grid = Self::filled(Tile::Floor);
        for pos in grid.positions() {
            if pos.on_border() {
                grid.set(pos, Tile::Wall);
            }
        }
        grid
    }

    /// Gets the tile at a position, or `None` when out of bounds.
    pub fn get(&self, pos: Position) -> Option<&Tile> {
        if pos.in_grid() {
            Some(&self.tiles[pos.y as usize][pos.x as usize])
        } else {
            None
        }
    }

    /// Gets the tile at a position mutably, or `None` when out of bounds.
    pub fn get_mut(&mut self, pos: Position) -> Option<&mut Tile> {
        if pos.in_grid() {
            Some(&mut self.tiles[pos.y as usize][pos.x as usize])
        } else {
            None
        }
    }

    /// Sets the tile at a position. Out-of-bounds writes are ignored.
    pub fn set(&mut self, pos: Position, tile: Tile) {
        if pos.in_grid() {
            self.tiles[pos.y as usize][pos.x as usize] = tile;
        }
    }

    /// Whether the position is inside the grid and its tile is walkable.
    pub fn is_walkable(&self, pos: Position) -> bool {
        self.get(pos).map(Tile::is_walkable).unwrap_or(false)
    }

    /// All grid positions in row-major order.
    pub fn positions(&self) -> Vec<Position> {
        let mut out = Vec::with_capacity((GRID_SIZE * GRID_SIZE) as usize);
        for y in 0..GRID_SIZE {
            for x in 0..GRID_SIZE {
                out.push(Position::new(x, y));
            }
        }
        out
    }

    /// Positions whose tile matches a predicate.
    pub fn positions_where<F: Fn(&Tile) -> bool>(&self, pred: F) -> Vec<Position> {
        self.positions()
            .into_iter()
            .filter(|&p| self.get(p).map(&pred).unwrap_or(false))
            .collect()
    }

    /// Renders the grid as a multi-line ASCII string, one glyph per tile.
    pub fn to_ascii(&self) -> String {
        self.tiles
            .iter()
            .map(|row| row.iter().map(Tile::glyph).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
