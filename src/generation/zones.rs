//! # Zones Module
//!
//! The built-in zone content generator.
//!
//! Terrain is deterministic per zone address (seeded from the world seed and
//! the zone key), so a zone that was generated but never mutated regenerates
//! identically. Every surface exit carved here matches the connectivity
//! record, and a straight corridor is cleared from each exit to the center
//! so no exit is walled off.

use crate::config::GRID_SIZE;
use crate::game::{Dimension, Direction, Enemy, EnemyKind, Grid, Position, PortKind, Tile, ZoneCoord};
use crate::generation::{zone_seed, ZoneConnections, ZoneData, ZoneGenerator};
use crate::items::{FoodKind, Item, ItemKind};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Deterministic terrain/enemy/item generator for all three dimensions.
#[derive(Debug, Clone)]
pub struct DefaultZoneGenerator {
    world_seed: u64,
}

impl DefaultZoneGenerator {
    pub fn new(world_seed: u64) -> Self {
        Self { world_seed }
    }

    fn generate_surface(&self, coord: ZoneCoord, connections: &ZoneConnections, rng: &mut StdRng) -> ZoneData {
        let mut grid = Grid::filled(Tile::Grass);

        // Border is wall by default; exits punch through below.
        for pos in grid.positions() {
            if pos.on_border() {
                grid.set(pos, Tile::Wall);
            }
        }

        // Scattered obstacles and water on the interior.
        for pos in grid.positions() {
            if pos.on_border() {
                continue;
            }
            let roll: f64 = rng.gen();
            if roll < 0.06 {
                grid.set(pos, Tile::Rock);
            } else if roll < 0.12 {
                grid.set(pos, Tile::Shrubbery);
            } else if roll < 0.15 {
                grid.set(pos, Tile::Water);
            }
        }

        // One structure door and occasional underground entrances.
        if rng.gen_bool(0.3) {
            let pos = Self::random_interior_tile(rng);
            grid.set(pos, Tile::Port(PortKind::Interior));
        }
        if rng.gen_bool(0.2) {
            let pos = Self::random_interior_tile(rng);
            if matches!(grid.get(pos), Some(Tile::Grass)) {
                let down = if rng.gen_bool(0.5) { Tile::Cistern } else { Tile::Hole };
                grid.set(pos, down);
            }
        }
        if rng.gen_bool(0.15) {
            let pos = Self::random_interior_tile(rng);
            if matches!(grid.get(pos), Some(Tile::Grass)) {
                grid.set(pos, Tile::Pitfall);
            }
        }
        if rng.gen_bool(0.2) {
            let pos = Self::random_interior_tile(rng);
            if matches!(grid.get(pos), Some(Tile::Grass)) {
                grid.set(pos, Tile::Npc);
            }
        }

        // Exits per the connectivity record, with cleared approach corridors.
        for side in Direction::all() {
            if let Some(exit_coord) = connections.get(side) {
                let exit = side.edge_tile(exit_coord);
                grid.set(exit, Tile::Exit);
                Self::carve_corridor(&mut grid, exit);
            }
        }

        Self::scatter_items(&mut grid, rng, 2);
        let spawn = Position::center();
        Self::clear_spawn_area(&mut grid, spawn);

        let enemies = Self::spawn_enemies(&grid, rng, spawn, coord, 0..=2);
        ZoneData {
            grid,
            enemies,
            player_spawn: Some(spawn),
        }
    }

    fn generate_interior(&self, coord: ZoneCoord, rng: &mut StdRng) -> ZoneData {
        let mut grid = Grid::walled_floor();

        // Sparse furniture-like obstacles.
        for pos in grid.positions() {
            if !pos.on_border() && rng.gen_bool(0.08) {
                grid.set(pos, Tile::Rock);
            }
        }
        if rng.gen_bool(0.5) {
            let pos = Self::random_interior_tile(rng);
            if matches!(grid.get(pos), Some(Tile::Floor)) {
                grid.set(pos, Tile::Npc);
            }
        }
        Self::scatter_items(&mut grid, rng, 3);

        let spawn = Position::new(GRID_SIZE / 2, GRID_SIZE - 2);
        Self::clear_spawn_area(&mut grid, spawn);
        // The way back out sits where the player walks in.
        grid.set(Position::new(GRID_SIZE / 2, GRID_SIZE - 1), Tile::Port(PortKind::Interior));

        let enemies = Self::spawn_enemies(&grid, rng, spawn, coord, 0..=1);
        ZoneData {
            grid,
            enemies,
            player_spawn: Some(spawn),
        }
    }

    fn generate_underground(&self, coord: ZoneCoord, rng: &mut StdRng) -> ZoneData {
        let mut grid = Grid::filled(Tile::Floor);
        for pos in grid.positions() {
            if pos.on_border() {
                grid.set(pos, Tile::Rock);
            } else if rng.gen_bool(0.15) {
                grid.set(pos, Tile::Rock);
            }
        }

        // Deeper levels are reachable through an occasional stairdown.
        if rng.gen_bool(0.4) {
            let pos = Self::random_interior_tile(rng);
            grid.set(pos, Tile::Port(PortKind::StairDown));
        }
        Self::scatter_items(&mut grid, rng, 2);

        let spawn = Position::center();
        Self::clear_spawn_area(&mut grid, spawn);

        // Enemy pressure grows with depth.
        let max = (1 + coord.depth.min(3)) as usize;
        let enemies = Self::spawn_enemies(&grid, rng, spawn, coord, 1..=max);
        ZoneData {
            grid,
            enemies,
            player_spawn: Some(spawn),
        }
    }

    fn random_interior_tile(rng: &mut StdRng) -> Position {
        Position::new(
            rng.gen_range(1..GRID_SIZE - 1),
            rng.gen_range(1..GRID_SIZE - 1),
        )
    }

    /// Clears a straight corridor from a border exit to the center.
    fn carve_corridor(grid: &mut Grid, exit: Position) {
        let center = Position::center();
        let mut cur = exit;
        while cur != center {
            let dx = (center.x - cur.x).signum();
            let dy = (center.y - cur.y).signum();
            cur = Position::new(cur.x + dx, cur.y + dy);
            if cur != center && !grid.is_walkable(cur) {
                grid.set(cur, Tile::Floor);
            }
        }
    }

    /// Clears the 3x3 area around a spawn point to guaranteed-walkable tiles.
    fn clear_spawn_area(grid: &mut Grid, spawn: Position) {
        for pos in std::iter::once(spawn).chain(spawn.adjacent_positions()) {
            if pos.in_grid() && !pos.on_border() && !grid.is_walkable(pos) {
                grid.set(pos, Tile::Floor);
            }
        }
    }

    fn scatter_items(grid: &mut Grid, rng: &mut StdRng, max: usize) {
        let count = rng.gen_range(0..=max);
        for _ in 0..count {
            let pos = Self::random_interior_tile(rng);
            if !matches!(grid.get(pos), Some(Tile::Grass) | Some(Tile::Floor)) {
                continue;
            }
            let item = match rng.gen_range(0..10) {
                0..=2 => Item::stack(ItemKind::Food(FoodKind::Apple), 1),
                3..=4 => Item::stack(ItemKind::Water, 1),
                5..=6 => Item::stack(ItemKind::Bomb, 2),
                7 => Item::stack(ItemKind::Heart, 1),
                8 => Item::charge(ItemKind::Bow),
                _ => Item::stack(ItemKind::Note, 1),
            };
            grid.set(pos, Tile::Item(item));
        }
    }

    fn spawn_enemies(
        grid: &Grid,
        rng: &mut StdRng,
        player_spawn: Position,
        coord: ZoneCoord,
        count_range: std::ops::RangeInclusive<usize>,
    ) -> Vec<Enemy> {
        let count = rng.gen_range(count_range);
        let mut enemies = Vec::with_capacity(count);
        let mut attempts = 0;
        while enemies.len() < count && attempts < 50 {
            attempts += 1;
            let pos = Self::random_interior_tile(rng);
            let taken = enemies.iter().any(|e: &Enemy| e.position() == pos);
            if taken || !grid.is_walkable(pos) || pos.chebyshev_distance(player_spawn) < 2 {
                continue;
            }
            if matches!(grid.get(pos), Some(Tile::Item(_))) {
                continue;
            }
            let kind = match (coord.dimension, rng.gen_range(0..4)) {
                (Dimension::Underground, 0 | 1) => EnemyKind::Snake,
                (Dimension::Underground, 2) => EnemyKind::Bat,
                (Dimension::Underground, _) => EnemyKind::Wisp,
                (_, 0 | 1) => EnemyKind::Slime,
                (_, 2) => EnemyKind::Bat,
                (_, _) => EnemyKind::Snake,
            };
            enemies.push(Enemy::new(kind, pos));
        }
        enemies
    }
}

impl ZoneGenerator for DefaultZoneGenerator {
    fn generate(
        &self,
        coord: ZoneCoord,
        connections: &ZoneConnections,
        _entry_side: Option<Direction>,
    ) -> ZoneData {
        let mut rng = StdRng::seed_from_u64(zone_seed(self.world_seed, coord));
        match coord.dimension {
            Dimension::Surface => self.generate_surface(coord, connections, &mut rng),
            Dimension::Interior => self.generate_interior(coord, &mut rng),
            Dimension::Underground => self.generate_underground(coord, &mut rng),
        }
    }
}
