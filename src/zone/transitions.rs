//! # Transitions Module
//!
//! The dimension-transition state machine on [`GameState`].
//!
//! Transitions persist the outgoing zone, load or generate the destination,
//! patch the emergence tile where the transition calls for one, and place
//! the player by the entry rules of each exit type. Generation is
//! idempotent per zone key: a prior save is always reused verbatim.

use crate::game::{
    Dimension, Direction, GameState, MessageImportance, PortKind, Position, Tile, ZoneCoord,
};
use crate::generation::{ConnectionManager, DefaultZoneGenerator, ZoneConnections, ZoneGenerator};
use crate::zone::{Entry, EntryKind, ZoneRecord};
use log::debug;

impl GameState {
    /// Saves the active zone (grid and live enemies) back to the store,
    /// preserving the record's back-reference metadata.
    pub fn persist_current_zone(&mut self) {
        let coord = self.player.current_zone;
        let (spawn, to_surface, to_interior) = match self.zones.get(coord) {
            Some(r) => (r.player_spawn, r.return_to_surface, r.return_to_interior),
            None => (None, None, None),
        };
        let mut record = ZoneRecord::new(self.grid.clone(), self.enemies.to_vec(), spawn);
        record.return_to_surface = to_surface;
        record.return_to_interior = to_interior;
        self.zones.save(coord, record);
    }

    /// Generates a zone record on first visit; reuses any prior save.
    pub fn ensure_zone_record(&mut self, coord: ZoneCoord) {
        self.ensure_zone_record_with_side(coord, None)
    }

    fn ensure_zone_record_with_side(&mut self, coord: ZoneCoord, entry_side: Option<Direction>) {
        if self.zones.contains(coord) {
            return;
        }
        let connections = zone_connections(&mut self.connections, coord);
        let generator = DefaultZoneGenerator::new(self.world_seed);
        let data = generator.generate(coord, &connections, entry_side);
        debug!("generated zone {}", coord.key());
        self.zones
            .save(coord, ZoneRecord::new(data.grid, data.enemies, data.player_spawn));
    }

    /// Loads a zone as the active zone, applying the entry's emergence patch
    /// and placing the player.
    pub fn enter_zone(&mut self, coord: ZoneCoord, entry: Entry) {
        let entry_side = match entry.kind {
            EntryKind::Edge(side) => Some(side),
            _ => None,
        };
        self.ensure_zone_record_with_side(coord, entry_side);

        let mut position = entry.position;
        {
            let record = self
                .zones
                .get_mut(coord)
                .expect("zone record exists after generation");

            match entry.kind {
                EntryKind::Edge(side) => {
                    // Force the arrival tile open and clear the approach.
                    record.grid.set(position, Tile::Exit);
                    let inward = position + side.opposite().to_delta();
                    if inward.in_grid() && !record.grid.is_walkable(inward) {
                        record.grid.set(inward, Tile::Floor);
                    }
                }
                EntryKind::Cistern
                | EntryKind::Hole
                | EntryKind::Pitfall
                | EntryKind::StairDown => {
                    patch_emergence(&mut record.grid, position, PortKind::StairUp);
                }
                EntryKind::StairUp => {
                    // Only mark the way back down while still underground;
                    // a surface emergence point already carries its opening.
                    if coord.dimension == Dimension::Underground {
                        patch_emergence(&mut record.grid, position, PortKind::StairDown);
                    }
                }
                EntryKind::InteriorDoor | EntryKind::InteriorReturn | EntryKind::Spawn => {}
            }

            if !record.grid.is_walkable(position) {
                position = record
                    .player_spawn
                    .filter(|&p| record.grid.is_walkable(p))
                    .unwrap_or_else(Position::center);
            }
        }

        let record = self.zones.get(coord).expect("zone record exists");
        self.grid = record.grid.clone();
        let defeated = &self.defeated_enemies;
        self.enemies = crate::game::EnemyCollection::from_vec(
            record
                .enemies
                .iter()
                .filter(|e| !defeated.contains(&e.id))
                .cloned()
                .collect(),
        );

        self.player.current_zone = coord;
        self.player.set_position(position);
        if self.visited_zones.insert(coord.key()) {
            self.statistics.zones_visited += 1;
        }
        self.events.emit(crate::game::GameEvent::StatsChanged);
    }

    /// Crosses a shared edge into the adjacent zone. The player must be
    /// standing on an exit tile of a surface zone; anything else is a no-op.
    pub fn transition_edge(&mut self, direction: Direction) -> bool {
        if self.player.current_zone.dimension != Dimension::Surface {
            return false;
        }
        let pos = self.player.position();
        if !matches!(self.grid.get(pos), Some(Tile::Exit)) {
            return false;
        }
        // The exit coordinate carries over; the player appears at the
        // mirrored position on the opposite edge.
        let exit_coord = match direction {
            Direction::North | Direction::South => pos.x,
            Direction::East | Direction::West => pos.y,
        };
        let target = self.player.current_zone.neighbor(direction);
        let arrival = direction.opposite().edge_tile(exit_coord);

        self.persist_current_zone();
        self.enter_zone(target, Entry::new(EntryKind::Edge(direction.opposite()), arrival));
        true
    }

    /// Uses the port tile under the player, branching by dimension and port
    /// kind. Returns false (with a message where useful) when the tile is
    /// not a usable port or ascent is still locked out.
    pub fn use_port(&mut self) -> bool {
        let pos = self.player.position();
        let here = self.player.current_zone;
        let tile = match self.grid.get(pos) {
            Some(t) => t.clone(),
            None => return false,
        };

        match (here.dimension, &tile) {
            (Dimension::Surface, Tile::Cistern) => self.descend_from_surface(EntryKind::Cistern),
            (Dimension::Surface, Tile::Hole) => self.descend_from_surface(EntryKind::Hole),
            (Dimension::Surface, Tile::Port(PortKind::Interior)) => self.enter_interior(),
            (Dimension::Interior, Tile::Port(PortKind::Interior)) => self.leave_interior(),
            (_, Tile::Port(PortKind::StairDown)) => self.descend_stairs(),
            (Dimension::Underground, Tile::Port(PortKind::StairUp)) => self.ascend_stairs(),
            _ => false,
        }
    }

    /// Forces the player underground through a pitfall; no confirmation.
    /// The tile is converted in place to an open pit and a survival counter
    /// gates any ascent.
    pub fn trigger_pitfall(&mut self) -> bool {
        let pos = self.player.position();
        if !self.grid.get(pos).map(Tile::is_pit).unwrap_or(false) {
            return false;
        }
        self.grid.set(pos, Tile::OpenPit);
        self.events.play_sound("fall");
        self.events
            .message("The ground gives way!", MessageImportance::Warning);
        self.persist_current_zone();

        let below = self.player.current_zone.below();
        self.descend_to(below, EntryKind::Pitfall, pos);
        self.start_pitfall_survival();
        true
    }

    fn descend_from_surface(&mut self, kind: EntryKind) -> bool {
        let pos = self.player.position();
        self.persist_current_zone();
        self.descend_to(self.player.current_zone.below(), kind, pos);
        true
    }

    fn descend_stairs(&mut self) -> bool {
        let pos = self.player.position();
        self.persist_current_zone();
        self.descend_to(self.player.current_zone.below(), EntryKind::StairDown, pos);
        true
    }

    /// Enters `below`, recording `came_from` as the position ascending out
    /// of it emerges at.
    fn descend_to(&mut self, below: ZoneCoord, kind: EntryKind, came_from: Position) {
        self.ensure_zone_record(below);
        let spawn = self
            .zones
            .get(below)
            .and_then(|r| r.player_spawn)
            .unwrap_or_else(Position::center);
        self.enter_zone(below, Entry::new(kind, spawn));
        if let Some(record) = self.zones.get_mut(below) {
            record.return_to_surface = Some(came_from);
        }
    }

    fn ascend_stairs(&mut self) -> bool {
        if !self.can_ascend() {
            self.events.message(
                "You are too shaken to climb yet.",
                MessageImportance::Warning,
            );
            return false;
        }
        let here = self.player.current_zone;
        let emergence = self
            .zones
            .get(here)
            .and_then(|r| r.return_to_surface)
            .unwrap_or_else(Position::center);
        self.persist_current_zone();
        self.enter_zone(here.above(), Entry::new(EntryKind::StairUp, emergence));
        true
    }

    fn enter_interior(&mut self) -> bool {
        let pos = self.player.position();
        let interior = ZoneCoord::interior(self.player.current_zone.x, self.player.current_zone.y);
        self.persist_current_zone();
        self.ensure_zone_record(interior);
        let spawn = self
            .zones
            .get(interior)
            .and_then(|r| r.player_spawn)
            .unwrap_or_else(Position::center);
        self.enter_zone(interior, Entry::new(EntryKind::InteriorDoor, spawn));
        if let Some(record) = self.zones.get_mut(interior) {
            record.return_to_interior = Some(pos);
        }
        true
    }

    /// Leaves an interior for its surface zone: the recorded door position,
    /// else a matching port on the surface grid, else the raw entry spawn.
    fn leave_interior(&mut self) -> bool {
        let here = self.player.current_zone;
        let surface = ZoneCoord::surface(here.x, here.y);
        let recorded = self.zones.get(here).and_then(|r| r.return_to_interior);
        self.persist_current_zone();
        self.ensure_zone_record(surface);

        let position = recorded
            .or_else(|| {
                self.zones.get(surface).and_then(|r| {
                    r.grid
                        .positions_where(|t| matches!(t, Tile::Port(PortKind::Interior)))
                        .into_iter()
                        .next()
                })
            })
            .or_else(|| self.zones.get(surface).and_then(|r| r.player_spawn))
            .unwrap_or_else(Position::center);

        self.enter_zone(surface, Entry::new(EntryKind::InteriorReturn, position));
        true
    }
}

/// The connectivity record feeding zone generation: the hashed surface
/// record for surface zones, sealed edges for everything else.
fn zone_connections(connections: &mut ConnectionManager, coord: ZoneCoord) -> ZoneConnections {
    match coord.dimension {
        Dimension::Surface => {
            connections.generate_chunk_connections(coord.x, coord.y);
            connections.connections_for(coord.x, coord.y)
        }
        _ => ZoneConnections::default(),
    }
}

/// Patches the emergence tile to a port, but never clobbers a tile that has
/// already left its primitive pre-transition state.
fn patch_emergence(grid: &mut crate::game::Grid, position: Position, kind: PortKind) {
    if let Some(tile) = grid.get(position) {
        if tile.is_primitive() {
            grid.set(position, Tile::Port(kind));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Enemy, EnemyKind, GameState, Grid};

    fn surface_state_with_exit() -> GameState {
        let mut grid = Grid::walled_floor();
        grid.set(Position::new(8, 4), Tile::Exit);
        let mut state = GameState::new_with_grid(grid);
        state.world_seed = 21;
        state.player.set_position(Position::new(8, 4));
        state
    }

    #[test]
    fn test_edge_transition_mirrors_position() {
        let mut state = surface_state_with_exit();
        assert!(state.transition_edge(Direction::East));
        assert_eq!(state.player.current_zone, ZoneCoord::surface(1, 0));
        assert_eq!(state.player.position(), Position::new(0, 4));
        assert_eq!(state.grid.get(Position::new(0, 4)), Some(&Tile::Exit));
        assert!(state.grid.is_walkable(Position::new(1, 4)));
    }

    #[test]
    fn test_edge_transition_requires_exit_tile() {
        let mut state = surface_state_with_exit();
        state.player.set_position(Position::new(4, 4));
        assert!(!state.transition_edge(Direction::East));
        assert_eq!(state.player.current_zone, ZoneCoord::surface(0, 0));
    }

    #[test]
    fn test_zone_round_trip_preserves_mutations() {
        let mut state = surface_state_with_exit();
        // Mutate terrain and kill an enemy before leaving.
        state.grid.set(Position::new(2, 2), Tile::OpenPit);
        let enemy = Enemy::new(EnemyKind::Slime, Position::new(6, 6));
        let id = enemy.id;
        state.enemies.push(enemy);
        state.persist_current_zone();
        {
            let mut ctx = state.combat_ctx();
            ctx.defeat_enemy(id, crate::combat::DefeatInitiator::Player);
        }

        assert!(state.transition_edge(Direction::East));
        // Walk back through the mirrored exit.
        assert!(state.transition_edge(Direction::West));
        assert_eq!(state.player.current_zone, ZoneCoord::surface(0, 0));
        assert_eq!(state.grid.get(Position::new(2, 2)), Some(&Tile::OpenPit));
        assert!(state.enemies.is_empty());
    }

    #[test]
    fn test_pitfall_forces_underground_and_gates_ascent() {
        let mut grid = Grid::walled_floor();
        grid.set(Position::new(3, 3), Tile::Pitfall);
        let mut state = GameState::new_with_grid(grid);
        state.world_seed = 5;
        state.player.set_position(Position::new(3, 3));

        assert!(state.trigger_pitfall());
        assert_eq!(state.player.current_zone, ZoneCoord::underground(0, 0, 1));
        assert!(!state.can_ascend());

        // The surface tile is now an open pit in the persisted record.
        let surface = state.zones.get(ZoneCoord::surface(0, 0)).unwrap();
        assert_eq!(surface.grid.get(Position::new(3, 3)), Some(&Tile::OpenPit));
    }

    #[test]
    fn test_pitfall_depth_round_trip() {
        let mut grid = Grid::walled_floor();
        let pit = Position::new(3, 3);
        grid.set(pit, Tile::Pitfall);
        let mut state = GameState::new_with_grid(grid);
        state.world_seed = 13;
        state.player.set_position(pit);
        assert!(state.trigger_pitfall());
        let depth1 = state.player.current_zone;
        assert_eq!(depth1.depth, 1);

        // Any ascent is locked until the survival turns elapse.
        state.grid.set(state.player.position(), Tile::Port(PortKind::StairUp));
        assert!(!state.use_port());
        for _ in 0..crate::config::PITFALL_SURVIVAL_TURNS {
            state.resolve_turn();
        }

        // Descend a level further via a stairdown placed under the player.
        let stair_pos = state.player.position();
        state.grid.set(stair_pos, Tile::Port(PortKind::StairDown));
        assert!(state.use_port());
        assert_eq!(state.player.current_zone.depth, 2);

        // Stairup from depth 2 returns to depth 1, at the stair.
        let up_pos = state.player.position();
        state.grid.set(up_pos, Tile::Port(PortKind::StairUp));
        assert!(state.use_port());
        assert_eq!(state.player.current_zone, depth1);
        assert_eq!(state.player.position(), stair_pos);

        // A further stairup from depth 1 ascends all the way out, back to
        // the original pitfall coordinates.
        state.grid.set(state.player.position(), Tile::Port(PortKind::StairUp));
        assert!(state.use_port());
        assert_eq!(state.player.current_zone, ZoneCoord::surface(0, 0));
        assert_eq!(state.player.position(), pit);
    }

    #[test]
    fn test_interior_round_trip_returns_to_door() {
        let mut grid = Grid::walled_floor();
        let door = Position::new(5, 5);
        grid.set(door, Tile::Port(PortKind::Interior));
        let mut state = GameState::new_with_grid(grid);
        state.world_seed = 31;
        state.player.set_position(door);

        assert!(state.use_port());
        assert_eq!(state.player.current_zone, ZoneCoord::interior(0, 0));

        // Stand on the interior's own door to leave.
        let exit_door = state
            .grid
            .positions_where(|t| matches!(t, Tile::Port(PortKind::Interior)))
            .into_iter()
            .next()
            .expect("interior has a door");
        state.player.set_position(exit_door);
        assert!(state.use_port());
        assert_eq!(state.player.current_zone, ZoneCoord::surface(0, 0));
        assert_eq!(state.player.position(), door);
    }

    #[test]
    fn test_generation_is_idempotent_per_key() {
        let mut state = surface_state_with_exit();
        state.ensure_zone_record(ZoneCoord::surface(1, 0));
        let first = state.zones.get(ZoneCoord::surface(1, 0)).unwrap().grid.clone();
        state.ensure_zone_record(ZoneCoord::surface(1, 0));
        assert_eq!(state.zones.get(ZoneCoord::surface(1, 0)).unwrap().grid, first);
    }

    #[test]
    fn test_emergence_patch_never_clobbers_rich_tiles() {
        let mut grid = Grid::walled_floor();
        grid.set(Position::new(4, 4), Tile::Cistern);
        patch_emergence(&mut grid, Position::new(4, 4), PortKind::StairUp);
        assert_eq!(grid.get(Position::new(4, 4)), Some(&Tile::Cistern));
        patch_emergence(&mut grid, Position::new(3, 3), PortKind::StairUp);
        assert_eq!(
            grid.get(Position::new(3, 3)),
            Some(&Tile::Port(PortKind::StairUp))
        );
    }
}
