//! Integration tests for zone transitions and persistence round trips.

use zonefall::config::PITFALL_SURVIVAL_TURNS;
use zonefall::{
    Direction, Enemy, EnemyKind, GameState, Grid, PortKind, Position, Tile, ZoneCoord,
};

fn surface_state() -> GameState {
    let mut grid = Grid::walled_floor();
    grid.set(Position::new(8, 4), Tile::Exit);
    grid.set(Position::new(4, 0), Tile::Exit);
    let mut state = GameState::new_with_grid(grid);
    state.world_seed = 77;
    state
}

#[test]
fn mutations_survive_a_zone_round_trip() {
    let mut state = surface_state();
    let enemy = Enemy::new(EnemyKind::Snake, Position::new(6, 6));
    let id = enemy.id;
    state.enemies.push(enemy);
    state.persist_current_zone();

    // Break a wall and kill the enemy.
    state.grid.set(Position::new(1, 4), Tile::Floor);
    state.player.set_position(Position::new(6, 6));
    {
        let mut ctx = state.combat_ctx();
        ctx.defeat_enemy(id, zonefall::DefeatInitiator::Player);
    }

    state.player.set_position(Position::new(8, 4));
    assert!(state.transition_edge(Direction::East));
    assert!(state.transition_edge(Direction::West));

    assert_eq!(state.grid.get(Position::new(1, 4)), Some(&Tile::Floor));
    assert!(state.enemies.is_empty(), "defeated enemy respawned");
}

#[test]
fn generated_zone_is_not_regenerated_on_revisit() {
    let mut state = surface_state();
    state.player.set_position(Position::new(8, 4));
    assert!(state.transition_edge(Direction::East));

    // Scar the freshly generated zone, then bounce away and back.
    let scar = Position::new(4, 4);
    state.grid.set(scar, Tile::OpenPit);
    assert!(state.transition_edge(Direction::West));
    state.player.set_position(Position::new(8, 4));
    assert!(state.transition_edge(Direction::East));
    assert_eq!(state.grid.get(scar), Some(&Tile::OpenPit));
}

#[test]
fn edge_transition_enters_at_mirrored_coordinate() {
    let mut state = surface_state();
    state.player.set_position(Position::new(4, 0));
    assert!(state.transition_edge(Direction::North));
    assert_eq!(state.player.current_zone, ZoneCoord::surface(0, -1));
    assert_eq!(state.player.position(), Position::new(4, 8));
    assert_eq!(state.grid.get(Position::new(4, 8)), Some(&Tile::Exit));
}

#[test]
fn edge_transition_refused_off_exit_tile() {
    let mut state = surface_state();
    state.player.set_position(Position::new(4, 4));
    assert!(!state.transition_edge(Direction::North));
    assert_eq!(state.player.current_zone, ZoneCoord::surface(0, 0));
}

#[test]
fn pitfall_chain_returns_to_original_coordinates() {
    let pit = Position::new(2, 6);
    let mut grid = Grid::walled_floor();
    grid.set(pit, Tile::Pitfall);
    let mut state = GameState::new_with_grid(grid);
    state.world_seed = 101;
    state.player.set_position(Position::new(2, 5));

    // Stepping onto the pitfall forces the fall, no confirmation.
    assert!(state.move_player(pit));
    assert_eq!(state.player.current_zone, ZoneCoord::underground(0, 0, 1));

    // Wait out the survival lock.
    for _ in 0..PITFALL_SURVIVAL_TURNS {
        state.handle_key(" ");
    }

    // Descend once more, then climb back up twice.
    let stair = state.player.position();
    state.grid.set(stair, Tile::Port(PortKind::StairDown));
    assert!(state.use_port());
    assert_eq!(state.player.current_zone.depth, 2);

    let up = state.player.position();
    state.grid.set(up, Tile::Port(PortKind::StairUp));
    assert!(state.use_port());
    assert_eq!(state.player.current_zone.depth, 1);
    assert_eq!(state.player.position(), stair);

    state.grid.set(state.player.position(), Tile::Port(PortKind::StairUp));
    assert!(state.use_port());
    assert_eq!(state.player.current_zone, ZoneCoord::surface(0, 0));
    assert_eq!(state.player.position(), pit);
    // The pitfall is a visible open pit now.
    assert_eq!(state.grid.get(pit), Some(&Tile::OpenPit));
}

#[test]
fn cistern_descent_records_surface_return() {
    let well = Position::new(6, 2);
    let mut grid = Grid::walled_floor();
    grid.set(well, Tile::Cistern);
    let mut state = GameState::new_with_grid(grid);
    state.world_seed = 55;
    state.player.set_position(well);

    assert!(state.use_port());
    assert_eq!(state.player.current_zone, ZoneCoord::underground(0, 0, 1));
    // Emergence point carries a stairup back.
    assert_eq!(
        state.grid.get(state.player.position()),
        Some(&Tile::Port(PortKind::StairUp))
    );

    assert!(state.use_port());
    assert_eq!(state.player.current_zone, ZoneCoord::surface(0, 0));
    assert_eq!(state.player.position(), well);
}

#[test]
fn full_save_restores_mid_dungeon() {
    let mut grid = Grid::walled_floor();
    grid.set(Position::new(3, 3), Tile::Pitfall);
    let mut state = GameState::new_with_grid(grid);
    state.world_seed = 8;
    state.player.set_position(Position::new(3, 3));
    assert!(state.trigger_pitfall());

    let json = state.to_json().unwrap();
    let mut restored = GameState::from_json(&json).unwrap();
    assert_eq!(restored.player.current_zone, ZoneCoord::underground(0, 0, 1));
    assert!(!restored.can_ascend());
    assert_eq!(restored.grid.to_ascii(), state.grid.to_ascii());

    // The restored state keeps playing: the survival lock still counts down.
    for _ in 0..PITFALL_SURVIVAL_TURNS {
        restored.handle_key(" ");
    }
    assert!(restored.can_ascend());
}
