//! Integration tests for the turn pipeline: bombs, combos, and ranged play.

use zonefall::config::{BOW_HIT_DELAY_MS, MAX_KNOCKBACK_STEPS};
use zonefall::{
    ChargeKind, Enemy, EnemyKind, GameState, Grid, Item, ItemKind, Position, Tile,
};

fn open_state() -> GameState {
    GameState::new_with_grid(Grid::filled(Tile::Floor))
}

#[test]
fn bomb_placed_this_turn_explodes_two_actions_later() {
    let mut state = GameState::new_with_grid(Grid::walled_floor());
    state.player.inventory.push(Item::stack(ItemKind::Bomb, 1));
    let target = Position::new(5, 4);

    assert!(state.arm_bomb_placement());
    assert!(state.handle_tap(target));
    assert!(matches!(state.grid.get(target), Some(Tile::Bomb { .. })));

    // First qualifying action after placement: still ticking.
    assert!(state.handle_key(" "));
    assert!(matches!(state.grid.get(target), Some(Tile::Bomb { .. })));

    // Second qualifying action: detonation.
    assert!(state.handle_key(" "));
    assert!(!matches!(state.grid.get(target), Some(Tile::Bomb { .. })));
}

#[test]
fn explosion_knocks_player_back_until_a_wall() {
    let mut state = GameState::new_with_grid(Grid::walled_floor());
    state.player.set_position(Position::new(4, 4));
    state.player.inventory.push(Item::stack(ItemKind::Bomb, 1));
    assert!(state.arm_bomb_placement());
    assert!(state.handle_tap(Position::new(5, 4)));
    state.handle_key(" ");
    state.handle_key(" ");

    // Launched west from (4,4), halted by the border wall at x=0.
    assert_eq!(state.player.position(), Position::new(1, 4));
}

#[test]
fn knockback_never_exceeds_the_step_bound() {
    // On an unbounded-looking floor the launch still stops within the cap.
    let mut state = open_state();
    state.player.set_position(Position::new(1, 4));
    let mut ctx = state.combat_ctx();
    ctx.explode(Position::new(0, 4));
    let travelled = state.player.position().x - 1;
    assert!(travelled as u32 <= MAX_KNOCKBACK_STEPS);
    assert_eq!(state.player.position(), Position::new(8, 4));
}

#[test]
fn melee_combo_counts_and_bonus_points() {
    let mut state = open_state();
    state.enemies.push(Enemy::new(EnemyKind::Slime, Position::new(5, 4)));
    state.enemies.push(Enemy::new(EnemyKind::Slime, Position::new(5, 5)));
    state.enemies.push(Enemy::new(EnemyKind::Slime, Position::new(6, 4)));

    // The tap kills the first slime; the other two close onto the player in
    // the same pass and die fighting back, each chaining the streak.
    assert!(state.handle_tap(Position::new(5, 4)));
    assert_eq!(state.player.consecutive_kills, 3);
    assert_eq!(state.player.best_combo, 3);
    // 3 slimes at 5 points, plus streak bonuses of 2 and 3.
    assert_eq!(state.player.points, 20);
    // Each attacker landed one hit before dying.
    assert_eq!(state.player.health, state.player.max_health - 2);
}

#[test]
fn non_kill_action_resets_the_streak() {
    let mut state = open_state();
    state.enemies.push(Enemy::new(EnemyKind::Slime, Position::new(5, 4)));
    assert!(state.handle_tap(Position::new(5, 4)));
    assert_eq!(state.player.consecutive_kills, 1);

    assert!(state.handle_key("s"));

    let enemy = Enemy::new(EnemyKind::Slime, Position::new(5, 6));
    let pos = enemy.position();
    state.enemies.push(enemy);
    assert!(state.handle_tap(pos));
    assert_eq!(state.player.consecutive_kills, 1, "streak did not reset");
}

#[test]
fn bow_shot_holds_enemies_until_the_hit_lands() {
    let mut state = open_state();
    state.player.inventory.push(Item::charge(ItemKind::Bow));
    let enemy = Enemy::new(EnemyKind::Slime, Position::new(8, 4));
    let id = enemy.id;
    state.enemies.push(enemy);

    assert!(state.select_charge(ChargeKind::Bow));
    assert!(state.handle_tap(Position::new(8, 4)));
    assert!(state.handle_tap(Position::new(8, 4)), "confirmation tap");

    // Enemy turns are suppressed while the arrow flies.
    assert!(state.player_just_attacked);
    assert_eq!(
        state.enemies.at(Position::new(8, 4)).map(|e| e.id),
        Some(id)
    );

    state.advance_time(BOW_HIT_DELAY_MS);
    assert!(!state.player_just_attacked);
    assert!(state.defeated_enemies.contains(&id));
    assert!(state.enemies.by_id(id).is_none());
}

#[test]
fn no_turn_is_accepted_while_an_arrow_is_in_flight() {
    let mut state = open_state();
    state.player.inventory.push(Item::charge(ItemKind::Bow));
    let enemy = Enemy::new(EnemyKind::Slime, Position::new(8, 4));
    let id = enemy.id;
    state.enemies.push(enemy);

    assert!(state.select_charge(ChargeKind::Bow));
    assert!(state.handle_tap(Position::new(8, 4)));
    assert!(state.handle_tap(Position::new(8, 4)), "confirmation tap");
    let turns = state.turn_count;

    // Keys and taps are both rejected until the hit lands.
    assert!(!state.handle_key("s"));
    assert!(!state.handle_tap(Position::new(4, 5)));
    assert_eq!(state.turn_count, turns);
    assert_eq!(state.player.position(), Position::new(4, 4));

    state.advance_time(BOW_HIT_DELAY_MS);
    assert!(state.defeated_enemies.contains(&id));
    assert!(state.handle_key("s"));
    assert_eq!(state.turn_count, turns + 1);
}

#[test]
fn blocked_line_of_sight_invalidates_the_shot() {
    let mut state = open_state();
    state.player.inventory.push(Item::charge(ItemKind::Bow));
    state.enemies.push(Enemy::new(EnemyKind::Slime, Position::new(8, 4)));
    state.grid.set(Position::new(6, 4), Tile::Wall);

    assert!(state.select_charge(ChargeKind::Bow));
    assert!(!state.handle_tap(Position::new(8, 4)));
    assert!(state.pending_charge.is_none());
    assert_eq!(state.player.inventory[0].uses, ItemKind::Bow.default_uses());
}

#[test]
fn defeat_is_scored_exactly_once_across_the_pipeline() {
    let mut state = open_state();
    let enemy = Enemy::new(EnemyKind::Snake, Position::new(5, 4));
    let id = enemy.id;
    state.enemies.push(enemy);

    assert!(state.handle_tap(Position::new(5, 4)));
    let points = state.player.points;
    // Forcing the defeat flow again has no further effect.
    let mut ctx = state.combat_ctx();
    ctx.defeat_enemy(id, zonefall::DefeatInitiator::Player);
    assert_eq!(state.player.points, points);
    assert_eq!(state.statistics.enemies_defeated, 1);
}
