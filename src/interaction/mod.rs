//! # Interaction Module
//!
//! Tap and key dispatch onto game actions.
//!
//! A grid tap is routed through a strict precedence order: a pending charge
//! confirmation (or its cancellation) first, then an armed bomb placement,
//! then charge targeting, then ports, adjacency actions, and finally BFS
//! auto-pathing to a distant tile with one turn per step. Keyboard movement
//! cancels any transient selection state immediately.

use crate::combat::{charges, ChargeKind};
use crate::config::GRID_SIZE;
use crate::game::{
    ActionKind, ActionResult, Direction, GameState, MessageImportance, Position, Tile,
};
use crate::input::{self, PlayerInput};
use crate::items::{self, ItemKind};
use pathfinding::prelude::bfs;

impl GameState {
    /// Routes a normalized grid tap. Returns true when the tap did anything.
    pub fn handle_tap(&mut self, tap: Position) -> bool {
        if self.game_over || self.player_just_attacked {
            return false;
        }

        if let Some(pending) = self.pending_charge.take() {
            self.selected_charge = None;
            if tap == pending.target {
                let mut ctx = self.combat_ctx();
                if ctx.execute_charge(pending) {
                    self.resolve_turn();
                    return true;
                }
                return false;
            }
            // A non-matching tap cancels and then gets normal handling.
            self.events.overlay("Charge cancelled");
        }

        if let Some(whitelist) = self.bomb_placement.take() {
            let mut ctx = self.combat_ctx();
            if ctx.place_bomb(tap, &whitelist) {
                self.resolve_turn();
                return true;
            }
            return false;
        }

        if let Some(kind) = self.selected_charge {
            return self.target_charge(kind, tap);
        }

        if !tap.in_grid() {
            return self.tap_off_grid(tap);
        }

        let player_pos = self.player.position();
        if tap == player_pos {
            return self.use_port();
        }

        if let Some(Tile::Npc) = self.grid.get(tap) {
            if tap.chebyshev_distance(player_pos) == 1 {
                self.events
                    .message("\"Mind the pits around here.\"", MessageImportance::Info);
                return true;
            }
        }

        if tap.manhattan_distance(player_pos) == 1 && tap.chebyshev_distance(player_pos) == 1 {
            return self.move_player(tap);
        }

        self.auto_path_to(tap)
    }

    /// Routes a symbolic key event. Any key clears transient selections.
    pub fn handle_key(&mut self, key: &str) -> bool {
        let Some(intent) = input::parse_key(key) else {
            return false;
        };
        let had_selection = self.pending_charge.is_some()
            || self.selected_charge.is_some()
            || self.bomb_placement.is_some();
        self.pending_charge = None;
        self.selected_charge = None;
        self.bomb_placement = None;

        // No new turn may begin while a delayed attack is outstanding.
        if self.game_over || self.player_just_attacked {
            return false;
        }
        match intent {
            PlayerInput::Cancel => had_selection,
            PlayerInput::Wait => {
                self.player.record_action(ActionKind::Wait, ActionResult::Waited);
                self.resolve_turn();
                true
            }
            PlayerInput::Move(direction) => {
                let target = self.player.position() + direction.to_delta();
                if target.in_grid() {
                    self.move_player(target)
                } else {
                    self.transition_edge(direction)
                }
            }
        }
    }

    /// Selects a charge item for targeting. Fails when no usable item of
    /// that kind is held.
    pub fn select_charge(&mut self, kind: ChargeKind) -> bool {
        if items::find_usable_charge(&self.player, kind.item_kind()).is_none() {
            return false;
        }
        self.pending_charge = None;
        self.selected_charge = Some(kind);
        true
    }

    /// Enters bomb placement mode, computing the whitelist of valid targets.
    pub fn arm_bomb_placement(&mut self) -> bool {
        let targets = self.combat_ctx().bomb_placement_targets();
        if targets.is_empty() {
            return false;
        }
        self.bomb_placement = Some(targets);
        true
    }

    /// Consumes a stackable item from the main inventory; counts as a turn.
    pub fn use_inventory_item(&mut self, kind: ItemKind) -> bool {
        if !items::use_consumable(&mut self.player, kind, &mut self.events) {
            return false;
        }
        self.player
            .record_action(ActionKind::UseItem, ActionResult::Consumed);
        self.resolve_turn();
        true
    }

    /// Digs an adjacent floor tile open with the shovel, creating a hole
    /// that leads underground.
    pub fn dig(&mut self, target: Position) -> bool {
        if target.manhattan_distance(self.player.position()) != 1 {
            return false;
        }
        if !matches!(self.grid.get(target), Some(Tile::Floor)) {
            return false;
        }
        if !items::spend_charge_use(&mut self.player, ItemKind::Shovel) {
            return false;
        }
        self.grid.set(target, Tile::Hole);
        self.events.play_sound("dig");
        self.player
            .record_action(ActionKind::UseItem, ActionResult::Consumed);
        self.resolve_turn();
        true
    }

    /// Reads the book of time travel, pulling the player back to the world
    /// origin. Spends the book's single use; counts as a turn.
    pub fn use_time_travel(&mut self) -> bool {
        if !items::spend_charge_use(&mut self.player, ItemKind::BookOfTimeTravel) {
            return false;
        }
        self.persist_current_zone();
        let origin = crate::game::ZoneCoord::surface(0, 0);
        self.ensure_zone_record(origin);
        let spawn = self
            .zones
            .get(origin)
            .and_then(|r| r.player_spawn)
            .unwrap_or_else(Position::center);
        self.enter_zone(origin, crate::zone::Entry::new(crate::zone::EntryKind::Spawn, spawn));
        self.events.play_sound("warp");
        self.events
            .message("The pages pull you back to the beginning.", MessageImportance::Info);
        self.player
            .record_action(ActionKind::UseItem, ActionResult::Consumed);
        self.resolve_turn();
        true
    }

    /// Moves the player one cardinal step: attack-move onto an enemy, pick
    /// up items, fall through pits, or plain movement. Invalid targets are
    /// no-ops.
    pub fn move_player(&mut self, target: Position) -> bool {
        let player_pos = self.player.position();
        if target.manhattan_distance(player_pos) != 1 || !target.in_grid() {
            return false;
        }

        if let Some(enemy) = self.enemies.at(target) {
            let id = enemy.id;
            self.player.set_position(target);
            let mut ctx = self.combat_ctx();
            ctx.defeat_enemy(id, crate::combat::DefeatInitiator::Player);
            self.resolve_turn();
            return true;
        }

        if !self.grid.is_walkable(target) {
            return false;
        }

        self.player.set_position(target);
        if let Some(Tile::Item(item)) = self.grid.get(target) {
            let item = item.clone();
            self.grid.set(target, Tile::Floor);
            items::add_item(&mut self.player, &mut self.grid, target, item);
            self.statistics.items_collected += 1;
            self.events.play_sound("pickup");
        }
        self.player.record_action(ActionKind::Move, ActionResult::Moved);

        if self.grid.get(target).map(Tile::is_pit).unwrap_or(false) {
            // The fall replaces the rest of this turn's resolution.
            self.trigger_pitfall();
            return true;
        }
        self.resolve_turn();
        true
    }

    fn target_charge(&mut self, kind: ChargeKind, tap: Position) -> bool {
        match charges::validate_charge(kind, &self.player, tap, &self.grid, &self.enemies) {
            Some(pending) => {
                self.pending_charge = Some(pending);
                self.events.overlay("Tap again to confirm");
                true
            }
            None => {
                self.selected_charge = None;
                false
            }
        }
    }

    /// An off-grid tap triggers an edge transition when the player stands on
    /// an exit tile at the matching border.
    fn tap_off_grid(&mut self, tap: Position) -> bool {
        let direction = if tap.y < 0 {
            Direction::North
        } else if tap.y >= GRID_SIZE {
            Direction::South
        } else if tap.x < 0 {
            Direction::West
        } else {
            Direction::East
        };
        self.transition_edge(direction)
    }

    /// BFS auto-pathing: walks toward the tapped tile one turn per step,
    /// stopping early if the route becomes blocked or a transition fires.
    fn auto_path_to(&mut self, goal: Position) -> bool {
        let start = self.player.position();
        let zone = self.player.current_zone;
        let Some(path) = self.find_path(start, goal) else {
            return false;
        };

        let mut moved = false;
        for step in path.into_iter().skip(1) {
            if self.game_over || self.player.current_zone != zone {
                break;
            }
            if !self.move_player(step) {
                break;
            }
            moved = true;
        }
        moved
    }

    /// Shortest cardinal path to a goal over walkable, enemy-free tiles.
    /// The goal itself may hold an enemy (the final step attacks it).
    fn find_path(&self, start: Position, goal: Position) -> Option<Vec<Position>> {
        let goal_ok = self.grid.is_walkable(goal) || self.enemies.at(goal).is_some();
        if !goal_ok {
            return None;
        }
        bfs(
            &start,
            |&p| {
                p.cardinal_adjacent_positions()
                    .into_iter()
                    .filter(|&n| {
                        n == goal || (self.grid.is_walkable(n) && self.enemies.at(n).is_none())
                    })
                    .collect::<Vec<_>>()
            },
            |&p| p == goal,
        )
    }
}
