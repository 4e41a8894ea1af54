//! # Player Module
//!
//! The single long-lived player record: vitals, score, inventories, zone
//! address, and the last-action memory that drives combo chaining.

use crate::config::{DEFAULT_PLAYER_HEALTH, NEED_GAUGE_MAX};
use crate::game::{Position, ZoneCoord};
use crate::items::Item;
use serde::{Deserialize, Serialize};

/// Category of the player's most recent action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionKind {
    Move,
    Attack,
    UseItem,
    PlaceBomb,
    Wait,
}

/// Outcome of the player's most recent action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionResult {
    Moved,
    Kill,
    Blocked,
    Consumed,
    Placed,
    Waited,
}

/// The player. Mutated by nearly every subsystem; persisted wholesale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerState {
    pub x: i32,
    pub y: i32,
    pub health: i32,
    pub max_health: i32,
    pub hunger: i32,
    pub thirst: i32,
    pub points: u32,
    /// Main inventory, at most [`crate::config::INVENTORY_SLOTS`] entries.
    pub inventory: Vec<Item>,
    /// Secondary stash, at most [`crate::config::RADIAL_SLOTS`] entries.
    pub radial_inventory: Vec<Item>,
    pub current_zone: ZoneCoord,
    /// Running streak of consecutive player-melee kills.
    pub consecutive_kills: u32,
    /// Best streak ever achieved; survives streak resets.
    pub best_combo: u32,
    pub last_action_kind: Option<ActionKind>,
    pub last_action_result: Option<ActionResult>,
}

impl PlayerState {
    /// Creates a fresh player at a position in a zone.
    pub fn new(pos: Position, zone: ZoneCoord) -> Self {
        Self {
            x: pos.x,
            y: pos.y,
            health: DEFAULT_PLAYER_HEALTH,
            max_health: DEFAULT_PLAYER_HEALTH,
            hunger: NEED_GAUGE_MAX,
            thirst: NEED_GAUGE_MAX,
            points: 0,
            inventory: Vec::new(),
            radial_inventory: Vec::new(),
            current_zone: zone,
            consecutive_kills: 0,
            best_combo: 0,
            last_action_kind: None,
            last_action_result: None,
        }
    }

    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }

    pub fn set_position(&mut self, pos: Position) {
        self.x = pos.x;
        self.y = pos.y;
    }

    /// Records the player's most recent action and its outcome.
    pub fn record_action(&mut self, kind: ActionKind, result: ActionResult) {
        self.last_action_kind = Some(kind);
        self.last_action_result = Some(result);
    }

    /// Whether the immediately preceding action was an attack that killed.
    /// This is the sole condition under which a new kill extends the streak.
    pub fn last_action_was_kill(&self) -> bool {
        self.last_action_kind == Some(ActionKind::Attack)
            && self.last_action_result == Some(ActionResult::Kill)
    }

    /// Applies damage; returns true if the player died.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        self.health -= amount.max(0);
        self.health <= 0
    }

    /// Heals up to max health.
    pub fn heal(&mut self, amount: i32) {
        self.health = (self.health + amount.max(0)).min(self.max_health);
    }

    pub fn add_points(&mut self, amount: u32) {
        self.points += amount;
    }

    /// Restores hunger, capped at the gauge maximum.
    pub fn eat(&mut self, amount: i32) {
        self.hunger = (self.hunger + amount.max(0)).min(NEED_GAUGE_MAX);
    }

    /// Restores thirst, capped at the gauge maximum.
    pub fn drink(&mut self, amount: i32) {
        self.thirst = (self.thirst + amount.max(0)).min(NEED_GAUGE_MAX);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> PlayerState {
        PlayerState::new(Position::new(4, 4), ZoneCoord::surface(0, 0))
    }

    #[test]
    fn test_new_player_defaults() {
        let p = player();
        assert_eq!(p.health, DEFAULT_PLAYER_HEALTH);
        assert_eq!(p.hunger, NEED_GAUGE_MAX);
        assert_eq!(p.points, 0);
        assert_eq!(p.consecutive_kills, 0);
        assert!(p.last_action_kind.is_none());
    }

    #[test]
    fn test_damage_and_death() {
        let mut p = player();
        assert!(!p.take_damage(3));
        assert_eq!(p.health, DEFAULT_PLAYER_HEALTH - 3);
        assert!(p.take_damage(100));
    }

    #[test]
    fn test_heal_caps_at_max() {
        let mut p = player();
        p.take_damage(5);
        p.heal(100);
        assert_eq!(p.health, p.max_health);
    }

    #[test]
    fn test_needs_cap_at_gauge_max() {
        let mut p = player();
        p.hunger = 50;
        p.eat(30);
        assert_eq!(p.hunger, 80);
        p.eat(100);
        assert_eq!(p.hunger, NEED_GAUGE_MAX);
        p.thirst = 10;
        p.drink(5);
        assert_eq!(p.thirst, 15);
    }

    #[test]
    fn test_last_action_kill_detection() {
        let mut p = player();
        assert!(!p.last_action_was_kill());
        p.record_action(ActionKind::Attack, ActionResult::Kill);
        assert!(p.last_action_was_kill());
        p.record_action(ActionKind::Move, ActionResult::Moved);
        assert!(!p.last_action_was_kill());
    }
}
