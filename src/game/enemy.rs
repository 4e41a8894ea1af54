//! # Enemy Module
//!
//! Enemy state, species stats, and the per-enemy chase step.
//!
//! Movement *resolution* (tile reservation, pitfall falls, collision rules)
//! lives in the combat module; an enemy only proposes a candidate step here.

use crate::game::{new_enemy_id, EnemyId, Grid, Position};
use serde::{Deserialize, Serialize};

/// Enemy species, determining stats and behavior quirks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    Slime,
    Snake,
    Bat,
    /// Incorporeal; exempt from contact combat entirely.
    Wisp,
}

impl EnemyKind {
    /// Starting health for this species.
    pub fn base_health(self) -> i32 {
        match self {
            EnemyKind::Slime => 2,
            EnemyKind::Snake => 2,
            EnemyKind::Bat => 1,
            EnemyKind::Wisp => 1,
        }
    }

    /// Contact damage dealt to the player.
    pub fn base_attack(self) -> i32 {
        match self {
            EnemyKind::Slime => 1,
            EnemyKind::Snake => 2,
            EnemyKind::Bat => 1,
            EnemyKind::Wisp => 0,
        }
    }

    /// Points awarded for defeating this species.
    pub fn point_value(self) -> u32 {
        match self {
            EnemyKind::Slime => 5,
            EnemyKind::Snake => 10,
            EnemyKind::Bat => 10,
            EnemyKind::Wisp => 15,
        }
    }

    /// Whether this species never exchanges contact damage with the player.
    pub fn is_contact_exempt(self) -> bool {
        matches!(self, EnemyKind::Wisp)
    }
}

/// One live enemy. The `id` is stable across serialization so a defeated
/// enemy can never respawn from a stale zone record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: EnemyId,
    pub x: i32,
    pub y: i32,
    pub health: i32,
    pub attack: i32,
    pub kind: EnemyKind,
    pub last_x: i32,
    pub last_y: i32,
    /// Set when this enemy already exchanged damage this turn; cleared at the
    /// start of every enemy phase.
    #[serde(default)]
    pub just_attacked: bool,
}

impl Enemy {
    /// Creates a new enemy of the given species at a position.
    pub fn new(kind: EnemyKind, pos: Position) -> Self {
        Self {
            id: new_enemy_id(),
            x: pos.x,
            y: pos.y,
            health: kind.base_health(),
            attack: kind.base_attack(),
            kind,
            last_x: pos.x,
            last_y: pos.y,
            just_attacked: false,
        }
    }

    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }

    /// Moves the enemy, remembering where it came from.
    pub fn move_to(&mut self, pos: Position) {
        self.last_x = self.x;
        self.last_y = self.y;
        self.x = pos.x;
        self.y = pos.y;
    }

    /// Proposes a movement target for this turn, or `None` to stand still.
    ///
    /// The proposal only considers terrain; occupancy rules are enforced by
    /// the resolver. Enemies will happily step onto a pitfall (and fall).
    pub fn desired_move(
        &self,
        grid: &Grid,
        player: Position,
        _others: &[Position],
    ) -> Option<Position> {
        let here = self.position();
        let dist = here.manhattan_distance(player);
        if dist == 0 {
            return None;
        }

        // Bats only give chase at close range.
        if self.kind == EnemyKind::Bat && dist > 4 {
            return None;
        }

        let dx = player.x - here.x;
        let dy = player.y - here.y;

        // Prefer closing the larger axis first, fall back to the other.
        let mut candidates = Vec::with_capacity(2);
        let step_x = Position::new(here.x + dx.signum(), here.y);
        let step_y = Position::new(here.x, here.y + dy.signum());
        if dx.abs() >= dy.abs() {
            candidates.push(step_x);
            candidates.push(step_y);
        } else {
            candidates.push(step_y);
            candidates.push(step_x);
        }

        candidates
            .into_iter()
            .filter(|&c| c != here)
            .find(|&c| c == player || grid.is_walkable(c))
    }
}

/// Thin facade over the live enemy list of the active zone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnemyCollection {
    enemies: Vec<Enemy>,
}

impl EnemyCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_vec(enemies: Vec<Enemy>) -> Self {
        Self { enemies }
    }

    pub fn len(&self) -> usize {
        self.enemies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty()
    }

    pub fn push(&mut self, enemy: Enemy) {
        self.enemies.push(enemy);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Enemy> {
        self.enemies.iter_mut()
    }

    pub fn get(&self, index: usize) -> Option<&Enemy> {
        self.enemies.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Enemy> {
        self.enemies.get_mut(index)
    }

    pub fn by_id(&self, id: EnemyId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }

    pub fn by_id_mut(&mut self, id: EnemyId) -> Option<&mut Enemy> {
        self.enemies.iter_mut().find(|e| e.id == id)
    }

    /// The first live enemy standing on the given position.
    pub fn at(&self, pos: Position) -> Option<&Enemy> {
        self.enemies
            .iter()
            .find(|e| e.position() == pos && e.health > 0)
    }

    /// Removes and returns the enemy with the given id.
    pub fn remove_by_id(&mut self, id: EnemyId) -> Option<Enemy> {
        let idx = self.enemies.iter().position(|e| e.id == id)?;
        Some(self.enemies.remove(idx))
    }

    /// Keeps only enemies for which the predicate holds.
    pub fn retain<F: FnMut(&Enemy) -> bool>(&mut self, pred: F) {
        self.enemies.retain(pred);
    }

    /// Snapshot of every enemy position, used for turn-scoped reservations.
    pub fn positions(&self) -> Vec<Position> {
        self.enemies.iter().map(|e| e.position()).collect()
    }

    pub fn into_vec(self) -> Vec<Enemy> {
        self.enemies
    }

    pub fn to_vec(&self) -> Vec<Enemy> {
        self.enemies.clone()
    }
}
