//! # Charges Module
//!
//! Geometric charge items: the bishop-spear, the knight icon, and the bow.
//!
//! Validation is exact geometry against the live player position plus a
//! usable (uses > 0, not disabled) item of the matching kind. A valid
//! selection yields a [`PendingCharge`] that the interaction layer turns
//! into a two-tap confirm/cancel gesture; execution consumes one use,
//! relocates the player (bow excepted), and routes any targeted enemy
//! through the standard defeat flow.

use crate::combat::{CombatCtx, DefeatInitiator};
use crate::config::{BOW_HIT_DELAY_MS, CHARGE_RANGE, TRAIL_PUFF_INTERVAL_MS};
use crate::game::{
    ActionKind, ActionResult, DelayedEffect, EnemyCollection, EnemyId, GameEvent, Grid,
    PlayerState, Position,
};
use crate::items::{self, ItemKind};
use serde::{Deserialize, Serialize};

/// The three charge geometries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChargeKind {
    /// Strictly diagonal dash, range-limited.
    BishopSpear,
    /// Classic knight-move jump.
    Knight,
    /// Straight orthogonal shot with line-of-sight, resolved after a delay.
    Bow,
}

impl ChargeKind {
    /// The inventory item kind that powers this charge.
    pub fn item_kind(self) -> ItemKind {
        match self {
            ChargeKind::BishopSpear => ItemKind::BishopSpear,
            ChargeKind::Knight => ItemKind::HorseIcon,
            ChargeKind::Bow => ItemKind::Bow,
        }
    }
}

/// A validated charge selection awaiting its confirmation tap.
///
/// Exists only between two input events; cleared on confirm, cancel, or any
/// non-matching input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingCharge {
    pub kind: ChargeKind,
    pub item_kind: ItemKind,
    pub target: Position,
    pub enemy: Option<EnemyId>,
    pub dx: i32,
    pub dy: i32,
}

/// Validates a charge of `kind` from the player's position to `target`.
/// Returns `None` (state untouched) for any geometric or inventory
/// violation.
pub fn validate_charge(
    kind: ChargeKind,
    player: &PlayerState,
    target: Position,
    grid: &Grid,
    enemies: &EnemyCollection,
) -> Option<PendingCharge> {
    items::find_usable_charge(player, kind.item_kind())?;
    if !target.in_grid() {
        return None;
    }
    let origin = player.position();
    let dx = target.x - origin.x;
    let dy = target.y - origin.y;
    let enemy = enemies.at(target).map(|e| e.id);

    let valid = match kind {
        ChargeKind::BishopSpear => {
            dx.abs() == dy.abs()
                && dx != 0
                && dx.abs() <= CHARGE_RANGE
                && (enemy.is_some() || grid.is_walkable(target))
        }
        ChargeKind::Knight => {
            dx.abs() + dy.abs() == 3
                && dx != 0
                && dy != 0
                && dx.abs() != dy.abs()
                && (enemy.is_some() || grid.is_walkable(target))
        }
        ChargeKind::Bow => {
            let orthogonal = (dx == 0) != (dy == 0);
            orthogonal
                && dx.abs() + dy.abs() > 1
                && enemy.is_some()
                && line_of_sight(grid, origin, target)
        }
    };

    valid.then_some(PendingCharge {
        kind,
        item_kind: kind.item_kind(),
        target,
        enemy,
        dx,
        dy,
    })
}

/// Whether every tile strictly between two orthogonally-aligned positions is
/// walkable.
fn line_of_sight(grid: &Grid, from: Position, to: Position) -> bool {
    let step = Position::new((to.x - from.x).signum(), (to.y - from.y).signum());
    let mut cur = from + step;
    while cur != to {
        if !grid.is_walkable(cur) {
            return false;
        }
        cur = cur + step;
    }
    true
}

impl CombatCtx<'_> {
    /// Executes a confirmed charge. Consumes one use (removing an exhausted
    /// item), relocates the player for dash charges, and resolves targeted
    /// enemies through the defeat flow. Returns false when the use could not
    /// be consumed.
    pub fn execute_charge(&mut self, pending: PendingCharge) -> bool {
        if !items::spend_charge_use(self.player, pending.item_kind) {
            return false;
        }
        match pending.kind {
            ChargeKind::Bow => self.loose_arrow(pending),
            ChargeKind::BishopSpear | ChargeKind::Knight => self.dash_charge(pending),
        }
        true
    }

    /// Bow shots are asynchronous: enemy turns stay suppressed until the
    /// delayed hit resolves and re-enables them exactly once.
    fn loose_arrow(&mut self, pending: PendingCharge) {
        *self.player_just_attacked = true;
        self.scheduler.schedule(
            BOW_HIT_DELAY_MS,
            DelayedEffect::BowHit {
                target: pending.target,
                enemy: pending.enemy,
            },
        );
        self.events.play_sound("whoosh");
        self.events.emit(GameEvent::AnimationRequested {
            name: "arrow".to_string(),
            position: self.player.position(),
            waypoints: vec![self.player.position(), pending.target],
        });
    }

    fn dash_charge(&mut self, pending: PendingCharge) {
        let start = self.player.position();
        let waypoints = match pending.kind {
            // Knight travel is an L: long axis first, then the short one.
            ChargeKind::Knight => {
                let mid = if pending.dx.abs() == 2 {
                    Position::new(start.x + pending.dx, start.y)
                } else {
                    Position::new(start.x, start.y + pending.dy)
                };
                vec![start, mid, pending.target]
            }
            _ => vec![start, pending.target],
        };

        self.player.set_position(pending.target);
        self.events.play_sound("whoosh");

        // A paced trail of puffs marks the travel path.
        for (i, &stop) in waypoints.iter().enumerate().skip(1) {
            self.scheduler.schedule(
                TRAIL_PUFF_INTERVAL_MS * i as u64,
                DelayedEffect::TrailPuff { position: stop },
            );
        }

        let animation = match pending.enemy {
            Some(id) => {
                self.defeat_enemy(id, DefeatInitiator::Player);
                if self.player.consecutive_kills >= 2 {
                    "backflip"
                } else {
                    "bump"
                }
            }
            None => {
                self.player.record_action(ActionKind::Move, ActionResult::Moved);
                "dash"
            }
        };
        self.events.emit(GameEvent::AnimationRequested {
            name: animation.to_string(),
            position: pending.target,
            waypoints,
        });
    }
}
