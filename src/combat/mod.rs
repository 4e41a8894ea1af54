//! # Combat Module
//!
//! Enemy movement resolution, collision sweeps, and defeat bookkeeping.
//!
//! All combat functions operate on a [`CombatCtx`], a borrow of exactly the
//! state combat needs (grid, player, enemies, zone store, defeat set, event
//! queue). Enemy movement within one turn is resolved sequentially but uses
//! two turn-scoped reservation sets to emulate simultaneous movement, so two
//! enemies can never swap through each other or stack on one tile.

pub mod bombs;
pub mod charges;

pub use charges::{ChargeKind, PendingCharge};

use crate::game::{
    Enemy, EnemyCollection, EnemyId, EventQueue, GameEvent, GameStatistics, Grid,
    MessageImportance, PlayerState, Position, Scheduler, ZoneCoord,
};
use crate::zone::ZoneStore;
use std::collections::HashSet;

/// Who caused an enemy's defeat; drives combo bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefeatInitiator {
    /// A direct player action (melee step, charge, bow hit).
    Player,
    /// Bombs, terrain, or any other non-player cause.
    Environment,
}

/// The slice of game state combat mutates, borrowed for one resolution pass.
pub struct CombatCtx<'a> {
    pub grid: &'a mut Grid,
    pub player: &'a mut PlayerState,
    pub enemies: &'a mut EnemyCollection,
    pub zones: &'a mut ZoneStore,
    pub defeated: &'a mut HashSet<EnemyId>,
    pub events: &'a mut EventQueue,
    pub statistics: &'a mut GameStatistics,
    pub scheduler: &'a mut Scheduler,
    pub player_just_attacked: &'a mut bool,
    pub current_zone: ZoneCoord,
    /// Enemies that fell through pitfalls this pass, awaiting transfer to
    /// their destination zone.
    pub fallen: &'a mut Vec<(ZoneCoord, Enemy)>,
}

impl CombatCtx<'_> {
    /// Defeats an enemy, exactly once per id.
    ///
    /// Awards points, prunes the enemy from the live list and from the
    /// current zone's persisted record, and updates the combo streak when
    /// the player initiated the kill. A second call with the same id is a
    /// silent no-op.
    pub fn defeat_enemy(&mut self, id: EnemyId, initiator: DefeatInitiator) {
        if !self.defeated.insert(id) {
            return;
        }
        let Some(enemy) = self.enemies.by_id(id) else {
            return;
        };
        let kind = enemy.kind;
        let position = enemy.position();

        self.player.add_points(kind.point_value());
        self.events.emit(GameEvent::PointsAwarded {
            amount: kind.point_value(),
            position,
        });
        self.events.play_sound("attack");

        match initiator {
            DefeatInitiator::Player => {
                // Kills chain only when the immediately preceding action was
                // itself a killing attack.
                let chained = self.player.last_action_was_kill();
                self.player.consecutive_kills = if chained {
                    self.player.consecutive_kills + 1
                } else {
                    1
                };
                let streak = self.player.consecutive_kills;
                if streak >= 2 {
                    self.player.add_points(streak);
                    self.events.emit(GameEvent::ComboAchieved { count: streak });
                }
                if streak > self.player.best_combo {
                    self.player.best_combo = streak;
                }
                self.player.record_action(
                    crate::game::ActionKind::Attack,
                    crate::game::ActionResult::Kill,
                );
            }
            DefeatInitiator::Environment => {
                self.player.consecutive_kills = 0;
            }
        }

        self.enemies.remove_by_id(id);
        if let Some(record) = self.zones.get_mut(self.current_zone) {
            record.enemies.retain(|e| e.id != id);
        }
        self.statistics.enemies_defeated += 1;
        self.events.emit(GameEvent::StatsChanged);
    }

    /// Runs the per-turn enemy movement pass.
    ///
    /// Skipped entirely while a delayed player attack is outstanding. Each
    /// enemy proposes one step; the step is rejected if the tile is occupied
    /// by a live enemy, was occupied by any enemy when the pass started
    /// (other than the mover's own start), or was already claimed earlier
    /// this pass. Stepping onto a pit removes the enemy for transfer to the
    /// zone below.
    pub fn run_enemy_phase(&mut self) {
        if *self.player_just_attacked {
            return;
        }

        let initial_tiles: HashSet<Position> = self.enemies.positions().into_iter().collect();
        let mut claimed: HashSet<Position> = HashSet::new();
        let player_pos = self.player.position();
        let ids: Vec<EnemyId> = self.enemies.iter().map(|e| e.id).collect();

        for id in ids {
            let Some(enemy) = self.enemies.by_id_mut(id) else {
                continue;
            };
            enemy.just_attacked = false;
            if enemy.health <= 0 {
                continue;
            }
            let start = enemy.position();
            let others = self.enemies.positions();
            let Some(enemy) = self.enemies.by_id(id) else {
                continue;
            };
            let Some(target) = enemy.desired_move(self.grid, player_pos, &others) else {
                continue;
            };

            if target != player_pos {
                let occupied_now = self.enemies.at(target).is_some();
                let reserved = initial_tiles.contains(&target) && target != start;
                if occupied_now || reserved || claimed.contains(&target) {
                    continue;
                }
            }

            if self.grid.get(target).map(|t| t.is_pit()).unwrap_or(false) {
                if let Some(mut fallen) = self.enemies.remove_by_id(id) {
                    fallen.move_to(target);
                    self.fallen.push((self.current_zone.below(), fallen));
                    self.events.play_sound("fall");
                }
                continue;
            }

            if let Some(enemy) = self.enemies.by_id_mut(id) {
                enemy.move_to(target);
                claimed.insert(target);
            }
        }
    }

    /// The authoritative post-action collision sweep.
    ///
    /// Already-dead enemies run the defeat flow (idempotent); enemies
    /// co-located with the player exchange damage once per turn, exempt
    /// species aside.
    pub fn check_collisions(&mut self) {
        let player_pos = self.player.position();
        let ids: Vec<EnemyId> = self.enemies.iter().map(|e| e.id).collect();

        for id in ids {
            let Some(enemy) = self.enemies.by_id(id) else {
                continue;
            };
            if enemy.health <= 0 {
                self.defeat_enemy(id, DefeatInitiator::Environment);
                continue;
            }
            if enemy.position() != player_pos
                || enemy.just_attacked
                || enemy.kind.is_contact_exempt()
            {
                continue;
            }
            let attack = enemy.attack;
            if let Some(enemy) = self.enemies.by_id_mut(id) {
                enemy.just_attacked = true;
                enemy.health = 0;
            }
            let died = self.player.take_damage(attack);
            self.events.play_sound("hurt");
            self.defeat_enemy(id, DefeatInitiator::Player);
            if died {
                self.events
                    .message("You have fallen.", MessageImportance::Critical);
            }
        }
    }

    /// Resolves a delayed ranged hit (the bow) against an enemy, if it is
    /// still present and alive when the arrow lands.
    pub fn resolve_ranged_kill(&mut self, enemy: Option<EnemyId>, target: Position) {
        let id = enemy.or_else(|| self.enemies.at(target).map(|e| e.id));
        if let Some(id) = id {
            if self.enemies.by_id(id).is_some() {
                self.defeat_enemy(id, DefeatInitiator::Player);
            }
        }
    }
}
