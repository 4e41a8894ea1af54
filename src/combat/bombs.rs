//! # Bombs Module
//!
//! Bomb fuse state, explosions, chain reactions, and knockback.
//!
//! A bomb is a grid tile carrying its own fuse. The fuse does not start on
//! the turn the bomb was placed: the placement turn's tick only clears the
//! `just_placed` flag, so detonation happens exactly two qualifying actions
//! after placement.

use crate::combat::{CombatCtx, DefeatInitiator};
use crate::config::{BOMB_FUSE_ACTIONS, MAX_KNOCKBACK_STEPS};
use crate::game::{GameEvent, Position, Tile};
use crate::items::{self, ItemKind};
use log::debug;

impl CombatCtx<'_> {
    /// Advances every bomb fuse by one action and detonates any that are due.
    /// Called once per turn-resolution pass, before enemy movement.
    pub fn tick_bombs_and_explode(&mut self) {
        let mut due = Vec::new();
        for pos in self.grid.positions() {
            if let Some(Tile::Bomb {
                just_placed,
                actions_since_placed,
            }) = self.grid.get_mut(pos)
            {
                if *just_placed {
                    *just_placed = false;
                } else {
                    *actions_since_placed += 1;
                }
                if *actions_since_placed >= BOMB_FUSE_ACTIONS {
                    due.push(pos);
                }
            }
        }
        for pos in due {
            // A chain reaction may already have consumed this bomb.
            if matches!(self.grid.get(pos), Some(Tile::Bomb { .. })) {
                self.explode(pos);
            }
        }
    }

    /// Detonates the bomb at `center`: a 3x3 blast that destroys terrain,
    /// instant-kills enemies, chains into other bombs, and knocks the player
    /// back along the blast vector.
    pub fn explode(&mut self, center: Position) {
        debug!("bomb detonates at ({}, {})", center.x, center.y);
        self.grid.set(center, Tile::Floor);
        self.statistics.bombs_detonated += 1;
        self.events.play_sound("splode");
        self.events.emit(GameEvent::AnimationRequested {
            name: "explosion".to_string(),
            position: center,
            waypoints: Vec::new(),
        });

        let mut cells = vec![center];
        cells.extend(center.adjacent_positions());
        for cell in cells {
            if !cell.in_grid() {
                continue;
            }
            match self.grid.get(cell) {
                // Clearing the center tile first makes chains terminate.
                Some(Tile::Bomb { .. }) => self.explode(cell),
                Some(tile) if tile.is_destructible() => {
                    let replacement = if cell.on_border() {
                        Tile::Exit
                    } else {
                        Tile::Floor
                    };
                    self.grid.set(cell, replacement);
                }
                _ => {}
            }

            if let Some(enemy) = self.enemies.at(cell) {
                let id = enemy.id;
                if let Some(enemy) = self.enemies.by_id_mut(id) {
                    enemy.health = 0;
                }
                self.defeat_enemy(id, DefeatInitiator::Environment);
            }

            if cell != center && self.player.position() == cell {
                self.knock_back_player(cell - center);
            }
        }
    }

    /// Launches the player along `delta`, tile by tile, until a non-walkable
    /// tile or an enemy (which dies, halting the launch), bounded in length.
    fn knock_back_player(&mut self, delta: Position) {
        let mut pos = self.player.position();
        for _ in 0..MAX_KNOCKBACK_STEPS {
            let next = pos + delta;
            if !self.grid.is_walkable(next) {
                break;
            }
            if let Some(enemy) = self.enemies.at(next) {
                let id = enemy.id;
                if let Some(enemy) = self.enemies.by_id_mut(id) {
                    enemy.health = 0;
                }
                self.defeat_enemy(id, DefeatInitiator::Environment);
                break;
            }
            pos = next;
        }
        self.player.set_position(pos);
        self.events.play_sound("whoosh");
    }

    /// Computes the placement whitelist: adjacent open ground the player may
    /// drop a bomb onto. Returns an empty list when no bombs are held.
    pub fn bomb_placement_targets(&self) -> Vec<Position> {
        let has_bomb = self
            .player
            .inventory
            .iter()
            .any(|i| i.kind == ItemKind::Bomb && i.quantity > 0);
        if !has_bomb {
            return Vec::new();
        }
        self.player
            .position()
            .adjacent_positions()
            .into_iter()
            .filter(|&p| {
                matches!(
                    self.grid.get(p),
                    Some(Tile::Floor) | Some(Tile::Grass) | Some(Tile::Exit)
                ) && self.enemies.at(p).is_none()
            })
            .collect()
    }

    /// Places a bomb on a whitelisted tile, consuming one inventory bomb.
    /// Returns false (leaving state unchanged) when the target is not on the
    /// whitelist or no bomb is held.
    pub fn place_bomb(&mut self, target: Position, whitelist: &[Position]) -> bool {
        if !whitelist.contains(&target) {
            return false;
        }
        if !items::consume_stackable(self.player, ItemKind::Bomb) {
            return false;
        }
        self.grid.set(target, Tile::new_bomb());
        self.player.record_action(
            crate::game::ActionKind::PlaceBomb,
            crate::game::ActionResult::Placed,
        );
        self.events.play_sound("place");
        true
    }
}
