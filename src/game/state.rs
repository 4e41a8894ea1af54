//! # State Module
//!
//! Central game state and the synchronous turn-resolution pipeline.
//!
//! Every player action that counts as a turn ends in [`GameState::resolve_turn`],
//! which runs the fixed ordering the rest of the engine assumes: bomb fuse
//! tick and explosions first (movement logic must see the destroyed terrain),
//! then the enemy movement pass, then the collision/defeat sweep, then
//! pitfall and survival bookkeeping. Zone persistence happens on transition,
//! never mid-pass.

use crate::combat::{CombatCtx, PendingCharge};
use crate::config::{NEED_DECAY_TURNS, PITFALL_SURVIVAL_TURNS};
use crate::game::{
    DelayedEffect, Enemy, EnemyCollection, EnemyId, EventQueue, GameEvent, Grid,
    MessageImportance, PlayerState, Position, Scheduler, Tile, ZoneCoord,
};
use crate::generation::ConnectionManager;
use crate::zone::{Entry, EntryKind, ZoneStore};
use crate::ZonefallResult;
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Running gameplay counters, persisted with the save.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStatistics {
    pub turns_taken: u64,
    pub enemies_defeated: u32,
    pub bombs_detonated: u32,
    pub zones_visited: u32,
    pub items_collected: u32,
}

/// The complete game state: active zone, player, world stores, and the
/// transient per-turn machinery.
#[derive(Debug, Serialize, Deserialize)]
pub struct GameState {
    pub world_seed: u64,
    /// The active zone's grid; inactive zones live in `zones`.
    pub grid: Grid,
    pub player: PlayerState,
    pub enemies: EnemyCollection,
    pub zones: ZoneStore,
    pub connections: ConnectionManager,
    /// Ids of every enemy ever defeated; prevents respawn from stale data.
    pub defeated_enemies: HashSet<EnemyId>,
    pub visited_zones: HashSet<String>,
    pub statistics: GameStatistics,
    pub scheduler: Scheduler,
    /// Set while a delayed player attack is outstanding; suppresses enemy
    /// turns until the hit resolves.
    pub player_just_attacked: bool,
    pub turn_count: u64,
    /// Turns left before a pitfall victim may ascend again.
    pub pitfall_turns_remaining: u32,
    pub game_over: bool,

    #[serde(skip)]
    pub events: EventQueue,
    /// The charge item currently selected for targeting, if any.
    #[serde(skip)]
    pub selected_charge: Option<crate::combat::ChargeKind>,
    /// Transient two-tap charge selection; never survives a save.
    #[serde(skip)]
    pub pending_charge: Option<PendingCharge>,
    /// Placement-mode whitelist, present while bomb placement is armed.
    #[serde(skip)]
    pub bomb_placement: Option<Vec<Position>>,
    /// Enemies awaiting transfer to the zone below after a pitfall fall.
    #[serde(skip)]
    pub pending_falls: Vec<(ZoneCoord, Enemy)>,
}

impl GameState {
    /// Starts a new game at the world origin.
    pub fn new(world_seed: u64) -> Self {
        info!("starting new game with world seed {world_seed}");
        let origin = ZoneCoord::surface(0, 0);
        let mut state = Self::bare(world_seed, Grid::filled(Tile::Floor), origin);
        state.connections.generate_chunk_connections(0, 0);
        state.enter_zone(origin, Entry::new(EntryKind::Spawn, Position::center()));
        state
    }

    /// A state wrapping a hand-built grid, for tests and tools. No zones are
    /// generated; the given grid is the active surface zone at the origin.
    pub fn new_with_grid(grid: Grid) -> Self {
        Self::bare(0, grid, ZoneCoord::surface(0, 0))
    }

    fn bare(world_seed: u64, grid: Grid, zone: ZoneCoord) -> Self {
        Self {
            world_seed,
            grid,
            player: PlayerState::new(Position::center(), zone),
            enemies: EnemyCollection::new(),
            zones: ZoneStore::new(),
            connections: ConnectionManager::new(world_seed),
            defeated_enemies: HashSet::new(),
            visited_zones: HashSet::new(),
            statistics: GameStatistics::default(),
            scheduler: Scheduler::new(),
            player_just_attacked: false,
            turn_count: 0,
            pitfall_turns_remaining: 0,
            game_over: false,
            events: EventQueue::new(),
            selected_charge: None,
            pending_charge: None,
            bomb_placement: None,
            pending_falls: Vec::new(),
        }
    }

    /// Borrows the combat-facing slice of this state for one pass.
    pub fn combat_ctx(&mut self) -> CombatCtx<'_> {
        let current_zone = self.player.current_zone;
        CombatCtx {
            grid: &mut self.grid,
            player: &mut self.player,
            enemies: &mut self.enemies,
            zones: &mut self.zones,
            defeated: &mut self.defeated_enemies,
            events: &mut self.events,
            statistics: &mut self.statistics,
            scheduler: &mut self.scheduler,
            player_just_attacked: &mut self.player_just_attacked,
            current_zone,
            fallen: &mut self.pending_falls,
        }
    }

    /// The full post-action turn-resolution pass, in its fixed order.
    pub fn resolve_turn(&mut self) {
        if self.game_over {
            return;
        }
        self.turn_count += 1;
        self.statistics.turns_taken += 1;

        let mut ctx = self.combat_ctx();
        ctx.tick_bombs_and_explode();
        ctx.run_enemy_phase();
        ctx.check_collisions();
        self.transfer_fallen();

        if self.pitfall_turns_remaining > 0 {
            self.pitfall_turns_remaining -= 1;
        }
        self.tick_needs();

        if self.player.health <= 0 {
            self.game_over = true;
        }
    }

    /// Advances the logical clock, applying any delayed effects that come
    /// due. A bow hit clears the enemy-turn suppression exactly once and
    /// then runs the phases that were held back.
    pub fn advance_time(&mut self, delta_ms: u64) {
        for effect in self.scheduler.advance(delta_ms) {
            match effect {
                DelayedEffect::BowHit { target, enemy } => {
                    let mut ctx = self.combat_ctx();
                    ctx.resolve_ranged_kill(enemy, target);
                    *ctx.player_just_attacked = false;
                    ctx.run_enemy_phase();
                    ctx.check_collisions();
                    self.transfer_fallen();
                }
                DelayedEffect::TrailPuff { position } => {
                    self.events.emit(GameEvent::AnimationRequested {
                        name: "puff".to_string(),
                        position,
                        waypoints: Vec::new(),
                    });
                }
            }
        }
        if self.player.health <= 0 {
            self.game_over = true;
        }
    }

    /// Moves enemies that fell through pitfalls into their destination
    /// zones' persisted records.
    fn transfer_fallen(&mut self) {
        let falls = std::mem::take(&mut self.pending_falls);
        for (coord, mut enemy) in falls {
            self.ensure_zone_record(coord);
            let Some(record) = self.zones.get_mut(coord) else {
                continue;
            };
            let taken: Vec<Position> = record.enemies.iter().map(|e| e.position()).collect();
            let spawn = record
                .grid
                .positions_where(Tile::is_walkable)
                .into_iter()
                .find(|p| !taken.contains(p));
            if let Some(spawn) = spawn {
                enemy.move_to(spawn);
                record.enemies.push(enemy);
            }
        }
    }

    /// Hunger and thirst drain slowly; an empty gauge costs health.
    fn tick_needs(&mut self) {
        if self.turn_count % NEED_DECAY_TURNS != 0 {
            return;
        }
        self.player.hunger = (self.player.hunger - 1).max(0);
        self.player.thirst = (self.player.thirst - 1).max(0);
        if self.player.hunger == 0 || self.player.thirst == 0 {
            self.player.take_damage(1);
            self.events
                .message("You are wasting away.", MessageImportance::Warning);
        }
        self.events.emit(GameEvent::StatsChanged);
    }

    /// Starts the post-pitfall survival counter.
    pub(crate) fn start_pitfall_survival(&mut self) {
        self.pitfall_turns_remaining = PITFALL_SURVIVAL_TURNS;
    }

    /// Whether a port-based ascent is currently allowed.
    pub fn can_ascend(&self) -> bool {
        self.pitfall_turns_remaining == 0
    }

    /// Serializes the whole state to JSON.
    pub fn to_json(&self) -> ZonefallResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Restores a state from JSON produced by [`GameState::to_json`].
    pub fn from_json(json: &str) -> ZonefallResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Writes the save to a file.
    pub fn save_to_file(&self, path: &Path) -> ZonefallResult<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Loads a save from a file.
    pub fn load_from_file(path: &Path) -> ZonefallResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}
