//! # Zonefall
//!
//! A grid-based roguelike engine: the player navigates a 9x9 tile grid across
//! a procedurally generated, infinite 2D zone graph with interior and
//! underground sub-dimensions, fighting enemies, collecting items, and
//! triggering environmental effects (bombs, pitfalls, charge items).
//!
//! ## Architecture Overview
//!
//! The engine is headless and organized around a handful of subsystems:
//!
//! - **Game State**: central state (grid, player, enemies, zone store) and
//!   the synchronous turn-resolution pipeline
//! - **Generation**: deterministic zone connectivity and zone content
//! - **Zone System**: the dimension/depth transition state machine with
//!   verbatim zone persistence
//! - **Combat**: collision sweep, defeat/combo bookkeeping, bombs, and
//!   geometric charge actions
//! - **Interaction**: tap dispatch with strict precedence and BFS auto-pathing
//!
//! Rendering, audio, and raw input are external collaborators: the core emits
//! structured [`GameEvent`]s and consumes normalized grid taps and symbolic
//! key names.

pub mod combat;
pub mod game;
pub mod generation;
pub mod input;
pub mod interaction;
pub mod items;
pub mod zone;

pub use game::{
    Dimension, Direction, Enemy, EnemyCollection, EnemyId, EnemyKind, EventQueue, GameEvent,
    GameState, GameStatistics, Grid, MessageImportance, PlayerState, PortKind, Position,
    Scheduler, Tile, ZoneCoord,
};

pub use combat::{ChargeKind, DefeatInitiator, PendingCharge};
pub use generation::{ConnectionManager, DefaultZoneGenerator, ZoneConnections, ZoneGenerator};
pub use input::PlayerInput;
pub use items::{FoodKind, Item, ItemKind};
pub use zone::{Entry, EntryKind, ZoneRecord, ZoneStore};

/// Core error type for the Zonefall engine.
#[derive(thiserror::Error, Debug)]
pub enum ZonefallError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Game state is invalid
    #[error("Invalid game state: {0}")]
    InvalidState(String),

    /// Action cannot be performed
    #[error("Invalid action: {0}")]
    InvalidAction(String),

    /// Zone or connectivity generation failed
    #[error("Generation failed: {0}")]
    GenerationFailed(String),
}

/// Result type used throughout the Zonefall codebase.
pub type ZonefallResult<T> = Result<T, ZonefallError>;

/// Version information for the engine.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Game configuration constants.
pub mod config {
    /// Side length of every zone grid, in tiles.
    pub const GRID_SIZE: i32 = 9;

    /// Number of qualifying actions after placement before a bomb detonates.
    pub const BOMB_FUSE_ACTIONS: u8 = 2;

    /// Upper bound on bomb-induced knockback, in tiles.
    pub const MAX_KNOCKBACK_STEPS: u32 = 8;

    /// Maximum reach of bishop-spear and knight charges.
    pub const CHARGE_RANGE: i32 = 5;

    /// Delay between loosing a bow shot and the hit resolving.
    pub const BOW_HIT_DELAY_MS: u64 = 300;

    /// Spacing between successive dash trail puffs on the logical clock.
    pub const TRAIL_PUFF_INTERVAL_MS: u64 = 40;

    /// Turns the player must survive after a pitfall before ascending.
    pub const PITFALL_SURVIVAL_TURNS: u32 = 3;

    /// Number of main inventory slots.
    pub const INVENTORY_SLOTS: usize = 6;

    /// Number of radial (secondary stash) slots.
    pub const RADIAL_SLOTS: usize = 8;

    /// Inclusive lower bound for an exit coordinate along a zone edge.
    pub const EXIT_MIN: i32 = 3;

    /// Inclusive upper bound for an exit coordinate along a zone edge.
    pub const EXIT_MAX: i32 = GRID_SIZE - 4;

    /// Zones within this Chebyshev distance of the origin require two exits.
    pub const NEAR_ORIGIN_RADIUS: i32 = 2;

    /// Default player starting health.
    pub const DEFAULT_PLAYER_HEALTH: i32 = 10;

    /// Hunger and thirst gauges start (and cap) at this value.
    pub const NEED_GAUGE_MAX: i32 = 100;

    /// One point of hunger and thirst drains every this many turns.
    pub const NEED_DECAY_TURNS: u64 = 10;
}
