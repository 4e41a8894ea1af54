//! # Schedule Module
//!
//! Delayed-effect scheduling over an injected logical clock.
//!
//! The engine has no real concurrency; a small number of gameplay effects
//! (bow hits, paced trail effects) resolve after a fixed delay. Rather than
//! wall-clock timers, the scheduler runs on logical milliseconds advanced by
//! the driver, which makes every delay deterministic and mockable in tests.
//! Tasks carry an id usable as a cancellation token.

use crate::game::{EnemyId, Position};
use serde::{Deserialize, Serialize};

/// A gameplay effect applied once its delay elapses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DelayedEffect {
    /// A bow shot lands: resolve the hit and re-enable enemy turns.
    BowHit {
        target: Position,
        enemy: Option<EnemyId>,
    },
    /// A paced cosmetic trail puff at a position.
    TrailPuff { position: Position },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ScheduledTask {
    id: u64,
    due_ms: u64,
    effect: DelayedEffect,
}

/// Pending delayed effects ordered by due time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scheduler {
    now_ms: u64,
    next_id: u64,
    pending: Vec<ScheduledTask>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current logical time in milliseconds.
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Schedules an effect `delay_ms` from now; returns a cancellation token.
    pub fn schedule(&mut self, delay_ms: u64, effect: DelayedEffect) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.pending.push(ScheduledTask {
            id,
            due_ms: self.now_ms + delay_ms,
            effect,
        });
        id
    }

    /// Cancels a pending task by token. Returns true if it was still pending.
    pub fn cancel(&mut self, id: u64) -> bool {
        let before = self.pending.len();
        self.pending.retain(|t| t.id != id);
        before != self.pending.len()
    }

    /// Advances logical time and returns all effects that became due, in
    /// due-time order.
    pub fn advance(&mut self, delta_ms: u64) -> Vec<DelayedEffect> {
        self.now_ms += delta_ms;
        let now = self.now_ms;
        let mut due: Vec<ScheduledTask> = Vec::new();
        self.pending.retain(|t| {
            if t.due_ms <= now {
                due.push(t.clone());
                false
            } else {
                true
            }
        });
        due.sort_by_key(|t| (t.due_ms, t.id));
        due.into_iter().map(|t| t.effect).collect()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}
