//! Timed ability windows
//!
//! Every window (invincibility, slow time, final flight, ...) is an entry in
//! this queue holding the time at which it ends. A window is active exactly
//! while its end is pending, so dropping the queue cancels everything.

use serde::{Deserialize, Serialize};

/// Effects that last for a fixed amount of time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimedEffect {
    /// Short grace period after a shield or a spare life absorbed a hit
    Invincibility,
    /// Player-triggered invisibility
    Invisibility,
    /// Obstacles and the body slow down
    SlowTime,
    /// Revival flight with full invincibility
    FinalFlight,
    /// Clone materializing after a revival
    CloneWindow,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Scheduled {
    ends_at: f64,
    effect: TimedEffect,
}

/// Queue of pending window ends, keyed by its own time base
#[derive(Debug, Clone, Default)]
pub struct Schedule {
    now: f64,
    /// Sorted by `ends_at`
    pending: Vec<Scheduled>,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open (or reopen) `effect` for `duration` seconds from now
    pub fn start(&mut self, effect: TimedEffect, duration: f32) {
        self.cancel(effect);
        let ends_at = self.now + duration as f64;
        let index = self.pending.partition_point(|s| s.ends_at <= ends_at);
        self.pending.insert(index, Scheduled { ends_at, effect });
    }

    /// Close `effect` immediately without reporting it as expired
    pub fn cancel(&mut self, effect: TimedEffect) {
        self.pending.retain(|s| s.effect != effect);
    }

    pub fn is_active(&self, effect: TimedEffect) -> bool {
        self.pending.iter().any(|s| s.effect == effect)
    }

    /// Seconds until `effect` ends, if it is active
    pub fn remaining(&self, effect: TimedEffect) -> Option<f32> {
        self.pending
            .iter()
            .find(|s| s.effect == effect)
            .map(|s| (s.ends_at - self.now).max(0.0) as f32)
    }

    /// Move time forward and return the effects that ended, in order
    pub fn advance(&mut self, dt: f32) -> Vec<TimedEffect> {
        self.now += dt.max(0.0) as f64;
        let due = self.pending.partition_point(|s| s.ends_at <= self.now);
        self.pending.drain(..due).map(|s| s.effect).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
