//! Delayed and periodic callbacks on the simulation clock
//!
//! Timers are plain data: a fire time, the round epoch they were armed in,
//! and what should happen. The round controller pops due timers each tick and
//! drops any whose epoch no longer matches, which is how a countdown or an
//! unload from an earlier round is kept from touching the current one.

use serde::{Deserialize, Serialize};

/// What a timer does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerKind {
    /// One second of the round countdown elapsed
    CountdownTick,
    /// Herdsman base speed goes up
    SpeedIncrement,
    /// Game over screen is done, back to waiting
    GameOverDelay,
    /// Grouped animals finished entering the pen
    UnloadResolve,
}

/// A pending timer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scheduled {
    /// Simulation time in seconds
    pub fire_at: f64,
    /// Round epoch at arming time
    pub epoch: u64,
    pub kind: TimerKind,
    seq: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scheduler {
    now: f64,
    pending: Vec<Scheduled>,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current simulation time in seconds
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Move the clock forward
    pub fn advance(&mut self, dt: f32) {
        self.now += f64::from(dt.max(0.0));
    }

    /// Arm a timer `delay` seconds from now
    pub fn schedule(&mut self, delay: f32, epoch: u64, kind: TimerKind) {
        let fire_at = self.now + f64::from(delay.max(0.0));
        self.schedule_at(fire_at, epoch, kind);
    }

    /// Arm a timer at an absolute time. Periodic timers re-arm from their own
    /// fire time so no period is lost when a step spans several.
    pub fn schedule_at(&mut self, fire_at: f64, epoch: u64, kind: TimerKind) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Scheduled {
            fire_at,
            epoch,
            kind,
            seq,
        });
    }

    /// Earliest due timer, ties broken by arming order
    pub fn pop_due(&mut self) -> Option<Scheduled> {
        let now = self.now;
        let index = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, timer)| timer.fire_at <= now)
            .min_by(|(_, a), (_, b)| a.fire_at.total_cmp(&b.fire_at).then(a.seq.cmp(&b.seq)))
            .map(|(index, _)| index)?;
        Some(self.pending.swap_remove(index))
    }

    pub fn pending(&self) -> &[Scheduled] {
        &self.pending
    }

    pub fn is_pending(&self, kind: TimerKind) -> bool {
        self.pending.iter().any(|timer| timer.kind == kind)
    }
}
