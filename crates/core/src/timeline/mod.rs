//! Time sources for playback.
//!
//! Block advancement is driven by one-shot timers handed out by a
//! [`TimerHost`]; movement interpolation samples [`TimerHost::now`]. The host
//! decides when timers fire and delivers them back to the player, so both
//! clocks stay on the same logical thread as the frame loop.

use std::fmt;

/// Opaque handle for a scheduled one-shot timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

/// Capability set the player needs from the host's clock and timer facility.
pub trait TimerHost {
    /// Current time in seconds.
    fn now(&self) -> f64;

    /// Schedules a one-shot timer that fires `seconds` from now.
    fn schedule(&mut self, seconds: f64) -> TimerId;

    /// Cancels a pending timer. Returns `false` if it already fired or was
    /// never scheduled.
    fn cancel(&mut self, id: TimerId) -> bool;
}

#[derive(Debug, Clone)]
struct PendingTimer {
    id: TimerId,
    due: f64,
}

/// Deterministic clock whose time only moves when told to.
#[derive(Debug, Default, Clone)]
pub struct ManualClock {
    time_seconds: f64,
    next_id: u64,
    pending: Vec<PendingTimer>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves time forward to `time_seconds`. Time never runs backwards.
    pub fn set_now(&mut self, time_seconds: f64) {
        self.time_seconds = self.time_seconds.max(time_seconds);
    }

    pub fn advance(&mut self, delta: f64) {
        self.set_now(self.time_seconds + delta.max(0.0));
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn next_due(&self) -> Option<f64> {
        self.earliest().map(|index| self.pending[index].due)
    }

    /// Removes and returns the earliest timer due at or before `until`,
    /// moving the clock to its due time. Ties fire in scheduling order.
    pub fn pop_due(&mut self, until: f64) -> Option<TimerId> {
        let index = self.earliest()?;
        if self.pending[index].due > until {
            return None;
        }
        let timer = self.pending.remove(index);
        self.set_now(timer.due);
        Some(timer.id)
    }

    fn earliest(&self) -> Option<usize> {
        self.pending
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| a.due.total_cmp(&b.due).then(a.id.cmp(&b.id)))
            .map(|(index, _)| index)
    }
}

impl TimerHost for ManualClock {
    fn now(&self) -> f64 {
        self.time_seconds
    }

    fn schedule(&mut self, seconds: f64) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.push(PendingTimer {
            id,
            due: self.time_seconds + seconds.max(0.0),
        });
        id
    }

    fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|timer| timer.id != id);
        self.pending.len() != before
    }
}
