//! Time bookkeeping for the snow animation.

use std::time::{Duration, Instant};

/// Tracks when the snow was created and when its options last changed.
///
/// All reads take `now` explicitly so callers (and tests) control the clock.
#[derive(Debug, Clone, Copy)]
pub struct SnowClock {
    /// Time the snow was created.
    start: Instant,
    /// Time of the last option change.
    changed: Instant,
}

impl SnowClock {
    /// Create a clock whose start and last change are both `now`.
    pub fn new(now: Instant) -> Self {
        Self {
            start: now,
            changed: now,
        }
    }

    /// Seconds since creation.
    pub fn since_start(&self, now: Instant) -> f64 {
        elapsed(self.start, now).as_secs_f64()
    }

    /// Seconds since the last option change.
    pub fn since_change(&self, now: Instant) -> f64 {
        elapsed(self.changed, now).as_secs_f64()
    }

    /// Record an option change and return the seconds since the previous one.
    pub fn mark_change(&mut self, now: Instant) -> f64 {
        let seconds = self.since_change(now);
        self.changed = now;
        seconds
    }
}

/// `now - then`, saturating at zero if the caller's clock runs backwards.
fn elapsed(then: Instant, now: Instant) -> Duration {
    now.saturating_duration_since(then)
}
