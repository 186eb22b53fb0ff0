//! Rate-limited diagnostics
//!
//! Grid bounds violations can fire for every cell of every frame, so they go
//! through a [`Throttle`] that lets one message through per window.

use std::time::{Duration, Instant};

/// Default window between two throttled messages
pub const WARN_INTERVAL: Duration = Duration::from_millis(500);

/// Lets at most one event through per interval
#[derive(Clone, Debug)]
pub struct Throttle {
    interval: Duration,
    last: Option<Instant>,
    suppressed: u64,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
            suppressed: 0,
        }
    }

    /// Returns `Some(suppressed_count)` when the caller may log now
    pub fn check(&mut self) -> Option<u64> {
        self.check_at(Instant::now())
    }

    fn check_at(&mut self, now: Instant) -> Option<u64> {
        match self.last {
            Some(last) if now.duration_since(last) < self.interval => {
                self.suppressed += 1;
                None
            }
            _ => {
                self.last = Some(now);
                Some(std::mem::take(&mut self.suppressed))
            }
        }
    }
}

impl Default for Throttle {
    fn default() -> Self {
        Self::new(WARN_INTERVAL)
    }
}
