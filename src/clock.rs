//! Elapsed-time sources for the measurement loop.

use std::time::Instant;

/// A monotonic millisecond clock with start/elapsed semantics.
///
/// The measurement loop only ever calls [`Clock::start`] once and then polls
/// [`Clock::elapsed_millis`], so implementations are free to be coarse.
pub trait Clock {
    /// Record the reference instant.
    fn start(&mut self);

    /// Whole milliseconds since the last `start()`. Never decreases.
    fn elapsed_millis(&self) -> u64;
}

/// Wall-clock stopwatch backed by [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    started: Instant,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for Stopwatch {
    fn start(&mut self) {
        self.started = Instant::now();
    }

    fn elapsed_millis(&self) -> u64 {
        // Saturate rather than truncate; a run longer than u64::MAX ms is not a concern.
        u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}
