//! Sampling cadence for the main loop.

use std::time::{Duration, Instant};

use crate::data::history::CYCLE_PERIOD;

/// Minimum time elapsed since the last sample before sampling again.
pub const SAMPLE_GATE: Duration = Duration::from_millis(900);

/// Shortest input wait, so the loop never busy-spins.
pub const MIN_WAIT: Duration = Duration::from_millis(10);

/// Decides when to sample and how long to wait for input.
///
/// Sampling is gated on elapsed time rather than aligned to the wall clock,
/// which absorbs jitter from input handling and rendering.
#[derive(Debug, Clone)]
pub struct Cadence {
    period: Duration,
    gate: Duration,
    last_sample: Option<Instant>,
}

impl Default for Cadence {
    fn default() -> Self {
        Self::new(CYCLE_PERIOD, SAMPLE_GATE)
    }
}

impl Cadence {
    pub fn new(period: Duration, gate: Duration) -> Self {
        Self {
            period,
            gate,
            last_sample: None,
        }
    }

    /// Whether a sample is due at `now`.
    pub fn is_due(&self, now: Instant) -> bool {
        self.last_sample
            .is_none_or(|last| now.saturating_duration_since(last) >= self.gate)
    }

    /// Record that a sample was taken at `now`.
    pub fn mark(&mut self, now: Instant) {
        self.last_sample = Some(now);
    }

    /// Remainder of the current period, never below [`MIN_WAIT`].
    pub fn wait(&self, now: Instant) -> Duration {
        match self.last_sample {
            Some(last) => self
                .period
                .saturating_sub(now.saturating_duration_since(last))
                .max(MIN_WAIT),
            None => MIN_WAIT,
        }
    }
}
