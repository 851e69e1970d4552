//! Rolling sample history and short-window rate calculations.

use std::collections::VecDeque;
use std::time::Duration;

use super::signal::{Sample, Signal, Stamp, Window};

/// Maximum number of samples kept per signal (and in the shared timeline).
pub const CAPACITY: usize = 11;

/// Nominal time between sampling cycles.
pub const CYCLE_PERIOD: Duration = Duration::from_secs(1);

/// Largest cycle-to-cycle gap still considered contiguous (1.25 periods).
pub const MAX_CYCLE_GAP: Duration = Duration::from_millis(1250);

/// Newest-first history of samples for one signal.
#[derive(Debug, Clone, Default)]
pub struct SampleHistory {
    samples: VecDeque<Sample>,
}

impl SampleHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new sample as the most recent entry.
    pub fn ingest(&mut self, sample: Sample) {
        self.samples.push_front(sample);
        self.samples.truncate(CAPACITY);
    }

    /// Drop everything beyond the first `len` samples.
    pub fn truncate(&mut self, len: usize) {
        self.samples.truncate(len);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn latest(&self) -> Option<&Sample> {
        self.samples.front()
    }

    /// Stall percentage over `window`.
    ///
    /// Short windows need `n + 1` samples to look `n` cycles back and are
    /// `None` until then. Long windows report the kernel averages of the
    /// latest sample.
    pub fn rate(&self, timeline: &Timeline, window: Window) -> Option<f64> {
        let Some(back) = window.samples_back() else {
            let latest = self.latest()?;
            return Some(match window {
                Window::S60 => latest.avg60,
                _ => latest.avg300,
            });
        };

        if self.samples.len() <= back {
            return None;
        }

        let delta_micros = self.samples[0].total_micros.saturating_sub(self.samples[back].total_micros);
        let delta_nanos = timeline.elapsed_back(back)?.as_nanos();
        if delta_nanos == 0 {
            return Some(0.0);
        }

        Some(100.0 * 1000.0 * delta_micros as f64 / delta_nanos as f64)
    }
}

/// Newest-first cycle timestamps shared by all signals.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    stamps: VecDeque<Stamp>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, stamp: Stamp) {
        self.stamps.push_front(stamp);
        self.stamps.truncate(CAPACITY);
    }

    pub fn truncate(&mut self, len: usize) {
        self.stamps.truncate(len);
    }

    pub fn len(&self) -> usize {
        self.stamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stamps.is_empty()
    }

    pub fn latest(&self) -> Option<&Stamp> {
        self.stamps.front()
    }

    /// Monotonic time between the newest stamp and the one `back` cycles ago.
    pub fn elapsed_back(&self, back: usize) -> Option<Duration> {
        let newest = self.stamps.front()?;
        let older = self.stamps.get(back)?;
        Some(newest.mono.saturating_duration_since(older.mono))
    }

    /// Number of leading stamps usable for rate computation.
    ///
    /// Counts from the newest stamp and stops at the first gap larger than
    /// [`MAX_CYCLE_GAP`]. Returns 0 only for an empty timeline.
    pub fn valid_count(&self) -> usize {
        if self.stamps.is_empty() {
            return 0;
        }

        let mut count = 1;
        for (newer, older) in self.stamps.iter().zip(self.stamps.iter().skip(1)) {
            if newer.mono.saturating_duration_since(older.mono) > MAX_CYCLE_GAP {
                break;
            }
            count += 1;
        }
        count.min(CAPACITY)
    }
}

/// Rates for every signal and window from one cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateTable {
    rates: [[Option<f64>; 5]; 6],
}

impl RateTable {
    /// Compute all rates from per-signal histories indexed like [`Signal::ALL`].
    pub fn compute(histories: &[SampleHistory], timeline: &Timeline) -> Self {
        let mut table = Self::default();
        for signal in Signal::ALL {
            let Some(history) = histories.get(signal.index()) else {
                continue;
            };
            for window in Window::ALL {
                table.set(signal, window, history.rate(timeline, window));
            }
        }
        table
    }

    pub fn get(&self, signal: Signal, window: Window) -> Option<f64> {
        self.rates[signal.index()][window.index()]
    }

    pub fn set(&mut self, signal: Signal, window: Window, rate: Option<f64>) {
        self.rates[signal.index()][window.index()] = rate;
    }
}
