//! Threshold-crossing detection with per-signal cooldowns.
//!
//! Each cycle the rate of every signal for the selected window is compared
//! against the threshold. A (signal, window) pair is *armed* while the wall
//! clock is at or past its floor and *cooling* before it; firing moves the
//! floor to `now + window`.
//!
//! Crossings are grouped per resource: a `full` and `some` crossing of the
//! same resource in one cycle share a single [`Event`], with the `full`
//! column padded when only `some` crossed.

use std::collections::{HashMap, VecDeque};
use std::io::{self, Write};
use std::time::Instant;

use chrono::{DateTime, Local};
use tracing::info;

use super::history::RateTable;
use super::signal::{Mode, Resource, Signal, Stamp, Window};
use crate::app::Threshold;

/// Maximum number of events kept in the log.
pub const MAX_EVENTS: usize = 1000;

/// Rates are rounded to this many decimal places before comparison.
const ROUND_DIGITS: i32 = 3;

/// An immutable record of one or two threshold crossings of a resource.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Monotonic creation time, for age display.
    pub mono: Instant,
    /// Wall-clock creation time, used in the label.
    pub wall: DateTime<Local>,
    pub resource: Resource,
    /// Rendered description, starting with the wall-clock timestamp.
    pub description: String,
}

/// Detects crossings and tracks cooldown floors.
#[derive(Debug, Clone, Default)]
pub struct EventDetector {
    floors: HashMap<(Signal, Window), DateTime<Local>>,
}

impl EventDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `signal` may fire on `window` at `now`. The boundary is inclusive.
    pub fn is_armed(&self, signal: Signal, window: Window, now: DateTime<Local>) -> bool {
        self.floors.get(&(signal, window)).is_none_or(|floor| now >= *floor)
    }

    /// Earliest time `signal` may fire again on `window`, if it ever fired.
    pub fn floor(&self, signal: Signal, window: Window) -> Option<DateTime<Local>> {
        self.floors.get(&(signal, window)).copied()
    }

    /// Evaluate one cycle of rates, returning the events fired in resource order.
    pub fn detect(
        &mut self,
        stamp: &Stamp,
        rates: &RateTable,
        threshold: Threshold,
        window: Window,
    ) -> Vec<Event> {
        let mut events = Vec::new();

        for resource in Resource::ALL {
            let mut description = String::new();
            let mut full_crossed = false;

            for mode in Mode::ALL {
                let signal = Signal::new(resource, mode);
                let Some(rate) = rates.get(signal, window) else {
                    continue;
                };
                if !threshold.admits(round_rate(rate)) || !self.is_armed(signal, window, stamp.wall) {
                    continue;
                }

                if description.is_empty() {
                    description.push_str(&stamp.wall.format("%m-%d %H:%M:%S%.3f").to_string());
                }
                let column = format!(" {:>11} {:7.3}", signal, rate);
                match mode {
                    Mode::Full => full_crossed = true,
                    Mode::Some if !full_crossed => {
                        description.push_str(&" ".repeat(column.len()));
                    }
                    Mode::Some => {}
                }
                description.push_str(&column);

                self.floors.insert((signal, window), stamp.wall + cooldown(window));
            }

            if !description.is_empty() {
                description.push_str(&format!("   >={} i={}", threshold, window.secs()));
                info!(event = %description, "pressure event");
                events.push(Event {
                    mono: stamp.mono,
                    wall: stamp.wall,
                    resource,
                    description,
                });
            }
        }

        events
    }
}

fn cooldown(window: Window) -> chrono::Duration {
    chrono::Duration::seconds(window.secs() as i64)
}

/// Round a rate the way detection compares it.
pub fn round_rate(rate: f64) -> f64 {
    let scale = 10f64.powi(ROUND_DIGITS);
    (rate * scale).round() / scale
}

/// Newest-first log of events, capped at [`MAX_EVENTS`].
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: VecDeque<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an event at the head, evicting the oldest beyond the cap.
    pub fn push(&mut self, event: Event) {
        self.events.push_front(event);
        self.events.truncate(MAX_EVENTS);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events newest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Event> + ExactSizeIterator {
        self.events.iter()
    }

    /// Write every event as a plain line, oldest first.
    pub fn write_plain<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for event in self.events.iter().rev() {
            writeln!(out, "{}", event.description)?;
        }
        Ok(())
    }
}
