//! Sampling, aggregation, and event detection.
//!
//! This module is independent of the terminal: it reads pressure sources,
//! keeps rolling histories, computes rates, and raises events.
//!
//! ## Submodules
//!
//! - [`signal`]: Resource/mode identity, samples, windows, and cycle stamps
//! - [`history`]: Newest-first sample history, shared timeline, rate table
//! - [`detector`]: Threshold detection with cooldown floors, and the event log
//! - [`engine`]: The owned [`Engine`] that runs one cycle at a time
//! - [`duration`]: Compact age formatting for event lines
//!
//! ## Data Flow
//!
//! ```text
//! PressureSource::read() x3
//!        │
//!        ▼
//! SampleHistory::ingest() + Timeline::push()
//!        │
//!        ├──▶ Timeline::valid_count() (truncate past cycle gaps)
//!        │
//!        ▼
//! RateTable::compute()
//!        │
//!        ▼
//! EventDetector::detect() ──▶ EventLog::push()
//! ```

pub mod detector;
pub mod duration;
pub mod engine;
pub mod history;
pub mod signal;

pub use detector::{round_rate, Event, EventDetector, EventLog, MAX_EVENTS};
pub use engine::Engine;
pub use history::{RateTable, SampleHistory, Timeline, CAPACITY};
pub use signal::{Mode, Resource, ResourceSample, Sample, Signal, Stamp, Window};
