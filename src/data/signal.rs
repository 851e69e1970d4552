//! Signal identity, samples, and rate windows.

use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};

use crate::error::SettingsError;

/// A resource class tracked by the kernel's pressure accounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Resource {
    Cpu,
    Io,
    Memory,
}

impl Resource {
    /// All resources in display order.
    pub const ALL: [Resource; 3] = [Resource::Cpu, Resource::Io, Resource::Memory];

    /// File name under the pressure directory.
    pub fn tag(&self) -> &'static str {
        match self {
            Resource::Cpu => "cpu",
            Resource::Io => "io",
            Resource::Memory => "memory",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Stall mode: `some` tasks or `full` (all non-idle tasks) stalled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Mode {
    Full,
    Some,
}

impl Mode {
    /// Modes in display order; `full` columns come first.
    pub const ALL: [Mode; 2] = [Mode::Full, Mode::Some];

    pub fn tag(&self) -> &'static str {
        match self {
            Mode::Full => "full",
            Mode::Some => "some",
        }
    }

    /// Parse the leading token of a pressure line.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "full" => Some(Mode::Full),
            "some" => Some(Mode::Some),
            _ => None,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// One tracked signal: a resource crossed with a mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Signal {
    pub resource: Resource,
    pub mode: Mode,
}

impl Signal {
    /// All six signals, grouped by resource with `full` before `some`.
    pub const ALL: [Signal; 6] = [
        Signal::new(Resource::Cpu, Mode::Full),
        Signal::new(Resource::Cpu, Mode::Some),
        Signal::new(Resource::Io, Mode::Full),
        Signal::new(Resource::Io, Mode::Some),
        Signal::new(Resource::Memory, Mode::Full),
        Signal::new(Resource::Memory, Mode::Some),
    ];

    pub const fn new(resource: Resource, mode: Mode) -> Self {
        Self { resource, mode }
    }

    /// Position of this signal in [`Signal::ALL`].
    pub fn index(&self) -> usize {
        let r = match self.resource {
            Resource::Cpu => 0,
            Resource::Io => 1,
            Resource::Memory => 2,
        };
        let m = match self.mode {
            Mode::Full => 0,
            Mode::Some => 1,
        };
        r * 2 + m
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Padding flags apply to the whole label, e.g. `{:>11}`.
        f.pad(&format!("{}.{}", self.resource, self.mode))
    }
}

/// One parsed reading for a signal.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Sample {
    /// Cumulative stall time in microseconds.
    pub total_micros: u64,
    /// Kernel 60-second average, percent.
    pub avg60: f64,
    /// Kernel 300-second average, percent.
    pub avg300: f64,
}

/// Both mode samples from a single read of one resource file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResourceSample {
    pub resource: Resource,
    pub full: Sample,
    pub some: Sample,
}

impl ResourceSample {
    pub fn get(&self, mode: Mode) -> &Sample {
        match mode {
            Mode::Full => &self.full,
            Mode::Some => &self.some,
        }
    }
}

/// A rate window. The short windows are computed from local history; the
/// long ones come straight from the kernel averages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Window {
    S1,
    S3,
    S10,
    S60,
    S300,
}

impl Window {
    /// All windows in column order.
    pub const ALL: [Window; 5] = [Window::S1, Window::S3, Window::S10, Window::S60, Window::S300];

    pub fn secs(&self) -> u64 {
        match self {
            Window::S1 => 1,
            Window::S3 => 3,
            Window::S10 => 10,
            Window::S60 => 60,
            Window::S300 => 300,
        }
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.secs())
    }

    /// Samples to look back for locally computed windows.
    pub fn samples_back(&self) -> Option<usize> {
        match self {
            Window::S1 => Some(1),
            Window::S3 => Some(3),
            Window::S10 => Some(10),
            Window::S60 | Window::S300 => None,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Window::S1 => 0,
            Window::S3 => 1,
            Window::S10 => 2,
            Window::S60 => 3,
            Window::S300 => 4,
        }
    }

    /// Next window, wrapping from 300s back to 1s.
    pub fn next(self) -> Self {
        Window::ALL[(self.index() + 1) % Window::ALL.len()]
    }

    /// Previous window, wrapping from 1s to 300s.
    pub fn prev(self) -> Self {
        Window::ALL[(self.index() + Window::ALL.len() - 1) % Window::ALL.len()]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Window::S1 => "1s",
            Window::S3 => "3s",
            Window::S10 => "10s",
            Window::S60 => "60s",
            Window::S300 => "300s",
        }
    }
}

impl TryFrom<u64> for Window {
    type Error = SettingsError;

    fn try_from(secs: u64) -> Result<Self, Self::Error> {
        Window::ALL
            .into_iter()
            .find(|w| w.secs() == secs)
            .ok_or(SettingsError::Interval(secs))
    }
}

impl FromStr for Window {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let secs: u64 = s.trim().trim_end_matches('s').parse().map_err(|_| {
            format!("'{s}' is not a number of seconds")
        })?;
        Window::try_from(secs).map_err(|e| e.to_string())
    }
}

/// Timestamp of one sampling cycle, taken on both clocks.
#[derive(Debug, Clone, Copy)]
pub struct Stamp {
    /// Monotonic time, used for rate denominators and event ages.
    pub mono: Instant,
    /// Wall-clock time, used for labels and cooldown floors.
    pub wall: DateTime<Local>,
}

impl Stamp {
    pub fn now() -> Self {
        Self {
            mono: Instant::now(),
            wall: Local::now(),
        }
    }

    /// The same stamp moved forward on both clocks.
    #[cfg(test)]
    pub(crate) fn advanced(&self, by: Duration) -> Self {
        Self {
            mono: self.mono + by,
            wall: self.wall + chrono::Duration::from_std(by).unwrap(),
        }
    }
}
