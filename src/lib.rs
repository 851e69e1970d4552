//! # psistat
//!
//! A live terminal monitor for Linux Pressure Stall Information (PSI).
//!
//! Every second the kernel's `/proc/pressure/{cpu,io,memory}` files are read,
//! short-window stall rates (1s, 3s, 10s) are computed from the cumulative
//! stall counters, and the kernel's own 60s/300s averages are shown alongside.
//! When the rate for the selected window reaches the threshold, an event is
//! logged; each (signal, window) pair then cools down for the length of the
//! window before it can fire again.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Application                          │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌─────────┐ │
//! │  │  app    │───▶│   data   │───▶│   ui    │───▶│ Terminal│ │
//! │  │ (state) │    │ (engine) │    │(render) │    │         │ │
//! │  └────┬────┘    └────┬─────┘    └─────────┘    └─────────┘ │
//! │       ▲              │                                      │
//! │  ┌────┴────┐    ┌────▼────┐                                 │
//! │  │ events  │    │ source  │◀── /proc/pressure/{cpu,io,mem}  │
//! │  │ (keys)  │    │ (read)  │                                 │
//! │  └─────────┘    └─────────┘                                 │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: Monitor state (threshold, interval, brief, help, quit) and
//!   the action dispatch that mutates it
//! - **[`source`]**: The [`PressureSource`] trait and the file-backed reader
//! - **[`data`]**: Sample history, rate computation, event detection, and the
//!   [`Engine`] that runs one cycle at a time
//! - **[`events`]**: Maps key presses to [`Action`]s
//! - **[`cadence`]**: When to sample and how long to wait for input
//! - **[`ui`]**: ratatui rendering
//! - **[`config`]** / **[`logging`]**: Layered settings and tracing setup
//!
//! ## Usage
//!
//! ```bash
//! # Events when any 10s rate reaches 20%
//! psistat
//!
//! # 1-second events at 50%, brief event log
//! psistat --threshold-pct 50 --interval 1 --brief
//! ```
//!
//! ### As a library
//!
//! ```no_run
//! use psistat::{Engine, MonitorState, Stamp};
//!
//! let sources = psistat::source::open_all("/proc/pressure")?;
//! let mut engine = Engine::new(sources);
//! let state = MonitorState::default();
//!
//! engine.cycle(Stamp::now(), &state)?;
//! for event in engine.log().iter() {
//!     println!("{}", event.description);
//! }
//! # Ok::<(), psistat::error::ReadError>(())
//! ```

pub mod app;
pub mod cadence;
pub mod config;
pub mod data;
pub mod error;
pub mod events;
pub mod logging;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use app::{Action, App, MonitorState, Threshold};
pub use data::{Engine, Event, EventLog, Mode, Resource, Signal, Stamp, Window};
pub use error::{ReadError, SettingsError};
pub use source::{PressureFile, PressureSource};
