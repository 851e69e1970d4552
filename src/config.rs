//! Layered settings.
//!
//! Sources, lowest priority first: built-in defaults, an optional TOML file,
//! `PSISTAT_*` environment variables, then command-line flags.
//!
//! ```toml
//! threshold = 25
//! interval = 3
//! brief = true
//! pressure_dir = "/proc/pressure"
//! log_file = "/tmp/psistat.log"
//! dump_pause = true
//! dump_on_exit = false
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ::config::{Config, Environment, File};
use serde::Deserialize;

use crate::app::{MonitorState, Threshold};
use crate::data::Window;
use crate::source::PRESSURE_DIR;

/// Values given on the command line; `None` leaves lower layers in effect.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub threshold: Option<u8>,
    pub interval: Option<u64>,
    pub brief: Option<bool>,
    pub pressure_dir: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
    pub dump_pause: Option<bool>,
    pub dump_on_exit: Option<bool>,
}

/// Raw settings as deserialized from all layers.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub threshold: i64,
    pub interval: u64,
    pub brief: bool,
    pub pressure_dir: PathBuf,
    pub log_file: Option<PathBuf>,
    /// Wait for Enter after a dump before returning to the display.
    pub dump_pause: bool,
    /// Print the event log after quitting.
    pub dump_on_exit: bool,
}

impl Settings {
    /// Load and merge all layers.
    pub fn load(file: Option<&Path>, overrides: &Overrides) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("threshold", 20)?
            .set_default("interval", 10)?
            .set_default("brief", false)?
            .set_default("pressure_dir", PRESSURE_DIR)?
            .set_default("dump_pause", true)?
            .set_default("dump_on_exit", false)?;

        if let Some(path) = file {
            builder = builder.add_source(File::from(path).required(true));
        }

        let config = builder
            .add_source(Environment::with_prefix("PSISTAT"))
            .set_override_option("threshold", overrides.threshold.map(i64::from))?
            .set_override_option("interval", overrides.interval)?
            .set_override_option("brief", overrides.brief)?
            .set_override_option("pressure_dir", path_string(&overrides.pressure_dir))?
            .set_override_option("log_file", path_string(&overrides.log_file))?
            .set_override_option("dump_pause", overrides.dump_pause)?
            .set_override_option("dump_on_exit", overrides.dump_on_exit)?
            .build()
            .context("failed to load settings")?;

        config.try_deserialize().context("invalid settings")
    }

    /// Validate into the initial monitor state.
    pub fn initial_state(&self) -> Result<MonitorState> {
        Ok(MonitorState {
            threshold: Threshold::new(self.threshold)?,
            event_interval: Window::try_from(self.interval)?,
            brief: self.brief,
            ..MonitorState::default()
        })
    }
}

fn path_string(path: &Option<PathBuf>) -> Option<String> {
    path.as_ref().map(|p| p.display().to_string())
}
