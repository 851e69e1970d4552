//! Tracing subscriber initialization.
//!
//! The terminal belongs to the display, so logs are only written when a log
//! file is configured. The filter comes from `PSISTAT_LOG` (e.g.
//! `psistat=debug`), defaulting to `info`.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directives.
pub const LOG_ENV: &str = "PSISTAT_LOG";

/// Build the filter from [`LOG_ENV`], falling back to `info`.
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber, appending to `log_file` if given.
///
/// Must be called at most once, before the terminal enters raw mode.
pub fn init(log_file: Option<&Path>) -> Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {}", e))?;

    tracing::info!(path = %path.display(), "logging initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_log_file_is_a_no_op() {
        assert!(init(None).is_ok());
    }

    #[test]
    fn test_unwritable_log_file_errors() {
        let err = init(Some(Path::new("/nonexistent/dir/psistat.log"))).unwrap_err();
        assert!(err.to_string().contains("failed to open log file"));
    }
}
