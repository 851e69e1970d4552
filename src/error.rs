//! Error types for pressure sources and settings.

use std::io;

use thiserror::Error;

use crate::data::Mode;

/// Errors that can occur when reading a pressure source.
#[derive(Debug, Error)]
pub enum ReadError {
    /// The pressure file could not be opened.
    #[error("failed to open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: io::Error,
    },

    /// Rewinding or reading the pressure file failed.
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    /// The file did not report one of the expected modes.
    #[error("{path}: expecting full+some values, missing '{missing}'")]
    SchemaMismatch { path: String, missing: Mode },
}

/// Errors raised while validating settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Threshold outside of 1..=99.
    #[error("threshold must be between 1 and 99, got {0}")]
    Threshold(i64),

    /// Interval not one of the supported windows.
    #[error("interval must be one of 1, 3, 10, 60, 300 seconds, got {0}")]
    Interval(u64),
}
