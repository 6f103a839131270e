//! Error types for reporting, loading and discovery.
//!
//! Point-level failures never show up here: the engine turns them into report lines. These errors describe
//! problems with the machinery around the tests (a broken sink, an unreadable directory, a bad manifest).

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while writing the TAP stream.
#[derive(Debug, Error)]
pub enum TapError {
    /// The sink refused a write or a flush. There is no recovery from this.
    #[error("failed to write TAP output: {0}")]
    Io(#[from] std::io::Error),

    /// A line was emitted after `Bail out!`, which must be the last line of a report.
    #[error("TAP stream already closed by a bail out")]
    StreamClosed,
}

/// Errors raised by a [`PlanLoader`](crate::discovery::PlanLoader) for a single test file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {file}: {source}")]
    Io {
        file: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML syntax in {file}: {error}")]
    Manifest {
        file: PathBuf,
        error: toml::de::Error,
    },

    #[error("invalid test manifest: {0}")]
    Invalid(String),

    #[error("no suite registered for '{0}'")]
    Unregistered(String),
}

/// Errors that abort discovery as a whole.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("failed to list test directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
