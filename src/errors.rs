// src/errors.rs

//! Structured error kinds for the rebuild pipeline.
//!
//! Most of the crate uses `anyhow` with context like the rest of the I/O
//! code; this enum exists for the handful of failures the runtime treats
//! differently (fatal vs retry-on-next-change vs reset-to-default).

use std::path::PathBuf;

use thiserror::Error;

pub use anyhow::Result;

#[derive(Debug, Error)]
pub enum Error {
    /// The directory to watch is missing or not a directory. Fatal at startup.
    #[error("invalid watch path {path:?}: {reason}")]
    InvalidWatchPath { path: PathBuf, reason: String },

    /// The state file exists but cannot be parsed into the three required
    /// fields. Recovered by falling back to the default start state.
    #[error("corrupt build state in {path:?}: {source}")]
    CorruptState {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Writing the generated header failed. Aborts one pipeline run.
    #[error("failed to write build header {path:?}: {source}")]
    HeaderWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Persisting the state file failed. Aborts one pipeline run.
    #[error("failed to save build state {path:?}: {source}")]
    StateSave {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The filesystem watcher could not be set up. Fatal.
    #[error("failed to subscribe to filesystem events: {source}")]
    WatchSubscription {
        #[source]
        source: notify::Error,
    },
}
