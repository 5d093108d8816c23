// src/state.rs

//! Persistence for the build-version counter.
//!
//! The counter lives in a small JSON file (`buildstate.json` by default) next
//! to the project. It is read once at startup and overwritten after every
//! successful version transition, so the counter survives restarts.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::errors::Error;
use crate::version::BuildVersion;

/// Loads and saves the persisted [`BuildVersion`] snapshot.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted snapshot.
    ///
    /// - No file → the default start state `{0, 0, 1}`.
    /// - Unreadable or unparsable file → [`Error::CorruptState`]; the caller
    ///   decides whether to abort or reset to the default.
    pub fn load(&self) -> Result<BuildVersion, Error> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = ?self.path, "no persisted state, starting fresh");
                return Ok(BuildVersion::default());
            }
            Err(err) => {
                return Err(Error::CorruptState {
                    path: self.path.clone(),
                    source: serde_json::Error::io(err),
                });
            }
        };

        serde_json::from_str(&contents).map_err(|source| Error::CorruptState {
            path: self.path.clone(),
            source,
        })
    }

    /// Durably overwrite the snapshot with `version`.
    ///
    /// Writes to a sibling temp file and renames it into place, so a crash
    /// mid-save never leaves a half-written state file behind.
    pub fn save(&self, version: BuildVersion) -> Result<(), Error> {
        let json = serde_json::to_string(&version).map_err(|err| Error::StateSave {
            path: self.path.clone(),
            source: std::io::Error::other(err),
        })?;

        let tmp = self.path.with_extension("json.tmp");

        let result = fs::write(&tmp, &json).and_then(|_| fs::rename(&tmp, &self.path));
        result.map_err(|source| Error::StateSave {
            path: self.path.clone(),
            source,
        })?;

        debug!(path = ?self.path, %version, "state saved");
        Ok(())
    }
}
