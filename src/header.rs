// src/header.rs

//! Rendering of the generated C build header.
//!
//! Every successful version transition overwrites a header (`inc/build.h` by
//! default) exposing the current version as preprocessor constants, so the
//! project under watch can compile its own build identity in.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::errors::Error;
use crate::version::BuildVersion;

/// Writes the generated build header for a project.
#[derive(Debug, Clone)]
pub struct HeaderEmitter {
    path: PathBuf,
}

impl HeaderEmitter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the generated header. The change filter uses this to keep the
    /// emitter's own writes from re-triggering the pipeline.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Render the header text for `version`. Deterministic: the same version
    /// always yields byte-identical output.
    pub fn render(version: BuildVersion) -> String {
        format!(
            "#ifndef _BUILD_H\n\
             #define _BUILD_H\n\
             \n\
             #define BUILD_MAJOR {}\n\
             #define BUILD_MINOR {}\n\
             #define BUILD_NUMBER {}\n\
             \n\
             #endif\n",
            version.major, version.minor, version.number
        )
    }

    /// Render and overwrite the header on disk.
    ///
    /// The parent directory is expected to exist (it is part of the watched
    /// project); a missing directory or permission failure surfaces as
    /// [`Error::HeaderWrite`].
    pub fn write(&self, version: BuildVersion) -> Result<(), Error> {
        fs::write(&self.path, Self::render(version)).map_err(|source| Error::HeaderWrite {
            path: self.path.clone(),
            source,
        })?;

        debug!(path = ?self.path, %version, "build header written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_is_deterministic() {
        let version = BuildVersion {
            major: 1,
            minor: 4,
            number: 812,
        };
        assert_eq!(
            HeaderEmitter::render(version),
            HeaderEmitter::render(version)
        );
    }

    #[test]
    fn render_has_guard_and_fields_in_order() {
        let text = HeaderEmitter::render(BuildVersion {
            major: 2,
            minor: 3,
            number: 450,
        });

        assert!(text.starts_with("#ifndef _BUILD_H\n#define _BUILD_H\n"));
        assert!(text.trim_end().ends_with("#endif"));

        let major = text.find("#define BUILD_MAJOR 2").unwrap();
        let minor = text.find("#define BUILD_MINOR 3").unwrap();
        let number = text.find("#define BUILD_NUMBER 450").unwrap();
        assert!(major < minor && minor < number);
    }

    #[test]
    fn render_of_default_state() {
        let text = HeaderEmitter::render(BuildVersion::default());
        assert!(text.contains("#define BUILD_MAJOR 0\n"));
        assert!(text.contains("#define BUILD_MINOR 0\n"));
        assert!(text.contains("#define BUILD_NUMBER 1\n"));
    }
}
