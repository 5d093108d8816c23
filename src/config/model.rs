// src/config/model.rs

use serde::Deserialize;

use crate::version::{DEFAULT_BUILD_LIMIT, DEFAULT_MINOR_INTERVAL};

/// Top-level configuration as read from `Buildwatch.toml`.
///
/// ```toml
/// [build]
/// cmd = "make"
/// limit = 3000
/// minor_interval = 200
///
/// [paths]
/// state_file = "buildstate.json"
/// header_file = "inc/build.h"
///
/// [watch]
/// extensions = ["c", "h"]
/// ```
///
/// All sections are optional and have the defaults shown above, so a project
/// with no config file at all gets the standard C-project behaviour.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    /// Build command and counter policy from `[build]`.
    #[serde(default)]
    pub build: BuildSection,

    /// Generated-file locations from `[paths]`, relative to the watch root.
    #[serde(default)]
    pub paths: PathsSection,

    /// Change-filter settings from `[watch]`.
    #[serde(default)]
    pub watch: WatchSection,
}

/// `[build]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct BuildSection {
    /// Shell command run after each version transition, with the watch root
    /// as working directory.
    #[serde(default = "default_cmd")]
    pub cmd: String,

    /// Upper bound on the build number before a major rollover is forced.
    #[serde(default = "default_limit")]
    pub limit: u64,

    /// How many builds between minor-version bumps within a major epoch.
    #[serde(default = "default_minor_interval")]
    pub minor_interval: u64,
}

fn default_cmd() -> String {
    "make".to_string()
}

fn default_limit() -> u64 {
    DEFAULT_BUILD_LIMIT
}

fn default_minor_interval() -> u64 {
    DEFAULT_MINOR_INTERVAL
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            cmd: default_cmd(),
            limit: default_limit(),
            minor_interval: default_minor_interval(),
        }
    }
}

/// `[paths]` section.
///
/// Both paths are interpreted relative to the watched directory.
#[derive(Debug, Clone, Deserialize)]
pub struct PathsSection {
    /// Where the version counter is persisted.
    #[serde(default = "default_state_file")]
    pub state_file: String,

    /// Where the generated build header goes. This exact path is excluded
    /// from the change filter so header writes don't re-trigger builds.
    #[serde(default = "default_header_file")]
    pub header_file: String,
}

fn default_state_file() -> String {
    "buildstate.json".to_string()
}

fn default_header_file() -> String {
    "inc/build.h".to_string()
}

impl Default for PathsSection {
    fn default() -> Self {
        Self {
            state_file: default_state_file(),
            header_file: default_header_file(),
        }
    }
}

/// `[watch]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchSection {
    /// File extensions (without the dot) whose changes qualify for a rebuild.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

fn default_extensions() -> Vec<String> {
    vec!["c".to_string(), "h".to_string()]
}

impl Default for WatchSection {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
        }
    }
}
