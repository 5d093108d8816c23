// src/version.rs

//! The build-version counter: a (major, minor, number) triple and the single
//! transition rule that advances it.
//!
//! `number` counts builds since the last major rollover. Every
//! `minor_interval` builds the minor version bumps; once `number` reaches
//! `limit` the next advance rolls the major version over and resets the rest.
//! Rollover is checked first, so the minor bump is never evaluated on a
//! rolling-over advance (this matters when `limit` is itself a multiple of
//! the interval).

use serde::{Deserialize, Serialize};

/// Upper bound on `number` before a major rollover is forced.
pub const DEFAULT_BUILD_LIMIT: u64 = 3000;

/// Every this many builds within a major epoch, `minor` bumps by one.
pub const DEFAULT_MINOR_INTERVAL: u64 = 200;

pub const MAJOR_START: u64 = 0;
pub const MINOR_START: u64 = 0;
pub const NUMBER_START: u64 = 1;

/// The project's current build identity.
///
/// Serialized as `{"major": .., "minor": .., "number": ..}` in the state
/// file; the field names are part of the on-disk format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildVersion {
    pub major: u64,
    pub minor: u64,
    pub number: u64,
}

impl Default for BuildVersion {
    /// First-run state: "one build has occurred".
    fn default() -> Self {
        Self {
            major: MAJOR_START,
            minor: MINOR_START,
            number: NUMBER_START,
        }
    }
}

impl std::fmt::Display for BuildVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.number)
    }
}

impl BuildVersion {
    /// Compute the next version. Pure; the caller persists the result.
    ///
    /// Order is load-bearing:
    /// 1. at or past `limit` → rollover: major+1, minor and number reset;
    /// 2. otherwise the minor bump fires when `number` is a positive
    ///    multiple of `minor_interval`, then `number` increments.
    pub fn advance(self, limit: u64, minor_interval: u64) -> Self {
        if self.number >= limit {
            return Self {
                major: self.major + 1,
                minor: MINOR_START,
                number: NUMBER_START,
            };
        }

        let minor = if self.number != 0 && self.number % minor_interval == 0 {
            self.minor + 1
        } else {
            self.minor
        };

        Self {
            major: self.major,
            minor,
            number: self.number + 1,
        }
    }
}
