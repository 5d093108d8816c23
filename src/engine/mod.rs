// src/engine/mod.rs

//! Orchestration engine for buildwatch.
//!
//! This module owns the change-to-rebuild pipeline:
//! - the `Orchestrator`, which holds the single version counter and performs
//!   the advance → header write → state save critical section
//! - the main runtime event loop that reacts to:
//!   - file-watch triggers
//!   - build completion events (logging only)
//!   - shutdown signals

pub mod runtime;

pub use runtime::{BuildOutcome, Orchestrator, Runtime, RuntimeEvent};
