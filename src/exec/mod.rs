// src/exec/mod.rs

//! Process execution layer.
//!
//! This module is responsible for actually running the project's build
//! command, using `tokio::process::Command`, and reporting back to the
//! orchestration runtime via `RuntimeEvent`s. The exit status is reported for
//! logging only; it never feeds back into the version counter.

pub mod command;

pub use command::{run_build_once, spawn_executor, BuildRequest};
