// src/watch/mod.rs

//! File watching and change detection.
//!
//! This module is responsible for:
//! - Classifying raw filesystem events as qualifying or ignored
//!   (`ChangeFilter`).
//! - Wiring up a cross-platform filesystem watcher (`notify`).
//!
//! It does **not** know about versions or the build command; it only turns
//! filesystem changes into rebuild triggers.

pub mod filter;
pub mod watcher;

pub use filter::{ChangeEvent, ChangeFilter, ChangeKind};
pub use watcher::{spawn_watcher, WatcherHandle};
