// src/engine/runtime.rs

use std::path::PathBuf;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::exec::BuildRequest;
use crate::header::HeaderEmitter;
use crate::state::StateStore;
use crate::version::BuildVersion;

/// Result of a build command invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildOutcome {
    Success,
    Failed(i32), // exit code
}

/// Events sent into the runtime from the watcher, the executor, or external
/// signals.
///
/// - the file watcher sends `ChangeDetected` for qualifying changes
/// - the executor sends `BuildFinished` (consumed for logging only)
/// - Ctrl-C handling sends `ShutdownRequested`
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    ChangeDetected { path: PathBuf },
    BuildFinished { outcome: BuildOutcome },
    ShutdownRequested,
}

/// Owns the version counter and its on-disk artefacts, and performs the one
/// critical section of the program: advance the counter, write the header,
/// save the state, commit.
///
/// The in-memory version only moves forward once both writes succeed, so a
/// failed run leaves the counter where it was and a later change retries from
/// a consistent version.
pub struct Orchestrator {
    version: BuildVersion,
    store: StateStore,
    emitter: HeaderEmitter,
    build_limit: u64,
    minor_interval: u64,
}

impl Orchestrator {
    pub fn new(
        version: BuildVersion,
        store: StateStore,
        emitter: HeaderEmitter,
        build_limit: u64,
        minor_interval: u64,
    ) -> Self {
        Self {
            version,
            store,
            emitter,
            build_limit,
            minor_interval,
        }
    }

    pub fn current(&self) -> BuildVersion {
        self.version
    }

    /// Advance the counter and persist it: header first, then the state file.
    ///
    /// On any failure the previous version stays current and the error is
    /// returned; nothing on disk is rolled back (the state file is only
    /// replaced atomically, and a header one step ahead of the persisted
    /// counter is re-derived on the next successful run).
    pub fn advance_and_persist(&mut self) -> Result<BuildVersion> {
        let next = self.version.advance(self.build_limit, self.minor_interval);

        self.emitter.write(next)?;
        self.store.save(next)?;

        self.version = next;
        Ok(next)
    }
}

/// The main orchestration runtime.
///
/// A single-consumer event loop: every qualifying change runs the
/// advance/write/save pipeline to completion before the next event is looked
/// at, so closely spaced changes serialize and each one observes the
/// previous one's counter.
pub struct Runtime {
    orchestrator: Orchestrator,

    /// Unified event stream from all producers (watcher, executor, signal handler).
    events_rx: mpsc::Receiver<RuntimeEvent>,

    /// Channel to the executor: one message per build to run.
    exec_tx: mpsc::Sender<BuildRequest>,
}

impl Runtime {
    pub fn new(
        orchestrator: Orchestrator,
        events_rx: mpsc::Receiver<RuntimeEvent>,
        exec_tx: mpsc::Sender<BuildRequest>,
    ) -> Self {
        Self {
            orchestrator,
            events_rx,
            exec_tx,
        }
    }

    /// Main event loop. Returns when `ShutdownRequested` arrives or all
    /// senders are gone.
    pub async fn run(mut self) -> Result<()> {
        info!("buildwatch runtime started");

        while let Some(event) = self.events_rx.recv().await {
            debug!(?event, "runtime received event");

            let keep_running = match event {
                RuntimeEvent::ChangeDetected { path } => self.handle_change(path).await?,
                RuntimeEvent::BuildFinished { outcome } => self.handle_build_finished(outcome),
                RuntimeEvent::ShutdownRequested => {
                    info!("shutdown requested, stopping runtime");
                    false
                }
            };

            if !keep_running {
                break;
            }
        }

        info!(
            version = %self.orchestrator.current(),
            "buildwatch runtime exiting"
        );
        Ok(())
    }

    /// Handle one qualifying source change: run the pipeline, then hand the
    /// build off to the executor.
    async fn handle_change(&mut self, path: PathBuf) -> Result<bool> {
        info!(path = ?path, "qualifying change detected");

        let version = match self.orchestrator.advance_and_persist() {
            Ok(version) => version,
            Err(err) => {
                // Abort this run; the watcher stays up so a later change
                // retries from the uncommitted version.
                error!(error = %err, "pipeline aborted, build not triggered");
                return Ok(true);
            }
        };

        info!(%version, "version advanced, triggering build");

        if let Err(err) = self.exec_tx.send(BuildRequest { version }).await {
            error!(error = %err, "failed to send build request to executor");
            // If the executor channel is closed, there's not much we can do.
            // Bubble up the error so higher layers can decide what to do.
            return Err(err.into());
        }

        Ok(true)
    }

    /// Build outcomes are logged but never fed back into the counter.
    fn handle_build_finished(&self, outcome: BuildOutcome) -> bool {
        match outcome {
            BuildOutcome::Success => info!("build finished successfully"),
            BuildOutcome::Failed(code) => {
                warn!(exit_code = code, "build command failed");
            }
        }
        true
    }
}
