// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod header;
pub mod logging;
pub mod state;
pub mod version;
pub mod watch;

use std::path::{Path, PathBuf};

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::cli::CliArgs;
use crate::config::ConfigFile;
use crate::engine::{BuildOutcome, Orchestrator, Runtime, RuntimeEvent};
use crate::errors::Error;
use crate::header::HeaderEmitter;
use crate::state::StateStore;
use crate::version::BuildVersion;
use crate::watch::ChangeFilter;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - watch-root resolution and config loading
/// - persisted version state
/// - orchestrator runtime + executor
/// - file watcher
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let root = resolve_watch_root(&args.dir)?;
    let cfg = config::load_for_root(&root, args.config.as_deref().map(Path::new))?;

    let state_path = root.join(&cfg.paths.state_file);
    let header_path = root.join(&cfg.paths.header_file);

    let store = StateStore::new(&state_path);
    let emitter = HeaderEmitter::new(&header_path);
    let current = load_or_reset(&store);

    info!(root = ?root, version = %current, "buildwatch starting");

    if args.dry_run {
        print_dry_run(&root, &cfg, current);
        return Ok(());
    }

    let mut orchestrator = Orchestrator::new(
        current,
        store,
        emitter,
        cfg.build.limit,
        cfg.build.minor_interval,
    );

    // Single-shot mode: run the pipeline once, wait for the build, exit.
    if args.once {
        let version = orchestrator.advance_and_persist()?;
        info!(%version, "version advanced, running build once");

        let outcome = exec::run_build_once(&cfg.build.cmd, &root, version).await?;
        if let BuildOutcome::Failed(code) = outcome {
            // The build's failure is its own; the version transition stands.
            warn!(exit_code = code, "build command failed");
        }
        return Ok(());
    }

    // Runtime event channel.
    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(64);

    // Process executor.
    let exec_tx = exec::spawn_executor(cfg.build.cmd.clone(), root.clone(), rt_tx.clone());

    // File watcher. The handle must stay alive for the watch subscription to
    // stay active; it is released when `run()` returns.
    let filter = ChangeFilter::new(cfg.watch.extensions.clone(), &header_path);
    let _watcher_handle = watch::spawn_watcher(root.clone(), filter, rt_tx.clone())?;

    // Ctrl-C → graceful shutdown.
    {
        let tx = rt_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(RuntimeEvent::ShutdownRequested).await;
        });
    }

    let runtime = Runtime::new(orchestrator, rt_rx, exec_tx);
    runtime.run().await
}

/// Validate and canonicalize the directory to watch.
///
/// A missing or non-directory path is fatal; there is nothing useful the tool
/// can do without a real project to watch.
fn resolve_watch_root(dir: &str) -> Result<PathBuf, Error> {
    if dir.is_empty() {
        return Err(Error::InvalidWatchPath {
            path: PathBuf::new(),
            reason: "path is empty".to_string(),
        });
    }

    let path = PathBuf::from(dir);
    if !path.is_dir() {
        return Err(Error::InvalidWatchPath {
            path,
            reason: "not an existing directory".to_string(),
        });
    }

    // Canonicalize so notify event paths line up with the header exclusion.
    path.canonicalize().map_err(|err| Error::InvalidWatchPath {
        path,
        reason: format!("cannot canonicalize: {err}"),
    })
}

/// Load the persisted version, falling back to the default start state when
/// the file is corrupt. Losing the counter is recoverable; refusing to start
/// is not worth it for a convenience tool.
fn load_or_reset(store: &StateStore) -> BuildVersion {
    match store.load() {
        Ok(version) => version,
        Err(err) => {
            warn!(error = %err, "state file unreadable, resetting to default");
            BuildVersion::default()
        }
    }
}

/// Simple dry-run output: print the resolved config and current version.
fn print_dry_run(root: &Path, cfg: &ConfigFile, current: BuildVersion) {
    println!("buildwatch dry-run");
    println!("  root: {}", root.display());
    println!("  current version: {current}");
    println!();
    println!("  build.cmd = {}", cfg.build.cmd);
    println!("  build.limit = {}", cfg.build.limit);
    println!("  build.minor_interval = {}", cfg.build.minor_interval);
    println!("  paths.state_file = {}", cfg.paths.state_file);
    println!("  paths.header_file = {}", cfg.paths.header_file);
    println!("  watch.extensions = {:?}", cfg.watch.extensions);
}
