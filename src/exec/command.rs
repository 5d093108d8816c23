// src/exec/command.rs

use std::path::{Path, PathBuf};
use std::process::Stdio;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::engine::{BuildOutcome, RuntimeEvent};
use crate::version::BuildVersion;

/// One build to run, carrying the version it was triggered for (used only in
/// log output).
#[derive(Debug, Clone, Copy)]
pub struct BuildRequest {
    pub version: BuildVersion,
}

/// Spawn the background executor loop.
///
/// The returned `mpsc::Sender<BuildRequest>` is what the runtime uses as
/// `exec_tx`. Each build runs in its own Tokio task, so the runtime never
/// waits for `make` before accepting the next change; overlapping builds are
/// the build system's concern.
pub fn spawn_executor(
    cmd: String,
    root: PathBuf,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
) -> mpsc::Sender<BuildRequest> {
    let (tx, mut rx) = mpsc::channel::<BuildRequest>(32);

    tokio::spawn(async move {
        info!("executor loop started");
        while let Some(request) = rx.recv().await {
            let cmd = cmd.clone();
            let root = root.clone();
            let runtime_tx = runtime_tx.clone();
            tokio::spawn(async move {
                run_build(&cmd, &root, request, runtime_tx).await;
            });
        }
        info!("executor loop finished (channel closed)");
    });

    tx
}

/// Run a single build, emitting `BuildFinished` on completion.
///
/// All errors are converted into a failed outcome with exit code -1; they are
/// also logged via `tracing::error!`.
async fn run_build(
    cmd: &str,
    root: &Path,
    request: BuildRequest,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
) {
    let outcome = match run_build_once(cmd, root, request.version).await {
        Ok(outcome) => outcome,
        Err(err) => {
            error!(error = %err, "build execution error");
            BuildOutcome::Failed(-1)
        }
    };

    let _ = runtime_tx
        .send(RuntimeEvent::BuildFinished { outcome })
        .await;
}

/// Run the build command to completion and return its outcome.
///
/// Also used directly by `--once` mode, which wants to wait for the build
/// rather than fire and forget.
pub async fn run_build_once(
    cmd: &str,
    root: &Path,
    version: BuildVersion,
) -> Result<BuildOutcome> {
    info!(%cmd, %version, "starting build");

    // Build a shell command appropriate for the platform.
    let mut command = if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(cmd);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(cmd);
        c
    };

    command
        .current_dir(root)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = command
        .spawn()
        .with_context(|| format!("spawning build command '{cmd}'"))?;

    // Stream both pipes through the log so the operator sees compiler output;
    // also keeps OS buffers from filling.
    if let Some(stdout) = child.stdout.take() {
        tokio::spawn(async move {
            let reader = BufReader::new(stdout);
            let mut lines = reader.lines();
            while let Ok(Some(line)) = lines.next_line().await {
                info!("build: {}", line);
            }
        });
    }
    if let Some(stderr) = child.stderr.take() {
        tokio::spawn(async move {
            let reader = BufReader::new(stderr);
            let mut lines = reader.lines();
            while let Ok(Some(line)) = lines.next_line().await {
                debug!("build stderr: {}", line);
            }
        });
    }

    let status = child
        .wait()
        .await
        .with_context(|| format!("waiting for build command '{cmd}'"))?;

    let code = status.code().unwrap_or(-1);
    info!(exit_code = code, success = status.success(), "build exited");

    if status.success() {
        Ok(BuildOutcome::Success)
    } else {
        Ok(BuildOutcome::Failed(code))
    }
}
