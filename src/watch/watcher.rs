// src/watch/watcher.rs

use std::path::PathBuf;
use std::sync::Arc;

use notify::event::{CreateKind, EventKind};
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::engine::RuntimeEvent;
use crate::errors::Error;
use crate::watch::filter::{ChangeEvent, ChangeFilter, ChangeKind};

/// Handle for the filesystem watcher.
///
/// This exists mainly so the underlying `RecommendedWatcher` is kept alive for
/// as long as needed. Dropping this handle releases the subscription.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

/// Spawn a filesystem watcher on `root` (recursively) that forwards every
/// qualifying change to the runtime as `RuntimeEvent::ChangeDetected`.
///
/// `root` should already be canonicalized so event paths line up with the
/// filter's header-path exclusion.
pub fn spawn_watcher(
    root: impl Into<PathBuf>,
    filter: ChangeFilter,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
) -> Result<WatcherHandle, Error> {
    let root = root.into();
    let filter = Arc::new(filter);

    // Channel from the blocking notify callback into the async world.
    let (event_tx, mut event_rx) = tokio::sync::mpsc::unbounded_channel::<Event>();

    // Closure called synchronously by notify whenever an event arrives.
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| {
            match res {
                Ok(event) => {
                    if let Err(err) = event_tx.send(event) {
                        // We can't log via tracing here easily, so fallback to stderr.
                        eprintln!("buildwatch: failed to forward notify event: {err}");
                    }
                }
                Err(err) => {
                    eprintln!("buildwatch: file watch error: {err}");
                }
            }
        },
        Config::default(),
    )
    .map_err(|source| Error::WatchSubscription { source })?;

    watcher
        .watch(&root, RecursiveMode::Recursive)
        .map_err(|source| Error::WatchSubscription { source })?;

    info!("file watcher started on {:?}", root);

    // Async task that consumes notify events, filters them, and forwards
    // qualifying changes to the runtime.
    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            debug!("received notify event: {:?}", event);

            for change in flatten_event(&event) {
                if !filter.is_qualifying(&change) {
                    continue;
                }
                debug!(path = ?change.path, kind = ?change.kind, "qualifying change");
                if let Err(err) = runtime_tx
                    .send(RuntimeEvent::ChangeDetected { path: change.path })
                    .await
                {
                    warn!("failed to send RuntimeEvent::ChangeDetected: {err}");
                    // If the runtime channel is closed, there's no point
                    // keeping the watcher loop alive.
                    return;
                }
            }
        }

        debug!("file watcher loop ended");
    });

    Ok(WatcherHandle { _inner: watcher })
}

/// Break a notify event (which may carry several paths) into per-path
/// [`ChangeEvent`]s for the filter.
fn flatten_event(event: &Event) -> Vec<ChangeEvent> {
    let kind = map_kind(&event.kind);
    let created_dir = matches!(event.kind, EventKind::Create(CreateKind::Folder));

    event
        .paths
        .iter()
        .map(|path| ChangeEvent {
            path: path.clone(),
            // notify only tags directories explicitly on creation; for other
            // kinds, ask the filesystem.
            is_directory: created_dir || path.is_dir(),
            kind,
        })
        .collect()
}

fn map_kind(kind: &EventKind) -> ChangeKind {
    match kind {
        EventKind::Create(_) => ChangeKind::Created,
        EventKind::Modify(_) => ChangeKind::Modified,
        _ => ChangeKind::Other,
    }
}
