use std::error::Error;
use std::fs;
use std::path::Path;

use buildwatch::engine::{Orchestrator, Runtime, RuntimeEvent};
use buildwatch::exec::BuildRequest;
use buildwatch::header::HeaderEmitter;
use buildwatch::state::StateStore;
use buildwatch::version::{BuildVersion, DEFAULT_BUILD_LIMIT, DEFAULT_MINOR_INTERVAL};
use tempfile::tempdir;
use tokio::sync::mpsc;

type TestResult = Result<(), Box<dyn Error>>;

fn orchestrator_in(root: &Path, start: BuildVersion) -> Orchestrator {
    fs::create_dir_all(root.join("inc")).unwrap();
    Orchestrator::new(
        start,
        StateStore::new(root.join("buildstate.json")),
        HeaderEmitter::new(root.join("inc/build.h")),
        DEFAULT_BUILD_LIMIT,
        DEFAULT_MINOR_INTERVAL,
    )
}

fn persisted_version(root: &Path) -> BuildVersion {
    StateStore::new(root.join("buildstate.json")).load().unwrap()
}

#[test]
fn pipeline_writes_header_and_state() -> TestResult {
    let dir = tempdir()?;
    let mut orchestrator = orchestrator_in(dir.path(), BuildVersion::default());

    let version = orchestrator.advance_and_persist()?;
    assert_eq!(
        version,
        BuildVersion {
            major: 0,
            minor: 0,
            number: 2
        }
    );
    assert_eq!(orchestrator.current(), version);

    let header = fs::read_to_string(dir.path().join("inc/build.h"))?;
    assert!(header.contains("#define BUILD_NUMBER 2"));
    assert_eq!(persisted_version(dir.path()), version);
    Ok(())
}

#[test]
fn failed_header_write_rolls_back_the_version() -> TestResult {
    let dir = tempdir()?;
    let start = BuildVersion::default();
    // No inc/ directory: the header write must fail and the counter must
    // stay where it was.
    let mut orchestrator = Orchestrator::new(
        start,
        StateStore::new(dir.path().join("buildstate.json")),
        HeaderEmitter::new(dir.path().join("inc/build.h")),
        DEFAULT_BUILD_LIMIT,
        DEFAULT_MINOR_INTERVAL,
    );

    assert!(orchestrator.advance_and_persist().is_err());
    assert_eq!(orchestrator.current(), start);
    assert!(!dir.path().join("buildstate.json").exists());

    // Once the directory exists, the next change retries from the same base.
    fs::create_dir_all(dir.path().join("inc"))?;
    let version = orchestrator.advance_and_persist()?;
    assert_eq!(
        version,
        BuildVersion {
            major: 0,
            minor: 0,
            number: 2
        }
    );
    Ok(())
}

#[test]
fn minor_bump_and_rollover_flow_through_the_pipeline() -> TestResult {
    let dir = tempdir()?;
    let mut orchestrator = orchestrator_in(
        dir.path(),
        BuildVersion {
            major: 0,
            minor: 0,
            number: 200,
        },
    );

    let version = orchestrator.advance_and_persist()?;
    assert_eq!(
        version,
        BuildVersion {
            major: 0,
            minor: 1,
            number: 201
        }
    );

    let mut orchestrator = orchestrator_in(
        dir.path(),
        BuildVersion {
            major: 0,
            minor: 5,
            number: 3000,
        },
    );
    let version = orchestrator.advance_and_persist()?;
    assert_eq!(
        version,
        BuildVersion {
            major: 1,
            minor: 0,
            number: 1
        }
    );
    let header = fs::read_to_string(dir.path().join("inc/build.h"))?;
    assert!(header.contains("#define BUILD_MAJOR 1"));
    assert!(header.contains("#define BUILD_MINOR 0"));
    assert!(header.contains("#define BUILD_NUMBER 1"));
    Ok(())
}

#[tokio::test]
async fn back_to_back_changes_serialize_through_the_runtime() -> TestResult {
    let dir = tempdir()?;
    let orchestrator = orchestrator_in(dir.path(), BuildVersion::default());

    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(8);
    let (exec_tx, mut exec_rx) = mpsc::channel::<BuildRequest>(8);

    // Two changes delivered back to back must each observe the other's
    // effect: 1 -> 2 -> 3, never 1 -> 2 twice.
    rt_tx
        .send(RuntimeEvent::ChangeDetected {
            path: dir.path().join("src/main.c"),
        })
        .await?;
    rt_tx
        .send(RuntimeEvent::ChangeDetected {
            path: dir.path().join("inc/util.h"),
        })
        .await?;
    rt_tx.send(RuntimeEvent::ShutdownRequested).await?;

    Runtime::new(orchestrator, rt_rx, exec_tx).run().await?;

    assert_eq!(
        persisted_version(dir.path()),
        BuildVersion {
            major: 0,
            minor: 0,
            number: 3
        }
    );

    let first = exec_rx.recv().await.unwrap();
    let second = exec_rx.recv().await.unwrap();
    assert_eq!(first.version.number, 2);
    assert_eq!(second.version.number, 3);
    Ok(())
}

#[tokio::test]
async fn pipeline_failure_skips_the_build_and_keeps_running() -> TestResult {
    let dir = tempdir()?;
    // inc/ missing: every pipeline run fails, no build may be requested.
    let orchestrator = Orchestrator::new(
        BuildVersion::default(),
        StateStore::new(dir.path().join("buildstate.json")),
        HeaderEmitter::new(dir.path().join("inc/build.h")),
        DEFAULT_BUILD_LIMIT,
        DEFAULT_MINOR_INTERVAL,
    );

    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(8);
    let (exec_tx, mut exec_rx) = mpsc::channel::<BuildRequest>(8);

    rt_tx
        .send(RuntimeEvent::ChangeDetected {
            path: dir.path().join("src/main.c"),
        })
        .await?;
    rt_tx.send(RuntimeEvent::ShutdownRequested).await?;

    Runtime::new(orchestrator, rt_rx, exec_tx).run().await?;

    assert!(exec_rx.try_recv().is_err());
    assert!(!dir.path().join("buildstate.json").exists());
    Ok(())
}
