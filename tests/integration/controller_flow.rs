//! Integration test: controller end to end.
//!
//! Drives the controller over real file-backed log clients and an
//! in-memory distributor, the way the CLI does.

use std::sync::Arc;
use std::time::Duration;

use perch_engine::{
    CheckpointStatus, Controller, ControllerError, ErrorKind, StateModel, ViewModel,
    spawn_refresher,
};
use perch_integration_tests::{TestLog, dir_url, leaf_data, witness, witness_keys};
use perch_log::LogRegistry;
use perch_types::{LogFormat, LogId};
use perch_witness::{MemoryDistributor, QuorumVerifier};
use tokio::sync::watch;

const TILES: &str = "example.com/flow-tiles";
const SERVERLESS: &str = "example.com/flow-serverless";

struct Flow {
    _dirs: Vec<tempfile::TempDir>,
    tiles: TestLog,
    distributor: Arc<MemoryDistributor>,
    model: Arc<StateModel>,
    controller: Arc<Controller>,
}

fn flow() -> Flow {
    let tiles_dir = tempfile::tempdir().unwrap();
    let tiles = TestLog::new(TILES, 300, 31);
    tiles.write_tiles(tiles_dir.path());

    let serverless_dir = tempfile::tempdir().unwrap();
    let serverless = TestLog::new(SERVERLESS, 3, 32);
    serverless.write_serverless(serverless_dir.path());

    let registry = LogRegistry::from_configs(&[
        tiles.config(&dir_url(tiles_dir.path()), LogFormat::Tiles),
        serverless.config(&dir_url(serverless_dir.path()), LogFormat::Serverless),
    ])
    .unwrap();

    let distributor = Arc::new(MemoryDistributor::new(witness_keys(2)));
    let id = LogId::from_origin(TILES);
    distributor.set_checkpoint(id, 1, tiles.checkpoint_at(290, &[witness(0)]));
    distributor.set_checkpoint(id, 2, tiles.checkpoint_at(280, &[witness(0), witness(1)]));

    let quorum = QuorumVerifier::new(distributor.clone(), &witness_keys(2)).unwrap();
    let model = Arc::new(StateModel::default());
    let controller = Arc::new(Controller::new(registry, Arc::new(quorum), model.clone()));

    Flow {
        _dirs: vec![tiles_dir, serverless_dir],
        tiles,
        distributor,
        model,
        controller,
    }
}

#[tokio::test]
async fn test_browse_tiles_log() {
    let f = flow();
    assert!(f.controller.select_log(TILES).await);

    let cp = f.model.checkpoint();
    assert_eq!(cp.status(), CheckpointStatus::LogAndWitnessCheckpoint);
    assert_eq!(cp.size(), Some(f.tiles.size));
    assert_eq!(cp.witnessed.as_ref().unwrap().checkpoint.size, 290);

    // Step across the bundle boundary and back.
    f.controller.get_leaf(300, 255).await;
    f.controller.next_leaf().await;
    let leaf = f.model.leaf().leaf.unwrap();
    assert_eq!(leaf.index, 256);
    assert_eq!(&leaf.contents[..], &leaf_data(256)[..]);

    f.controller.prev_leaf().await;
    assert_eq!(f.model.leaf().leaf.unwrap().index, 255);

    f.controller.get_leaf(300, 299).await;
    f.controller.next_leaf().await;
    let state = f.model.leaf();
    assert!(matches!(
        state.error.as_deref(),
        Some(ControllerError::Bounds { index: 300, size: 300 })
    ));
    assert_eq!(state.leaf.unwrap().index, 299);
}

#[tokio::test]
async fn test_raising_quorum_picks_older_checkpoint() {
    let f = flow();
    f.controller.select_log(TILES).await;

    f.controller.inc_witnesses().await;
    assert_eq!(f.model.witness_n(), 2);
    let cp = f.model.checkpoint();
    assert_eq!(cp.witnessed.unwrap().checkpoint.size, 280);

    f.controller.inc_witnesses().await;
    let cp = f.model.checkpoint();
    assert!(cp.witnessed.is_none());
    assert_eq!(cp.status(), CheckpointStatus::LogCheckpointOnly);
    assert_eq!(f.distributor.requests().last(), Some(&(LogId::from_origin(TILES), 3)));
}

/// Selecting a log lands on its newest leaf.
#[tokio::test]
async fn test_switching_logs_selects_last_leaf() {
    let f = flow();
    f.controller.select_log(TILES).await;
    f.controller.get_leaf(300, 10).await;
    assert_eq!(f.model.leaf().leaf.unwrap().index, 10);

    assert!(f.controller.select_log(SERVERLESS).await);
    let cp = f.model.checkpoint();
    assert_eq!(cp.size(), Some(3));
    assert!(cp.witnessed.is_none());
    let leaf = f.model.leaf().leaf.unwrap();
    assert_eq!(leaf.index, 2);
    assert_eq!(&leaf.contents[..], &leaf_data(2)[..]);

    f.controller.prev_leaf().await;
    assert_eq!(f.model.leaf().leaf.unwrap().index, 1);
}

#[tokio::test]
async fn test_unknown_log_is_ignored() {
    let f = flow();
    f.controller.select_log(TILES).await;
    assert!(!f.controller.select_log("example.com/nowhere").await);
    assert_eq!(f.controller.current_origin().as_deref(), Some(TILES));
}

#[tokio::test]
async fn test_leaf_before_selecting_log() {
    let f = flow();
    f.controller.get_leaf(10, 1).await;
    let err = f.model.leaf().error.unwrap();
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[tokio::test]
async fn test_refresher_picks_up_log_growth() {
    let f = flow();
    let dir = tempfile::tempdir().unwrap();
    let log = TestLog::new("example.com/growing", 5, 33);
    log.write_serverless(dir.path());

    let registry = LogRegistry::from_configs(&[
        log.config(&dir_url(dir.path()), LogFormat::Serverless),
    ])
    .unwrap();
    let quorum = QuorumVerifier::new(f.distributor.clone(), &witness_keys(2)).unwrap();
    let model = Arc::new(StateModel::default());
    let controller = Arc::new(Controller::new(registry, Arc::new(quorum), model.clone()));
    controller.select_log(&log.origin).await;
    assert_eq!(model.checkpoint().size(), Some(5));

    let grown = TestLog::new("example.com/growing", 9, 33);
    grown.write_serverless(dir.path());

    let (tx, rx) = watch::channel(false);
    let handle = spawn_refresher(controller.clone(), Duration::from_millis(50), rx);
    let mut size = model.checkpoint().size();
    for _ in 0..100 {
        if size == Some(9) {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
        size = model.checkpoint().size();
    }
    assert_eq!(size, Some(9));

    tx.send(true).unwrap();
    handle.await.unwrap();
}
