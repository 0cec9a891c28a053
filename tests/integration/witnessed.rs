//! Integration test: witness quorum through the REST distributor.
//!
//! A serverless log on disk, a distributor served by axum, and the quorum
//! verifier in between.

use std::collections::HashMap;
use std::sync::Arc;

use perch_integration_tests::{
    TestLog, dir_url, serve_distributor, witness, witness_keys,
};
use perch_log::build_client;
use perch_types::{LogFormat, LogId};
use perch_witness::{QuorumVerifier, RestDistributor, WitnessError};

const ORIGIN: &str = "example.com/witnessed-log";

#[tokio::test]
async fn test_quorum_over_rest_distributor() {
    let dir = tempfile::tempdir().unwrap();
    let log = TestLog::new(ORIGIN, 40, 21);
    log.write_serverless(dir.path());
    let client = build_client(&log.config(&dir_url(dir.path()), LogFormat::Serverless)).unwrap();

    let id = LogId::from_origin(ORIGIN);
    let mut checkpoints = HashMap::new();
    checkpoints.insert((id, 1), log.checkpoint_at(38, &[witness(1)]));
    checkpoints.insert((id, 2), log.checkpoint_at(35, &[witness(0), witness(1)]));
    let url = serve_distributor(witness_keys(3), checkpoints).await;

    let distributor = Arc::new(RestDistributor::new(&url).unwrap());
    let quorum = QuorumVerifier::connect(distributor).await.unwrap();
    assert_eq!(quorum.witnesses().len(), 3);

    let one = quorum.checkpoint_with_quorum(client.as_ref(), 1).await.unwrap();
    assert_eq!(one.checkpoint.size, 38);
    assert_eq!(one.cosigned_by(quorum.witnesses()), 1);

    let two = quorum.checkpoint_with_quorum(client.as_ref(), 2).await.unwrap();
    assert_eq!(two.checkpoint.size, 35);
    assert_eq!(two.cosigned_by(quorum.witnesses()), 2);

    let err = quorum.checkpoint_with_quorum(client.as_ref(), 3).await.unwrap_err();
    assert!(matches!(err, WitnessError::NotFound(_)), "got {err:?}");
    assert!(quorum.verify_with_quorum(client.as_ref(), 3).await.is_none());
}

/// A distributor answering `n = 2` with a singly-cosigned note does not
/// satisfy the quorum.
#[tokio::test]
async fn test_under_cosigned_answer_is_rejected() {
    let log = TestLog::new(ORIGIN, 5, 22);
    let client = build_client(&log.config("file:///nonexistent/", LogFormat::Serverless)).unwrap();

    let mut checkpoints = HashMap::new();
    checkpoints.insert((LogId::from_origin(ORIGIN), 2), log.checkpoint(&[witness(2)]));
    let url = serve_distributor(witness_keys(3), checkpoints).await;

    let quorum = QuorumVerifier::connect(Arc::new(RestDistributor::new(&url).unwrap()))
        .await
        .unwrap();
    let err = quorum.checkpoint_with_quorum(client.as_ref(), 2).await.unwrap_err();
    assert!(
        matches!(err, WitnessError::QuorumNotMet { wanted: 2, got: 1 }),
        "got {err:?}"
    );
}

#[tokio::test]
async fn test_unreachable_distributor_fails_connect() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let distributor = RestDistributor::new(&format!("http://{addr}")).unwrap();
    let err = QuorumVerifier::connect(Arc::new(distributor)).await.err().unwrap();
    assert!(matches!(err, WitnessError::Http(_)), "got {err:?}");
}
