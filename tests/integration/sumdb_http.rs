//! Integration test: checksum-database log over HTTP.
//!
//! Serves `/latest` and every data tile prefix from an axum server and
//! reads leaves through the sumdb client.

use perch_integration_tests::{TestLog, leaf_data, serve_blobs};
use perch_log::{LogError, build_client};
use perch_types::LogFormat;

#[tokio::test]
async fn test_sumdb_leaves_from_partial_and_full_tiles() {
    let log = TestLog::new("example.com/sumdb-test", 300, 11);
    let url = serve_blobs(log.sumdb_blobs()).await;

    let client = build_client(&log.config(&url, LogFormat::SumDb)).unwrap();
    let cp = client.checkpoint().await.unwrap();
    assert_eq!(cp.checkpoint.size, 300);

    // Leaf 255 is the last of its tile and fetches the full tile; the
    // rest fetch a prefix ending at the leaf.
    for index in 0..cp.checkpoint.size {
        let leaf = client.leaf(cp.checkpoint.size, index).await.unwrap();
        assert_eq!(&leaf[..], &leaf_data(index)[..], "leaf {index}");
    }
}

#[tokio::test]
async fn test_sumdb_at_bundle_boundaries() {
    for (seed, size) in [(14u8, 255u64), (15, 256), (16, 257), (17, 768)] {
        let log = TestLog::new("example.com/sumdb-boundary", size, seed);
        let url = serve_blobs(log.sumdb_blobs()).await;

        let client = build_client(&log.config(&url, LogFormat::SumDb)).unwrap();
        assert_eq!(client.checkpoint().await.unwrap().checkpoint.size, size);
        for index in 0..size {
            let leaf = client.leaf(size, index).await.unwrap();
            assert_eq!(&leaf[..], &leaf_data(index)[..], "size {size} leaf {index}");
        }
    }
}

#[tokio::test]
async fn test_sumdb_tile_beyond_log_is_not_found() {
    let log = TestLog::new("example.com/sumdb-short", 4, 12);
    let url = serve_blobs(log.sumdb_blobs()).await;

    let client = build_client(&log.config(&url, LogFormat::SumDb)).unwrap();
    let err = client.leaf(10, 7).await.unwrap_err();
    assert!(matches!(err, LogError::NotFound(_)), "got {err:?}");
}

#[tokio::test]
async fn test_sumdb_without_latest_is_not_found() {
    let log = TestLog::new("example.com/sumdb-empty", 4, 13);
    let mut blobs = log.sumdb_blobs();
    blobs.remove("/latest");
    let url = serve_blobs(blobs).await;

    let client = build_client(&log.config(&url, LogFormat::SumDb)).unwrap();
    let err = client.checkpoint().await.unwrap_err();
    assert!(matches!(err, LogError::NotFound(_)), "got {err:?}");
}
