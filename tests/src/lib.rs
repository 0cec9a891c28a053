//! Shared test harness for perch integration tests.
//!
//! Provides [`TestLog`], a small signed log that can be laid out on disk in
//! the tiles or serverless layout, or served over HTTP as a checksum
//! database, plus helpers for serving a witness distributor with axum.

use std::collections::HashMap;
use std::path::Path;

use axum::Router;
use axum::extract::Path as UrlPath;
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use bytes::Bytes;
use ed25519_dalek::SigningKey;
use perch_log::LogConfig;
use perch_log::layout::{
    encode_tile_index, encode_tiles_bundle, serverless_leaf_path, tiles_bundle_path,
};
use perch_note::{NoteSigner, marshal_checkpoint, sign_note};
use perch_types::{BUNDLE_WIDTH, Checkpoint, LogFormat, LogId};
use url::Url;

/// Timestamp carried by every test cosignature.
const WITNESS_TIMESTAMP: u64 = 1_700_000_000;

/// Contents of leaf `i` in every test log.
///
/// Newline-terminated so the same leaves work as checksum-database records.
pub fn leaf_data(i: u64) -> Vec<u8> {
    format!("example.com/module{i} v1.0.{i}\nh1:{i:08x}=\n").into_bytes()
}

/// Witness `i`, signing cosignature/v1.
pub fn witness(i: u8) -> NoteSigner {
    NoteSigner::new_cosignature_v1(
        &format!("integration-witness-{i}"),
        SigningKey::from_bytes(&[90 + i; 32]),
        WITNESS_TIMESTAMP,
    )
}

/// Verifier keys of witnesses `0..n`.
pub fn witness_keys(n: u8) -> Vec<String> {
    (0..n).map(|i| witness(i).vkey()).collect()
}

/// Directory URL for a local path, with the trailing slash.
pub fn dir_url(path: &Path) -> String {
    Url::from_directory_path(path)
        .expect("absolute path")
        .to_string()
}

// =========================================================================
// Test logs
// =========================================================================

/// A log of `size` leaves signed by a key named after its origin.
pub struct TestLog {
    pub origin: String,
    pub size: u64,
    pub signer: NoteSigner,
}

impl TestLog {
    pub fn new(origin: &str, size: u64, seed: u8) -> Self {
        Self {
            origin: origin.to_string(),
            size,
            signer: NoteSigner::new_ed25519(origin, SigningKey::from_bytes(&[seed; 32])),
        }
    }

    pub fn vkey(&self) -> String {
        self.signer.vkey()
    }

    /// Config for this log rooted at `url`.
    pub fn config(&self, url: &str, format: LogFormat) -> LogConfig {
        LogConfig::new(url, &self.origin, &self.vkey(), format)
    }

    /// The checkpoint note, signed by the log and then each of `witnesses`.
    pub fn checkpoint(&self, witnesses: &[NoteSigner]) -> Vec<u8> {
        self.checkpoint_at(self.size, witnesses)
    }

    /// A checkpoint note for an earlier (or later) tree size.
    pub fn checkpoint_at(&self, size: u64, witnesses: &[NoteSigner]) -> Vec<u8> {
        let text = marshal_checkpoint(&Checkpoint {
            origin: self.origin.clone(),
            size,
            root_hash: [(size % 251) as u8; 32],
            extensions: String::new(),
        });
        let mut signers = vec![&self.signer];
        signers.extend(witnesses.iter());
        sign_note(&text, &signers).expect("sign checkpoint")
    }

    /// Write a tlog-tiles log under `dir`.
    pub fn write_tiles(&self, dir: &Path) {
        write(dir, "checkpoint", &self.checkpoint(&[]));
        let bundles = self.size.div_ceil(BUNDLE_WIDTH);
        for bundle in 0..bundles {
            let first = bundle * BUNDLE_WIDTH;
            let last = (first + BUNDLE_WIDTH).min(self.size);
            let leaves: Vec<Vec<u8>> = (first..last).map(leaf_data).collect();
            let data = encode_tiles_bundle(leaves.iter().map(Vec::as_slice)).expect("bundle");
            write(dir, &tiles_bundle_path(bundle, self.size), &data);
        }
    }

    /// Write a serverless log under `dir`.
    pub fn write_serverless(&self, dir: &Path) {
        write(dir, "checkpoint", &self.checkpoint(&[]));
        for i in 0..self.size {
            write(dir, &serverless_leaf_path(i), &leaf_data(i));
        }
    }

    /// Every blob a checksum-database server would hold for this log,
    /// keyed by absolute URL path. Partial data tiles exist for every
    /// prefix width, as a real server computes them on demand.
    pub fn sumdb_blobs(&self) -> HashMap<String, Bytes> {
        let mut blobs = HashMap::new();
        blobs.insert("/latest".to_string(), Bytes::from(self.checkpoint(&[])));

        let bundles = self.size.div_ceil(BUNDLE_WIDTH);
        for bundle in 0..bundles {
            let first = bundle * BUNDLE_WIDTH;
            let available = (self.size - first).min(BUNDLE_WIDTH);
            let base = format!("/tile/8/data/{}", encode_tile_index(bundle));
            for width in 1..=available {
                let records: Vec<Vec<u8>> = (first..first + width).map(leaf_data).collect();
                let tile = Bytes::from(records.join(&b"\n"[..]));
                let path = if width == BUNDLE_WIDTH {
                    base.clone()
                } else {
                    format!("{base}.p/{width}")
                };
                blobs.insert(path, tile);
            }
        }
        blobs
    }
}

fn write(dir: &Path, rel: &str, data: &[u8]) {
    let path = dir.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create log dirs");
    }
    std::fs::write(path, data).expect("write blob");
}

// =========================================================================
// HTTP servers
// =========================================================================

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    format!("http://{addr}/")
}

/// Serve `blobs` by exact request path and return the base URL.
pub async fn serve_blobs(blobs: HashMap<String, Bytes>) -> String {
    let app = Router::new().fallback(move |uri: Uri| {
        let blob = blobs.get(uri.path()).cloned();
        async move {
            match blob {
                Some(data) => data.into_response(),
                None => StatusCode::NOT_FOUND.into_response(),
            }
        }
    });
    serve(app).await
}

/// Serve a witness distributor knowing `witnesses` and holding
/// `checkpoints` keyed by `(log, n)`. Returns the base URL.
pub async fn serve_distributor(
    witnesses: Vec<String>,
    checkpoints: HashMap<(LogId, usize), Vec<u8>>,
) -> String {
    let listing = serde_json::to_string(&witnesses).expect("encode witnesses");
    let by_path: HashMap<(String, String), Bytes> = checkpoints
        .into_iter()
        .map(|((id, n), data)| ((id.to_string(), format!("checkpoint.{n}")), Bytes::from(data)))
        .collect();

    let app = Router::new()
        .route(
            "/distributor/v0/witnesses",
            get(move || {
                let listing = listing.clone();
                async move { listing }
            }),
        )
        .route(
            "/distributor/v0/logs/{id}/{file}",
            get(move |UrlPath(key): UrlPath<(String, String)>| {
                let found = by_path.get(&key).cloned();
                async move {
                    let resp: Response = match found {
                        Some(data) => data.into_response(),
                        None => StatusCode::NOT_FOUND.into_response(),
                    };
                    resp
                }
            }),
        );
    serve(app).await
}
