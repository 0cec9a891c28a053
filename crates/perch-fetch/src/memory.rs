//! In-memory fetcher.

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};

use bytes::Bytes;
use tracing::debug;

use crate::error::FetchError;
use crate::fetcher::Fetcher;

/// Fetcher serving blobs from a `RwLock<HashMap>` keyed by the exact path
/// requested.
///
/// Useful for testing log clients without touching disk or network. Counts
/// every request, including ones that miss.
#[derive(Default)]
pub struct MemoryFetcher {
    blobs: RwLock<HashMap<String, Bytes>>,
    requests: AtomicUsize,
}

impl MemoryFetcher {
    /// Create an empty fetcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `data` under `path`, replacing any previous blob.
    pub fn insert(&self, path: impl Into<String>, data: impl Into<Bytes>) {
        let mut map = self.blobs.write().expect("lock poisoned");
        map.insert(path.into(), data.into());
    }

    /// Remove the blob at `path`.
    pub fn remove(&self, path: &str) {
        let mut map = self.blobs.write().expect("lock poisoned");
        map.remove(path);
    }

    /// Total number of `fetch` calls served so far.
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Fetcher for MemoryFetcher {
    async fn fetch(&self, path: &str) -> Result<Bytes, FetchError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let map = self.blobs.read().expect("lock poisoned");
        match map.get(path) {
            Some(data) => {
                debug!(path, size = data.len(), "serving blob from memory");
                Ok(data.clone())
            }
            None => Err(FetchError::NotFound(path.to_string())),
        }
    }
}
