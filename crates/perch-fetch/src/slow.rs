//! A [`Fetcher`] wrapper that adds a fixed latency to every request.
//!
//! `SlowFetcher` wraps any `Arc<dyn Fetcher>`, records when each request
//! started, then sleeps before delegating. Tests use the recorded start
//! instants to check that independent fetches overlap in time.
//!
//! # Example
//!
//! ```ignore
//! let slow = SlowFetcher::new(inner).latency(Duration::from_millis(200));
//! ```

use std::sync::{Arc, Mutex};
use std::time::Duration;

use bytes::Bytes;
use tokio::time::Instant;

use crate::error::FetchError;
use crate::fetcher::Fetcher;

/// A [`Fetcher`] wrapper that injects latency before each request.
pub struct SlowFetcher {
    inner: Arc<dyn Fetcher>,
    latency: Duration,
    started: Mutex<Vec<Instant>>,
}

impl SlowFetcher {
    /// Wrap an existing fetcher with zero latency (pass-through) by default.
    pub fn new(inner: Arc<dyn Fetcher>) -> Self {
        Self {
            inner,
            latency: Duration::ZERO,
            started: Mutex::new(Vec::new()),
        }
    }

    /// Set the per-request latency.
    pub fn latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Instants at which each request started, in arrival order.
    pub fn started(&self) -> Vec<Instant> {
        self.started.lock().expect("lock poisoned").clone()
    }
}

#[async_trait::async_trait]
impl Fetcher for SlowFetcher {
    async fn fetch(&self, path: &str) -> Result<Bytes, FetchError> {
        self.started.lock().expect("lock poisoned").push(Instant::now());
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.inner.fetch(path).await
    }
}
