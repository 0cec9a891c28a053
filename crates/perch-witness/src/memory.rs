//! In-memory distributor.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use bytes::Bytes;
use perch_types::LogId;
use tokio::time::Instant;

use crate::distributor::Distributor;
use crate::error::WitnessError;

/// Distributor serving a fixed witness list and pre-loaded checkpoints.
///
/// Checkpoints are keyed by `(log_id, n)`. Every `checkpoint_n` call is
/// recorded with its start instant, and an optional latency is applied
/// before answering.
#[derive(Default)]
pub struct MemoryDistributor {
    witnesses: Vec<String>,
    checkpoints: Mutex<HashMap<(LogId, usize), Bytes>>,
    requests: Mutex<Vec<(LogId, usize, Instant)>>,
    latency: Duration,
}

impl MemoryDistributor {
    /// A distributor knowing the given witness keys.
    pub fn new(witnesses: Vec<String>) -> Self {
        Self {
            witnesses,
            ..Self::default()
        }
    }

    /// Delay every `checkpoint_n` answer by `latency`.
    pub fn latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Serve `data` for requests of `(log_id, n)`.
    pub fn set_checkpoint(&self, log_id: LogId, n: usize, data: impl Into<Bytes>) {
        let mut map = self.checkpoints.lock().expect("lock poisoned");
        map.insert((log_id, n), data.into());
    }

    /// `(log_id, n)` of each `checkpoint_n` call so far.
    pub fn requests(&self) -> Vec<(LogId, usize)> {
        let requests = self.requests.lock().expect("lock poisoned");
        requests.iter().map(|(id, n, _)| (*id, *n)).collect()
    }

    /// Start instant of each `checkpoint_n` call so far.
    pub fn started(&self) -> Vec<Instant> {
        let requests = self.requests.lock().expect("lock poisoned");
        requests.iter().map(|(_, _, at)| *at).collect()
    }
}

#[async_trait::async_trait]
impl Distributor for MemoryDistributor {
    async fn witnesses(&self) -> Result<Vec<String>, WitnessError> {
        Ok(self.witnesses.clone())
    }

    async fn checkpoint_n(&self, log_id: &LogId, n: usize) -> Result<Bytes, WitnessError> {
        self.requests
            .lock()
            .expect("lock poisoned")
            .push((*log_id, n, Instant::now()));
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        let map = self.checkpoints.lock().expect("lock poisoned");
        map.get(&(*log_id, n))
            .cloned()
            .ok_or_else(|| WitnessError::NotFound(format!("{log_id}/checkpoint.{n}")))
    }
}
