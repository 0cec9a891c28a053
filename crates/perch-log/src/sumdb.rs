//! Client for checksum-database logs such as `sum.golang.org`.

use std::sync::Arc;

use bytes::Bytes;
use perch_fetch::Fetcher;
use perch_note::{NoteVerifier, SignedCheckpoint};
use perch_types::LogFormat;

use crate::client::{LogClient, fetch_checkpoint, fetch_leaf, log_fetcher, log_verifier};
use crate::error::LogError;
use crate::layout::{decode_sumdb_bundle, sumdb_address};

/// Root-relative path of the latest signed tree head.
const LATEST_PATH: &str = "/latest";

/// A checksum-database log: checkpoint at `/latest`, records in data tiles
/// under `/tile/8/data/`.
///
/// Paths are absolute, so any path on the base URL is ignored.
pub struct SumDbLogClient {
    origin: String,
    verifier: NoteVerifier,
    fetcher: Arc<dyn Fetcher>,
}

impl SumDbLogClient {
    /// Create a client for the log served at `url`.
    pub fn new(url: &str, origin: &str, vkey: &str) -> Result<Self, LogError> {
        let fetcher = log_fetcher(url, false)?;
        let verifier = log_verifier(vkey)?;
        Ok(Self::with_fetcher(fetcher, origin, verifier))
    }

    /// Create a client over an existing fetcher.
    pub fn with_fetcher(fetcher: Arc<dyn Fetcher>, origin: &str, verifier: NoteVerifier) -> Self {
        Self {
            origin: origin.to_string(),
            verifier,
            fetcher,
        }
    }
}

#[async_trait::async_trait]
impl LogClient for SumDbLogClient {
    fn origin(&self) -> &str {
        &self.origin
    }

    fn verifier(&self) -> &NoteVerifier {
        &self.verifier
    }

    fn format(&self) -> LogFormat {
        LogFormat::SumDb
    }

    async fn checkpoint(&self) -> Result<SignedCheckpoint, LogError> {
        fetch_checkpoint(self.fetcher.as_ref(), LATEST_PATH, &self.origin, &self.verifier).await
    }

    async fn leaf(&self, _tree_size: u64, index: u64) -> Result<Bytes, LogError> {
        fetch_leaf(self.fetcher.as_ref(), sumdb_address(index), |data| {
            Ok(decode_sumdb_bundle(data))
        })
        .await
    }
}
