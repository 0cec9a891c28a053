//! Client for serverless logs, which store one file per leaf.

use std::sync::Arc;

use bytes::Bytes;
use perch_fetch::Fetcher;
use perch_note::{NoteVerifier, SignedCheckpoint};
use perch_types::LogFormat;

use crate::client::{LogClient, fetch_checkpoint, fetch_leaf, log_fetcher, log_verifier};
use crate::error::LogError;
use crate::layout::serverless_address;

/// A serverless log: checkpoint at `checkpoint`, leaf `i` at
/// `seq/<hh>/<hh>/<hh>/<hh>/<hh>`.
pub struct ServerlessLogClient {
    origin: String,
    verifier: NoteVerifier,
    fetcher: Arc<dyn Fetcher>,
}

impl ServerlessLogClient {
    /// Create a client for the log rooted at `url`.
    pub fn new(url: &str, origin: &str, vkey: &str) -> Result<Self, LogError> {
        let fetcher = log_fetcher(url, true)?;
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
impl LogClient for ServerlessLogClient {
    fn origin(&self) -> &str {
        &self.origin
    }

    fn verifier(&self) -> &NoteVerifier {
        &self.verifier
    }

    fn format(&self) -> LogFormat {
        LogFormat::Serverless
    }

    async fn checkpoint(&self) -> Result<SignedCheckpoint, LogError> {
        fetch_checkpoint(self.fetcher.as_ref(), "checkpoint", &self.origin, &self.verifier).await
    }

    async fn leaf(&self, _tree_size: u64, index: u64) -> Result<Bytes, LogError> {
        fetch_leaf(self.fetcher.as_ref(), serverless_address(index), |data| {
            Ok(vec![data.clone()])
        })
        .await
    }
}
