//! Client for logs following the tlog-tiles layout.

use std::sync::Arc;

use bytes::Bytes;
use perch_fetch::Fetcher;
use perch_note::{NoteVerifier, SignedCheckpoint};
use perch_types::LogFormat;
use tracing::info;

use crate::client::{LogClient, fetch_checkpoint, fetch_leaf, log_fetcher, log_verifier};
use crate::error::LogError;
use crate::layout::{decode_tiles_bundle, tiles_address};

/// A tlog-tiles log: checkpoint at `checkpoint`, leaves packed 256 to an
/// entry bundle under `tile/entries/`.
pub struct TilesLogClient {
    origin: String,
    verifier: NoteVerifier,
    fetcher: Arc<dyn Fetcher>,
}

impl TilesLogClient {
    /// Create a client for the log rooted at `url`.
    pub fn new(url: &str, origin: &str, vkey: &str) -> Result<Self, LogError> {
        let fetcher = log_fetcher(url, true)?;
        let verifier = log_verifier(vkey)?;
        Ok(Self::with_fetcher(fetcher, origin, verifier))
    }

    /// Create a client over an existing fetcher.
    ///
    /// An empty `origin` falls back to the verifier's name.
    pub fn with_fetcher(fetcher: Arc<dyn Fetcher>, origin: &str, verifier: NoteVerifier) -> Self {
        let origin = if origin.is_empty() {
            info!(origin = verifier.name(), "no origin provided, using verifier name");
            verifier.name().to_string()
        } else {
            origin.to_string()
        };
        Self {
            origin,
            verifier,
            fetcher,
        }
    }
}

#[async_trait::async_trait]
impl LogClient for TilesLogClient {
    fn origin(&self) -> &str {
        &self.origin
    }

    fn verifier(&self) -> &NoteVerifier {
        &self.verifier
    }

    fn format(&self) -> LogFormat {
        LogFormat::Tiles
    }

    async fn checkpoint(&self) -> Result<SignedCheckpoint, LogError> {
        fetch_checkpoint(self.fetcher.as_ref(), "checkpoint", &self.origin, &self.verifier).await
    }

    // TODO: keep the last bundle around so stepping through neighbouring
    // leaves does not refetch it.
    async fn leaf(&self, tree_size: u64, index: u64) -> Result<Bytes, LogError> {
        fetch_leaf(
            self.fetcher.as_ref(),
            tiles_address(tree_size, index),
            decode_tiles_bundle,
        )
        .await
    }
}
