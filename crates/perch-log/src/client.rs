//! The [`LogClient`] trait and helpers shared by its implementations.

use std::sync::Arc;

use bytes::Bytes;
use perch_fetch::{Fetcher, new_fetcher, parse_root};
use perch_note::{NoteVerifier, SignedCheckpoint, parse_checkpoint};
use perch_types::LogFormat;
use serde::Deserialize;
use tracing::debug;

use crate::error::LogError;
use crate::layout::LeafAddress;
use crate::serverless::ServerlessLogClient;
use crate::sumdb::SumDbLogClient;
use crate::tiles::TilesLogClient;

/// Read access to one transparency log.
///
/// Implementations differ only in how they address checkpoints and leaves;
/// all of them verify the checkpoint against the log's own key.
#[async_trait::async_trait]
pub trait LogClient: Send + Sync {
    /// The log's origin line.
    fn origin(&self) -> &str;

    /// The log's signature verifier.
    fn verifier(&self) -> &NoteVerifier;

    /// Which layout this client speaks.
    fn format(&self) -> LogFormat;

    /// Fetch and verify the log's latest checkpoint.
    async fn checkpoint(&self) -> Result<SignedCheckpoint, LogError>;

    /// Fetch leaf `index` of a tree with `tree_size` leaves.
    ///
    /// Callers must ensure `index < tree_size`; the tree size is needed to
    /// name partial bundles.
    async fn leaf(&self, tree_size: u64, index: u64) -> Result<Bytes, LogError>;
}

/// How to reach a log: where it lives, who it is, and which layout it uses.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LogConfig {
    /// Base URL (`https://`, `http://` or `file://`).
    pub url: String,
    /// Origin line. For tiles logs an empty origin defaults to the key name.
    #[serde(default)]
    pub origin: String,
    /// Verifier key of the log, `name+hash+key`.
    pub vkey: String,
    /// Layout of the log.
    pub format: LogFormat,
}

impl LogConfig {
    /// Build a config from its parts.
    pub fn new(url: &str, origin: &str, vkey: &str, format: LogFormat) -> Self {
        Self {
            url: url.to_string(),
            origin: origin.to_string(),
            vkey: vkey.to_string(),
            format,
        }
    }
}

/// Construct the client matching `config.format`.
pub fn build_client(config: &LogConfig) -> Result<Arc<dyn LogClient>, LogError> {
    let client: Arc<dyn LogClient> = match config.format {
        LogFormat::Tiles => Arc::new(TilesLogClient::new(
            &config.url,
            &config.origin,
            &config.vkey,
        )?),
        LogFormat::Serverless => Arc::new(ServerlessLogClient::new(
            &config.url,
            &config.origin,
            &config.vkey,
        )?),
        LogFormat::SumDb => Arc::new(SumDbLogClient::new(
            &config.url,
            &config.origin,
            &config.vkey,
        )?),
    };
    Ok(client)
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Parse a log's verifier key. Logs sign with plain Ed25519.
pub(crate) fn log_verifier(vkey: &str) -> Result<NoteVerifier, LogError> {
    NoteVerifier::new_ed25519(vkey)
        .map_err(|e| LogError::Config(format!("verifier key {vkey:?}: {e}")))
}

/// Build a fetcher for a log root. With `dir` set, a missing trailing `/`
/// is added so relative paths resolve beneath the root.
pub(crate) fn log_fetcher(url: &str, dir: bool) -> Result<Arc<dyn Fetcher>, LogError> {
    let root = parse_root(url, dir).map_err(|e| LogError::Config(format!("log url {url:?}: {e}")))?;
    new_fetcher(root).map_err(|e| LogError::Config(format!("log url {url:?}: {e}")))
}

/// Fetch the note at `path` and verify it as `origin`'s checkpoint.
pub(crate) async fn fetch_checkpoint(
    fetcher: &dyn Fetcher,
    path: &str,
    origin: &str,
    verifier: &NoteVerifier,
) -> Result<SignedCheckpoint, LogError> {
    let raw = fetcher.fetch(path).await?;
    let signed = parse_checkpoint(raw, origin, verifier, &[])?;
    debug!(
        origin,
        size = signed.checkpoint.size,
        "fetched log checkpoint"
    );
    Ok(signed)
}

/// Fetch the blob at `address`, split it with `decode` and pick out the leaf.
pub(crate) async fn fetch_leaf<F>(
    fetcher: &dyn Fetcher,
    address: LeafAddress,
    decode: F,
) -> Result<Bytes, LogError>
where
    F: FnOnce(&Bytes) -> Result<Vec<Bytes>, LogError>,
{
    let data = fetcher.fetch(&address.path).await?;
    let mut leaves = decode(&data)?;
    if address.offset >= leaves.len() {
        return Err(LogError::NotFound(format!(
            "{} holds {} entries, wanted offset {}",
            address.path,
            leaves.len(),
            address.offset
        )));
    }
    debug!(path = %address.path, offset = address.offset, "fetched leaf");
    Ok(leaves.swap_remove(address.offset))
}
