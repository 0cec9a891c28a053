//! Distributor trait and its REST implementation.
//!
//! A distributor collects witness cosignatures for many logs and serves,
//! per log, the latest checkpoint carrying at least `n` of them.

use bytes::Bytes;
use perch_types::LogId;
use reqwest::StatusCode;
use tracing::{debug, info};
use url::Url;

use crate::error::WitnessError;

/// Public instance run by transparency.dev.
pub const DEFAULT_DISTRIBUTOR_URL: &str = "https://api.transparency.dev";

/// Source of witness keys and witnessed checkpoints.
#[async_trait::async_trait]
pub trait Distributor: Send + Sync {
    /// Verifier keys of every witness the distributor knows.
    async fn witnesses(&self) -> Result<Vec<String>, WitnessError>;

    /// The newest checkpoint for `log_id` cosigned by at least `n`
    /// witnesses, as raw note bytes.
    async fn checkpoint_n(&self, log_id: &LogId, n: usize) -> Result<Bytes, WitnessError>;
}

// ---------------------------------------------------------------------------
// REST
// ---------------------------------------------------------------------------

/// Distributor reached over its `distributor/v0` HTTP API.
pub struct RestDistributor {
    base: Url,
    client: reqwest::Client,
}

impl RestDistributor {
    /// Create a client for the distributor at `base`.
    pub fn new(base: &str) -> Result<Self, WitnessError> {
        Self::with_client(base, reqwest::Client::new())
    }

    /// Create a client sharing an existing HTTP client.
    pub fn with_client(base: &str, client: reqwest::Client) -> Result<Self, WitnessError> {
        let mut root = base.to_string();
        if !root.ends_with('/') {
            root.push('/');
        }
        let base = Url::parse(&root).map_err(|e| WitnessError::InvalidUrl {
            url: root.clone(),
            reason: e.to_string(),
        })?;
        match base.scheme() {
            "http" | "https" => Ok(Self { base, client }),
            other => Err(WitnessError::InvalidUrl {
                url: root,
                reason: format!("unsupported scheme {other}"),
            }),
        }
    }

    fn url(&self, path: &str) -> Result<Url, WitnessError> {
        self.base.join(path).map_err(|e| WitnessError::InvalidUrl {
            url: format!("{}{path}", self.base),
            reason: e.to_string(),
        })
    }

    async fn get(&self, url: Url) -> Result<Bytes, WitnessError> {
        let resp = self.client.get(url.clone()).send().await?;
        match resp.status() {
            StatusCode::OK => Ok(resp.bytes().await?),
            StatusCode::NOT_FOUND => {
                info!(%url, "not found");
                Err(WitnessError::NotFound(url.to_string()))
            }
            status => Err(WitnessError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            }),
        }
    }
}

#[async_trait::async_trait]
impl Distributor for RestDistributor {
    async fn witnesses(&self) -> Result<Vec<String>, WitnessError> {
        let body = self.get(self.url("distributor/v0/witnesses")?).await?;
        let keys: Vec<String> = serde_json::from_slice(&body)?;
        debug!(count = keys.len(), "fetched witness keys");
        Ok(keys)
    }

    async fn checkpoint_n(&self, log_id: &LogId, n: usize) -> Result<Bytes, WitnessError> {
        let url = self.url(&format!("distributor/v0/logs/{log_id}/checkpoint.{n}"))?;
        let body = self.get(url).await?;
        debug!(%log_id, n, size = body.len(), "fetched witnessed checkpoint");
        Ok(body)
    }
}
