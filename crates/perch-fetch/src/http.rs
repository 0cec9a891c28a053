//! HTTP(S) fetcher for remote log roots.

use bytes::Bytes;
use reqwest::StatusCode;
use tracing::{debug, info};
use url::Url;

use crate::error::FetchError;
use crate::fetcher::{Fetcher, resolve};

/// Fetcher that issues a GET per blob.
///
/// `200` yields the body, `404` yields [`FetchError::NotFound`], anything
/// else is [`FetchError::Status`]. Timeouts are the client's defaults.
pub struct HttpFetcher {
    root: Url,
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher rooted at an `http://` or `https://` URL.
    pub fn new(root: Url) -> Result<Self, FetchError> {
        Self::with_client(root, reqwest::Client::new())
    }

    /// Create a fetcher sharing an existing client.
    pub fn with_client(root: Url, client: reqwest::Client) -> Result<Self, FetchError> {
        match root.scheme() {
            "http" | "https" => Ok(Self { root, client }),
            other => Err(FetchError::UnsupportedScheme(other.to_string())),
        }
    }
}

#[async_trait::async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, path: &str) -> Result<Bytes, FetchError> {
        let url = resolve(&self.root, path)?;
        let resp = self.client.get(url.clone()).send().await?;

        match resp.status() {
            StatusCode::OK => {
                let body = resp.bytes().await?;
                debug!(%url, size = body.len(), "fetched blob");
                Ok(body)
            }
            StatusCode::NOT_FOUND => {
                info!(%url, "not found");
                Err(FetchError::NotFound(url.to_string()))
            }
            status => Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            }),
        }
    }
}
