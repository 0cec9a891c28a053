//! Local filesystem fetcher for `file://` log roots.

use bytes::Bytes;
use tracing::debug;
use url::Url;

use crate::error::FetchError;
use crate::fetcher::{Fetcher, resolve};

/// Fetcher that reads blobs from local disk.
///
/// Paths are resolved against the root URL and then mapped back to a
/// filesystem path, so `file:///srv/log/` + `tile/entries/000` reads
/// `/srv/log/tile/entries/000`.
pub struct FileFetcher {
    root: Url,
}

impl FileFetcher {
    /// Create a fetcher rooted at a `file://` URL.
    pub fn new(root: Url) -> Result<Self, FetchError> {
        if root.scheme() != "file" {
            return Err(FetchError::UnsupportedScheme(root.scheme().to_string()));
        }
        Ok(Self { root })
    }
}

#[async_trait::async_trait]
impl Fetcher for FileFetcher {
    async fn fetch(&self, path: &str) -> Result<Bytes, FetchError> {
        let url = resolve(&self.root, path)?;
        let file_path = url.to_file_path().map_err(|()| FetchError::InvalidUrl {
            url: url.to_string(),
            reason: "not a local file path".to_string(),
        })?;

        match tokio::fs::read(&file_path).await {
            Ok(data) => {
                debug!(path = %file_path.display(), size = data.len(), "read blob from file");
                Ok(Bytes::from(data))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %file_path.display(), "file not found");
                Err(FetchError::NotFound(url.to_string()))
            }
            Err(e) => Err(FetchError::Io(e)),
        }
    }
}
