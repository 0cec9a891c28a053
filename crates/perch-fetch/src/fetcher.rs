//! Core trait for blob retrieval.

use bytes::Bytes;
use url::Url;

use crate::error::FetchError;

/// Trait for retrieving blobs stored relative to a log's base location.
///
/// All implementations must be `Send + Sync` for use across async tasks.
/// A fetcher neither retries nor caches; callers that want either add it
/// above this layer.
#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch the blob at `path`, resolved against the fetcher's base.
    ///
    /// Returns [`FetchError::NotFound`] when the blob does not exist.
    async fn fetch(&self, path: &str) -> Result<Bytes, FetchError>;
}

/// Resolve `path` against `root` using standard URL reference resolution.
///
/// Relative paths land under `root` when it ends in `/`; paths starting
/// with `/` replace the root's path entirely.
pub(crate) fn resolve(root: &Url, path: &str) -> Result<Url, FetchError> {
    root.join(path).map_err(|e| FetchError::InvalidUrl {
        url: path.to_string(),
        reason: e.to_string(),
    })
}
