//! Blob fetching for transparency log clients.
//!
//! This crate defines the [`Fetcher`] trait for reading blobs relative to a
//! log's base location, along with its backends:
//!
//! - [`HttpFetcher`]: `http://` and `https://` roots, one GET per blob.
//! - [`FileFetcher`]: `file://` roots on local disk.
//! - [`MemoryFetcher`]: in-memory map, for tests.
//! - [`SlowFetcher`]: latency-injecting wrapper, for tests.
//!
//! [`new_fetcher`] picks a backend from the root URL's scheme.

mod error;
mod fetcher;
mod file;
mod http;
mod memory;
mod slow;

use std::sync::Arc;

use url::Url;

pub use error::FetchError;
pub use fetcher::Fetcher;
pub use file::FileFetcher;
pub use http::HttpFetcher;
pub use memory::MemoryFetcher;
pub use slow::SlowFetcher;

/// Create a fetcher for the log rooted at `root`, dispatching on its scheme.
///
/// Unknown schemes fail here rather than on the first request.
pub fn new_fetcher(root: Url) -> Result<Arc<dyn Fetcher>, FetchError> {
    match root.scheme() {
        "http" | "https" => Ok(Arc::new(HttpFetcher::new(root)?)),
        "file" => Ok(Arc::new(FileFetcher::new(root)?)),
        other => Err(FetchError::UnsupportedScheme(other.to_string())),
    }
}

/// Parse a base location string, appending a trailing `/` if `dir` is set
/// so that relative paths resolve underneath it.
pub fn parse_root(location: &str, dir: bool) -> Result<Url, FetchError> {
    let location = if dir && !location.ends_with('/') {
        format!("{location}/")
    } else {
        location.to_string()
    };
    Url::parse(&location).map_err(|e| FetchError::InvalidUrl {
        url: location.clone(),
        reason: e.to_string(),
    })
}
