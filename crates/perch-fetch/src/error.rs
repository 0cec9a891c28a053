//! Error types for blob fetching.

/// Errors that can occur while fetching a blob.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The blob does not exist (HTTP 404 or missing file).
    #[error("not found: {0}")]
    NotFound(String),

    /// The server answered with a status other than 200 or 404.
    #[error("unexpected http status {status} fetching {url}")]
    Status {
        /// URL that was requested.
        url: String,
        /// Status code returned.
        status: u16,
    },

    /// The HTTP request failed before a response arrived.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// An I/O error occurred reading a local file.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The base location uses a scheme no fetcher handles.
    #[error("unsupported URL scheme {0:?}")]
    UnsupportedScheme(String),

    /// The base location or a path relative to it could not be parsed.
    #[error("invalid url {url:?}: {reason}")]
    InvalidUrl {
        /// The offending input.
        url: String,
        /// Why it was rejected.
        reason: String,
    },
}

impl FetchError {
    /// Whether this error means "the blob is absent" rather than a fault.
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::NotFound(_))
    }
}
