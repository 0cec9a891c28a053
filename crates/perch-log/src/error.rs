//! Error types for log clients.

use perch_fetch::FetchError;
use perch_note::NoteError;

/// Errors that can occur while talking to a log.
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    /// The client could not be constructed from its settings.
    #[error("invalid log configuration: {0}")]
    Config(String),

    /// The requested checkpoint, bundle or leaf does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Transport failure other than a missing blob.
    #[error("fetch error: {0}")]
    Fetch(FetchError),

    /// The checkpoint failed to parse or verify.
    #[error("checkpoint verification failed: {0}")]
    Verification(#[from] NoteError),

    /// A fetched bundle could not be decoded.
    #[error("malformed bundle: {0}")]
    MalformedBundle(String),
}

impl From<FetchError> for LogError {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::NotFound(what) => LogError::NotFound(what),
            other => LogError::Fetch(other),
        }
    }
}
