//! Error types for witness distribution and quorum checks.

use perch_note::NoteError;

/// Errors that can occur while talking to a distributor or checking a
/// witnessed checkpoint.
#[derive(Debug, thiserror::Error)]
pub enum WitnessError {
    /// A witness verifier key could not be parsed as a cosignature-v1 key.
    #[error("invalid witness key {vkey:?}: {source}")]
    InvalidKey {
        /// The offending key string.
        vkey: String,
        /// Why it was rejected.
        source: NoteError,
    },

    /// The distributor base URL is unusable.
    #[error("invalid distributor url {url:?}: {reason}")]
    InvalidUrl {
        /// The URL as given.
        url: String,
        /// Parser message.
        reason: String,
    },

    /// The distributor has nothing at the requested path.
    #[error("not found: {0}")]
    NotFound(String),

    /// The distributor answered with an unexpected status.
    #[error("unexpected status {status} for {url}")]
    Status {
        /// Request URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// Underlying HTTP failure.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The witness list was not a JSON array of strings.
    #[error("invalid witness list: {0}")]
    Decode(#[from] serde_json::Error),

    /// The witnessed checkpoint failed to open or verify.
    #[error("witnessed checkpoint rejected: {0}")]
    Verification(#[from] NoteError),

    /// Fewer witnesses cosigned than required.
    #[error("checkpoint has {got} of {wanted} required witness cosignatures")]
    QuorumNotMet {
        /// Required number of cosignatures.
        wanted: usize,
        /// Cosignatures that verified.
        got: usize,
    },
}
