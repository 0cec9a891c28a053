//! Error types for note and checkpoint verification.

/// Errors that can occur while opening notes or parsing checkpoints.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NoteError {
    /// The verifier key string is not of the form `name+hash+key`.
    #[error("malformed verifier key: {0}")]
    MalformedKey(String),

    /// The key's embedded hash does not match its name and key bytes.
    #[error("verifier key hash mismatch for {name}")]
    KeyHashMismatch {
        /// Key name from the verifier string.
        name: String,
    },

    /// The key uses an algorithm this client does not support, or one not
    /// allowed where it was supplied.
    #[error("unsupported key algorithm {0:#04x}")]
    UnsupportedAlgorithm(u8),

    /// The note text or signature block could not be parsed.
    #[error("malformed note: {0}")]
    MalformedNote(&'static str),

    /// A known signer's signature did not verify.
    #[error("invalid signature for key {name}+{hash:08x}")]
    InvalidSignature {
        /// Signer name.
        name: String,
        /// Signer key hash.
        hash: u32,
    },

    /// No signature on the note came from a known verifier.
    #[error("note has no verifiable signatures")]
    Unverified,

    /// The note verified, but not with the log's own key.
    #[error("checkpoint is not signed by log key {0}")]
    NoLogSignature(String),

    /// The checkpoint body is malformed.
    #[error("invalid checkpoint: {0}")]
    InvalidCheckpoint(String),

    /// The checkpoint names a different log than the one requested.
    #[error("checkpoint origin mismatch: got {actual:?}, want {expected:?}")]
    OriginMismatch {
        /// Origin the caller asked for.
        expected: String,
        /// Origin found in the checkpoint.
        actual: String,
    },
}
