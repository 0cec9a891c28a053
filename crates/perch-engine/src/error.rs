//! Error types for the controller.

use perch_fetch::FetchError;
use perch_log::LogError;

/// Errors published by the [`Controller`](crate::Controller).
///
/// None of these are returned to callers; they travel with the state the
/// controller publishes to its view model.
#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    /// The requested leaf is at or past the end of the tree.
    #[error("leaf {index} is outside tree of size {size}")]
    Bounds {
        /// Requested leaf index.
        index: u64,
        /// Tree size of the published checkpoint.
        size: u64,
    },

    /// Stepping back from the first leaf.
    #[error("no leaf before index 0")]
    BeforeFirstLeaf,

    /// Navigation needs a published log checkpoint and there is none.
    #[error("no checkpoint available")]
    NoCheckpoint,

    /// No log has been selected yet.
    #[error("no log selected")]
    NoLogSelected,

    /// The log client failed.
    #[error(transparent)]
    Log(#[from] LogError),
}

/// Coarse classification of a [`ControllerError`] for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Something does not exist (yet).
    NotFound,
    /// The log could not be reached.
    Transport,
    /// The log answered, but what it sent did not check out.
    Verification,
    /// A leaf index outside the tree.
    Bounds,
    /// The session is not set up to do this.
    Configuration,
}

impl ControllerError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ControllerError::Bounds { .. } | ControllerError::BeforeFirstLeaf => ErrorKind::Bounds,
            ControllerError::NoCheckpoint => ErrorKind::NotFound,
            ControllerError::NoLogSelected => ErrorKind::Configuration,
            ControllerError::Log(e) => match e {
                LogError::Config(_) => ErrorKind::Configuration,
                LogError::NotFound(_) => ErrorKind::NotFound,
                LogError::Fetch(FetchError::UnsupportedScheme(_) | FetchError::InvalidUrl { .. }) => {
                    ErrorKind::Configuration
                }
                LogError::Fetch(_) => ErrorKind::Transport,
                LogError::Verification(_) | LogError::MalformedBundle(_) => ErrorKind::Verification,
            },
        }
    }
}
