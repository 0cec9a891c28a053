//! The view model the controller publishes into.
//!
//! [`ViewModel`] is the presentation-side sink. [`StateModel`] is the
//! in-memory implementation used by the binary and the tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use perch_note::SignedCheckpoint;
use perch_types::Leaf;

use crate::error::ControllerError;

/// Where the last refresh cycle left the published checkpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckpointStatus {
    /// No refresh has completed since the model was created. A refresh in
    /// flight keeps the previous result published, so this is never seen
    /// again once a first result lands.
    Loading,
    /// The log checkpoint verified; no witnessed checkpoint met the quorum.
    LogCheckpointOnly,
    /// Both the log checkpoint and a witnessed checkpoint are available.
    LogAndWitnessCheckpoint,
    /// The log checkpoint could not be fetched or verified.
    LogCheckpointFailed,
}

/// The result of one refresh cycle, published as a unit.
#[derive(Debug, Clone, Default)]
pub struct CheckpointState {
    /// The log's own checkpoint.
    pub log: Option<SignedCheckpoint>,
    /// The checkpoint cosigned by at least the quorum of witnesses.
    pub witnessed: Option<SignedCheckpoint>,
    /// Why the log checkpoint is missing, if it is.
    pub error: Option<Arc<ControllerError>>,
}

impl CheckpointState {
    /// Derive the display status.
    pub fn status(&self) -> CheckpointStatus {
        match (&self.log, &self.witnessed, &self.error) {
            (_, _, Some(_)) => CheckpointStatus::LogCheckpointFailed,
            (None, _, None) => CheckpointStatus::Loading,
            (Some(_), None, None) => CheckpointStatus::LogCheckpointOnly,
            (Some(_), Some(_), None) => CheckpointStatus::LogAndWitnessCheckpoint,
        }
    }

    /// Tree size of the log checkpoint.
    pub fn size(&self) -> Option<u64> {
        self.log.as_ref().map(|cp| cp.checkpoint.size)
    }
}

/// The selected leaf and the outcome of the last leaf operation.
#[derive(Debug, Clone, Default)]
pub struct LeafState {
    /// The selected leaf, if any.
    pub leaf: Option<Leaf>,
    /// Why the last leaf operation failed, if it did.
    pub error: Option<Arc<ControllerError>>,
}

/// Sink for everything the controller publishes.
///
/// Implementations must make each `set_*` call visible atomically: a reader
/// never sees the log checkpoint of one refresh with the witnessed
/// checkpoint of another.
pub trait ViewModel: Send + Sync {
    /// Publish the result of a refresh cycle.
    fn set_checkpoint(
        &self,
        log: Option<SignedCheckpoint>,
        witnessed: Option<SignedCheckpoint>,
        error: Option<ControllerError>,
    );

    /// Publish the selected leaf and the outcome of the operation.
    fn set_leaf(&self, leaf: Option<Leaf>, error: Option<ControllerError>);

    /// The last published refresh result.
    fn checkpoint(&self) -> CheckpointState;

    /// The last published leaf state.
    fn leaf(&self) -> LeafState;

    /// Current witness quorum size.
    fn witness_n(&self) -> usize;

    /// Set the witness quorum size.
    fn set_witness_n(&self, n: usize);
}

/// In-memory [`ViewModel`].
pub struct StateModel {
    checkpoint: RwLock<CheckpointState>,
    leaf: RwLock<LeafState>,
    witness_n: AtomicUsize,
}

impl StateModel {
    /// Create an empty model with quorum size `witness_n` (at least 1).
    pub fn new(witness_n: usize) -> Self {
        Self {
            checkpoint: RwLock::new(CheckpointState::default()),
            leaf: RwLock::new(LeafState::default()),
            witness_n: AtomicUsize::new(witness_n.max(1)),
        }
    }
}

impl Default for StateModel {
    fn default() -> Self {
        Self::new(1)
    }
}

impl ViewModel for StateModel {
    fn set_checkpoint(
        &self,
        log: Option<SignedCheckpoint>,
        witnessed: Option<SignedCheckpoint>,
        error: Option<ControllerError>,
    ) {
        let state = CheckpointState {
            log,
            witnessed,
            error: error.map(Arc::new),
        };
        *self.checkpoint.write().expect("lock poisoned") = state;
    }

    fn set_leaf(&self, leaf: Option<Leaf>, error: Option<ControllerError>) {
        let state = LeafState {
            leaf,
            error: error.map(Arc::new),
        };
        *self.leaf.write().expect("lock poisoned") = state;
    }

    fn checkpoint(&self) -> CheckpointState {
        self.checkpoint.read().expect("lock poisoned").clone()
    }

    fn leaf(&self) -> LeafState {
        self.leaf.read().expect("lock poisoned").clone()
    }

    fn witness_n(&self) -> usize {
        self.witness_n.load(Ordering::SeqCst)
    }

    fn set_witness_n(&self, n: usize) {
        self.witness_n.store(n, Ordering::SeqCst);
    }
}
