//! A [`ViewModel`] that reports every published update through `tracing`.

use perch_engine::{
    CheckpointState, CheckpointStatus, ControllerError, LeafState, StateModel, ViewModel,
};
use perch_note::SignedCheckpoint;
use perch_types::Leaf;
use tracing::{info, warn};

/// Holds state in a [`StateModel`] and logs each change.
pub struct ConsoleView {
    state: StateModel,
}

impl ConsoleView {
    /// A view starting at quorum `witness_n` with nothing published.
    pub fn new(witness_n: usize) -> Self {
        Self {
            state: StateModel::new(witness_n),
        }
    }
}

/// What one successful refresh reports.
#[derive(Debug, PartialEq, Eq)]
struct CheckpointReport {
    origin: String,
    size: u64,
    root: String,
    witnessed_size: Option<u64>,
    status: CheckpointStatus,
}

impl CheckpointReport {
    fn new(log: &SignedCheckpoint, witnessed: Option<&SignedCheckpoint>) -> Self {
        let status = if witnessed.is_some() {
            CheckpointStatus::LogAndWitnessCheckpoint
        } else {
            CheckpointStatus::LogCheckpointOnly
        };
        Self {
            origin: log.checkpoint.origin.clone(),
            size: log.checkpoint.size,
            root: hex::encode(log.checkpoint.root_hash),
            witnessed_size: witnessed.map(|cp| cp.checkpoint.size),
            status,
        }
    }
}

impl ViewModel for ConsoleView {
    fn set_checkpoint(
        &self,
        log: Option<SignedCheckpoint>,
        witnessed: Option<SignedCheckpoint>,
        error: Option<ControllerError>,
    ) {
        match (&log, &error) {
            (_, Some(e)) => warn!(kind = ?e.kind(), error = %e, "log checkpoint unavailable"),
            (Some(cp), None) => {
                let report = CheckpointReport::new(cp, witnessed.as_ref());
                info!(
                    origin = %report.origin,
                    size = report.size,
                    root = %report.root,
                    witnessed_size = ?report.witnessed_size,
                    witnesses = self.state.witness_n(),
                    status = ?report.status,
                    "checkpoint"
                );
            }
            (None, None) => {}
        }
        self.state.set_checkpoint(log, witnessed, error);
    }

    fn set_leaf(&self, leaf: Option<Leaf>, error: Option<ControllerError>) {
        match (&leaf, &error) {
            (_, Some(e)) => warn!(kind = ?e.kind(), error = %e, "leaf unavailable"),
            (Some(l), None) => info!(index = l.index, len = l.contents.len(), "leaf"),
            (None, None) => {}
        }
        self.state.set_leaf(leaf, error);
    }

    fn checkpoint(&self) -> CheckpointState {
        self.state.checkpoint()
    }

    fn leaf(&self) -> LeafState {
        self.state.leaf()
    }

    fn witness_n(&self) -> usize {
        self.state.witness_n()
    }

    fn set_witness_n(&self, n: usize) {
        self.state.set_witness_n(n);
    }
}
