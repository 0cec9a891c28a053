//! [`Controller`]: drives checkpoint refresh and leaf navigation.
//!
//! Every operation publishes its outcome to the [`ViewModel`], errors
//! included. Nothing is returned to the caller except whether a log was
//! selected.
//!
//! Refresh cycles are not sequenced against each other: when an operator
//! action overlaps the periodic refresh, whichever cycle finishes last wins,
//! even if it started first.

use std::sync::{Arc, RwLock};

use bytes::Bytes;
use perch_log::{LogClient, LogRegistry};
use perch_types::Leaf;
use perch_witness::QuorumVerifier;
use tracing::{debug, info, warn};

use crate::error::ControllerError;
use crate::model::ViewModel;

/// Owns the selected log and mediates every read against it.
pub struct Controller {
    registry: LogRegistry,
    quorum: Arc<QuorumVerifier>,
    model: Arc<dyn ViewModel>,
    current: RwLock<Option<Arc<dyn LogClient>>>,
}

impl Controller {
    /// Create a controller with no log selected.
    pub fn new(registry: LogRegistry, quorum: Arc<QuorumVerifier>, model: Arc<dyn ViewModel>) -> Self {
        Self {
            registry,
            quorum,
            model,
            current: RwLock::new(None),
        }
    }

    /// The configured logs.
    pub fn registry(&self) -> &LogRegistry {
        &self.registry
    }

    /// The view model this controller publishes into.
    pub fn model(&self) -> &Arc<dyn ViewModel> {
        &self.model
    }

    /// Origin of the selected log.
    pub fn current_origin(&self) -> Option<String> {
        self.current().map(|log| log.origin().to_string())
    }

    fn current(&self) -> Option<Arc<dyn LogClient>> {
        self.current.read().expect("lock poisoned").clone()
    }

    // ------------------------------------------------------------------
    // Log selection
    // ------------------------------------------------------------------

    /// Switch to the log with `origin` and load its latest state.
    ///
    /// Returns `false`, changing nothing, when no such log is configured.
    pub async fn select_log(&self, origin: &str) -> bool {
        let Some(log) = self.registry.get(origin) else {
            warn!(origin, "ignoring selection of unknown log");
            return false;
        };
        *self.current.write().expect("lock poisoned") = Some(log);
        self.model.set_leaf(None, None);
        info!(origin, "selected log");

        self.init_from_log().await;
        true
    }

    /// Refresh, then show the newest leaf if the tree is not empty.
    pub async fn init_from_log(&self) {
        self.refresh_checkpoint().await;
        if let Some(size) = self.model.checkpoint().size()
            && size > 0
        {
            self.get_leaf(size, size - 1).await;
        }
    }

    // ------------------------------------------------------------------
    // Checkpoints
    // ------------------------------------------------------------------

    /// Fetch the log checkpoint and the witnessed checkpoint concurrently,
    /// then publish both in one update.
    ///
    /// The quorum size is read once, before either fetch starts. The
    /// previous result stays published until both fetches finish.
    pub async fn refresh_checkpoint(&self) {
        let Some(log) = self.current() else {
            self.model
                .set_checkpoint(None, None, Some(ControllerError::NoLogSelected));
            return;
        };
        let n = self.model.witness_n();

        let quorum = self.quorum.clone();
        let witness_log = log.clone();
        let witnessed = tokio::spawn(async move {
            quorum.verify_with_quorum(witness_log.as_ref(), n).await
        });

        let result = log.checkpoint().await;
        let witnessed = match witnessed.await {
            Ok(cp) => cp,
            Err(e) => {
                warn!(error = %e, "witness checkpoint task failed");
                None
            }
        };

        match result {
            Ok(cp) => {
                debug!(
                    origin = log.origin(),
                    size = cp.checkpoint.size,
                    witnessed = witnessed.is_some(),
                    n,
                    "refreshed checkpoint"
                );
                self.model.set_checkpoint(Some(cp), witnessed, None);
            }
            Err(e) => {
                warn!(origin = log.origin(), error = %e, "checkpoint refresh failed");
                self.model.set_checkpoint(None, witnessed, Some(e.into()));
            }
        }
    }

    // ------------------------------------------------------------------
    // Leaves
    // ------------------------------------------------------------------

    /// Fetch leaf `index` of a tree of `size` leaves and select it.
    ///
    /// An index at or past `size` is rejected without touching the log and
    /// leaves the selection unchanged.
    pub async fn get_leaf(&self, size: u64, index: u64) {
        let Some(log) = self.current() else {
            self.reject_leaf(ControllerError::NoLogSelected);
            return;
        };
        if index >= size {
            self.reject_leaf(ControllerError::Bounds { index, size });
            return;
        }

        match log.leaf(size, index).await {
            Ok(contents) => {
                debug!(origin = log.origin(), index, len = contents.len(), "fetched leaf");
                self.model.set_leaf(Some(Leaf { index, contents }), None);
            }
            Err(e) => {
                warn!(origin = log.origin(), index, error = %e, "leaf fetch failed");
                let leaf = Leaf {
                    index,
                    contents: Bytes::new(),
                };
                self.model.set_leaf(Some(leaf), Some(e.into()));
            }
        }
    }

    /// Select the leaf before the current one.
    pub async fn prev_leaf(&self) {
        let Some(size) = self.model.checkpoint().size() else {
            self.reject_leaf(ControllerError::NoCheckpoint);
            return;
        };
        match self.model.leaf().leaf.map(|l| l.index) {
            Some(index) if index > 0 => self.get_leaf(size, index - 1).await,
            _ => self.reject_leaf(ControllerError::BeforeFirstLeaf),
        }
    }

    /// Select the leaf after the current one, or the first leaf when none
    /// is selected.
    pub async fn next_leaf(&self) {
        let Some(size) = self.model.checkpoint().size() else {
            self.reject_leaf(ControllerError::NoCheckpoint);
            return;
        };
        let index = match self.model.leaf().leaf {
            Some(leaf) => leaf.index.saturating_add(1),
            None => 0,
        };
        self.get_leaf(size, index).await;
    }

    /// Republish the current leaf alongside `error`.
    fn reject_leaf(&self, error: ControllerError) {
        debug!(%error, "leaf request rejected");
        let current = self.model.leaf().leaf;
        self.model.set_leaf(current, Some(error));
    }

    // ------------------------------------------------------------------
    // Quorum
    // ------------------------------------------------------------------

    /// Require one more witness cosignature, then refresh.
    pub async fn inc_witnesses(&self) {
        let n = self.model.witness_n().saturating_add(1);
        self.model.set_witness_n(n);
        info!(n, "witness quorum raised");
        self.refresh_checkpoint().await;
    }

    /// Require one fewer witness cosignature, then refresh. At 1 this does
    /// nothing.
    pub async fn dec_witnesses(&self) {
        let n = self.model.witness_n();
        if n <= 1 {
            return;
        }
        self.model.set_witness_n(n - 1);
        info!(n = n - 1, "witness quorum lowered");
        self.refresh_checkpoint().await;
    }
}
