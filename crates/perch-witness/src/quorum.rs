//! Quorum checks on witnessed checkpoints.

use std::collections::HashSet;
use std::sync::Arc;

use perch_log::LogClient;
use perch_note::{NoteVerifier, SignedCheckpoint, parse_checkpoint};
use perch_types::LogId;
use tracing::{debug, info};

use crate::distributor::Distributor;
use crate::error::WitnessError;

/// Fetches witnessed checkpoints and checks they carry enough cosignatures.
///
/// The witness key set is fixed at construction.
pub struct QuorumVerifier {
    distributor: Arc<dyn Distributor>,
    witnesses: Vec<NoteVerifier>,
}

impl QuorumVerifier {
    /// Build a verifier from explicit witness keys. Every key must parse as
    /// a cosignature-v1 verifier. A key listed twice is kept once.
    pub fn new(distributor: Arc<dyn Distributor>, vkeys: &[String]) -> Result<Self, WitnessError> {
        let mut seen = HashSet::new();
        let mut witnesses = Vec::with_capacity(vkeys.len());
        for vkey in vkeys {
            let verifier =
                NoteVerifier::new_cosignature_v1(vkey).map_err(|source| WitnessError::InvalidKey {
                    vkey: vkey.clone(),
                    source,
                })?;
            if !seen.insert((verifier.name().to_string(), verifier.key_hash())) {
                debug!(witness = verifier.name(), "skipping duplicate witness key");
                continue;
            }
            witnesses.push(verifier);
        }
        Ok(Self {
            distributor,
            witnesses,
        })
    }

    /// Build a verifier using the witness keys the distributor publishes.
    pub async fn connect(distributor: Arc<dyn Distributor>) -> Result<Self, WitnessError> {
        let vkeys = distributor.witnesses().await?;
        info!(count = vkeys.len(), "loaded witness keys from distributor");
        Self::new(distributor, &vkeys)
    }

    /// The known witnesses.
    pub fn witnesses(&self) -> &[NoteVerifier] {
        &self.witnesses
    }

    /// Fetch the checkpoint for `log` cosigned by at least `n` witnesses.
    ///
    /// The note must carry the log's own signature and name the log's
    /// origin. The parser only verifies signatures; the cosignatures are
    /// counted here against the known witnesses, which hold no duplicate
    /// keys, and must number `n` or more.
    pub async fn checkpoint_with_quorum(
        &self,
        log: &dyn LogClient,
        n: usize,
    ) -> Result<SignedCheckpoint, WitnessError> {
        let log_id = LogId::from_origin(log.origin());
        let raw = self.distributor.checkpoint_n(&log_id, n).await?;
        let signed = parse_checkpoint(raw, log.origin(), log.verifier(), &self.witnesses)?;

        let got = signed.cosigned_by(&self.witnesses);
        if got < n {
            return Err(WitnessError::QuorumNotMet { wanted: n, got });
        }
        debug!(
            origin = log.origin(),
            size = signed.checkpoint.size,
            cosignatures = got,
            "witnessed checkpoint verified"
        );
        Ok(signed)
    }

    /// Like [`checkpoint_with_quorum`](Self::checkpoint_with_quorum), but
    /// any failure just means there is no witnessed checkpoint.
    pub async fn verify_with_quorum(
        &self,
        log: &dyn LogClient,
        n: usize,
    ) -> Option<SignedCheckpoint> {
        match self.checkpoint_with_quorum(log, n).await {
            Ok(signed) => Some(signed),
            Err(e) => {
                debug!(origin = log.origin(), n, error = %e, "no witnessed checkpoint");
                None
            }
        }
    }
}
