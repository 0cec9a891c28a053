//! Shared test utilities for perch-engine tests.

use std::sync::Arc;
use std::time::Duration;

use ed25519_dalek::SigningKey;
use perch_fetch::{MemoryFetcher, SlowFetcher};
use perch_log::{LogRegistry, ServerlessLogClient};
use perch_note::{NoteSigner, marshal_checkpoint, sign_note};
use perch_types::{Checkpoint, LogId};
use perch_witness::{MemoryDistributor, QuorumVerifier};

use crate::controller::Controller;
use crate::model::StateModel;

/// The log most tests select.
pub const ORIGIN: &str = "example.com/engine-test-log";

/// A second configured log that serves nothing.
pub const EMPTY_ORIGIN: &str = "example.com/empty-log";

pub fn log_signer() -> NoteSigner {
    NoteSigner::new_ed25519("engine-test-log", SigningKey::from_bytes(&[21u8; 32]))
}

pub fn witness(i: u8) -> NoteSigner {
    NoteSigner::new_cosignature_v1(
        &format!("engine-witness-{i}"),
        SigningKey::from_bytes(&[40 + i; 32]),
        1_700_000_000,
    )
}

pub fn leaf_data(i: u64) -> Vec<u8> {
    format!("leaf {i}").into_bytes()
}

/// A checkpoint note for [`ORIGIN`] signed by the log plus `witnesses`.
pub fn checkpoint_note(size: u64, witnesses: &[NoteSigner]) -> Vec<u8> {
    let text = marshal_checkpoint(&Checkpoint {
        origin: ORIGIN.to_string(),
        size,
        root_hash: [size as u8; 32],
        extensions: String::new(),
    });
    let log = log_signer();
    let mut signers = vec![&log];
    signers.extend(witnesses.iter());
    sign_note(&text, &signers).unwrap()
}

/// Everything a controller test needs, with handles on the test doubles.
pub struct Fixture {
    pub fetcher: Arc<MemoryFetcher>,
    pub slow: Arc<SlowFetcher>,
    pub distributor: Arc<MemoryDistributor>,
    pub model: Arc<StateModel>,
    pub controller: Arc<Controller>,
}

impl Fixture {
    /// A serverless log of `size` leaves, a distributor knowing three
    /// witnesses, and `latency` on both the log and the distributor.
    pub fn new(size: u64, latency: Duration) -> Self {
        let fetcher = Arc::new(MemoryFetcher::new());
        fetcher.insert("checkpoint", checkpoint_note(size, &[]));
        for i in 0..size {
            fetcher.insert(perch_log::layout::serverless_leaf_path(i), leaf_data(i));
        }
        let slow = Arc::new(SlowFetcher::new(fetcher.clone()).latency(latency));

        let distributor = Arc::new(MemoryDistributor::new(witness_keys()).latency(latency));
        let id = LogId::from_origin(ORIGIN);
        distributor.set_checkpoint(id, 1, checkpoint_note(size, &[witness(0)]));
        distributor.set_checkpoint(id, 2, checkpoint_note(size, &[witness(0), witness(2)]));

        let mut registry = LogRegistry::new();
        registry
            .register(Arc::new(ServerlessLogClient::with_fetcher(
                slow.clone(),
                ORIGIN,
                log_signer().verifier(),
            )))
            .unwrap();
        registry
            .register(Arc::new(ServerlessLogClient::with_fetcher(
                Arc::new(MemoryFetcher::new()),
                EMPTY_ORIGIN,
                log_signer().verifier(),
            )))
            .unwrap();

        let quorum = QuorumVerifier::new(distributor.clone(), &witness_keys()).unwrap();
        let model = Arc::new(StateModel::default());
        let controller = Arc::new(Controller::new(registry, Arc::new(quorum), model.clone()));

        Self {
            fetcher,
            slow,
            distributor,
            model,
            controller,
        }
    }
}

pub fn witness_keys() -> Vec<String> {
    (0..3).map(|i| witness(i).vkey()).collect()
}
