//! Witness distribution and quorum verification.
//!
//! - [`Distributor`]: where witness keys and witnessed checkpoints come
//!   from. [`RestDistributor`] talks to the `distributor/v0` HTTP API;
//!   [`MemoryDistributor`] is an in-process stand-in.
//! - [`QuorumVerifier`]: fetches a log's witnessed checkpoint and accepts
//!   it only with enough valid cosignatures.

mod distributor;
mod error;
mod memory;
mod quorum;


pub use distributor::{DEFAULT_DISTRIBUTOR_URL, Distributor, RestDistributor};
pub use error::WitnessError;
pub use memory::MemoryDistributor;
pub use quorum::QuorumVerifier;
