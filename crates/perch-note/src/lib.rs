//! Signed notes and checkpoints.
//!
//! This crate opens the signed-note format used by transparency logs and
//! their witnesses, and parses the checkpoint carried inside:
//!
//! - [`NoteVerifier`]: a public key parsed from a `name+hash+key` string,
//!   either a log's Ed25519 key or a witness's cosignature-v1 key.
//! - [`open`]: checks every known signature on a note.
//! - [`parse_checkpoint`]: opens a note, requires the log's signature and
//!   returns a [`SignedCheckpoint`].
//! - [`NoteSigner`] / [`sign_note`]: the signing side, for building fixtures.

mod checkpoint;
mod error;
mod note;
mod signer;
mod verifier;

pub use checkpoint::{SignedCheckpoint, marshal_checkpoint, parse_checkpoint, unmarshal_checkpoint};
pub use error::NoteError;
pub use note::{Note, NoteSignature, open};
pub use signer::{NoteSigner, sign_note};
pub use verifier::{NoteVerifier, SignatureAlgorithm};
