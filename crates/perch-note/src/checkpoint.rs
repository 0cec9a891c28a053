//! Checkpoint bodies and their signed form.
//!
//! A checkpoint body is three lines (origin, decimal size, base64 root hash)
//! optionally followed by extension lines.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use perch_types::Checkpoint;

use crate::error::NoteError;
use crate::note::{Note, open};
use crate::verifier::NoteVerifier;

/// A checkpoint together with the note it was opened from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedCheckpoint {
    /// The parsed body.
    pub checkpoint: Checkpoint,
    /// The opened note, listing which signatures verified.
    pub note: Note,
    /// The exact bytes that were verified.
    pub raw: Bytes,
}

impl SignedCheckpoint {
    /// Number of `witnesses` whose cosignature verified on this checkpoint.
    pub fn cosigned_by(&self, witnesses: &[NoteVerifier]) -> usize {
        witnesses.iter().filter(|w| self.note.signed_by(w)).count()
    }
}

/// Render a checkpoint body as note text.
pub fn marshal_checkpoint(cp: &Checkpoint) -> String {
    format!(
        "{}\n{}\n{}\n{}",
        cp.origin,
        cp.size,
        STANDARD.encode(cp.root_hash),
        cp.extensions
    )
}

/// Parse a checkpoint body from note text.
pub fn unmarshal_checkpoint(text: &str) -> Result<Checkpoint, NoteError> {
    let mut lines = text.splitn(4, '\n');
    let (Some(origin), Some(size), Some(hash), Some(rest)) =
        (lines.next(), lines.next(), lines.next(), lines.next())
    else {
        return Err(NoteError::InvalidCheckpoint("too few newlines".into()));
    };

    if origin.is_empty() {
        return Err(NoteError::InvalidCheckpoint("empty origin".into()));
    }
    // Digits only: `u64::from_str` would also take a leading `+`.
    let bad_size = || NoteError::InvalidCheckpoint(format!("invalid size {size:?}"));
    if !size.bytes().all(|b| b.is_ascii_digit()) {
        return Err(bad_size());
    }
    let size: u64 = size.parse().map_err(|_| bad_size())?;
    let root_hash: [u8; 32] = STANDARD
        .decode(hash)
        .ok()
        .and_then(|h| h.try_into().ok())
        .ok_or_else(|| NoteError::InvalidCheckpoint(format!("invalid root hash {hash:?}")))?;

    Ok(Checkpoint {
        origin: origin.to_string(),
        size,
        root_hash,
        extensions: rest.to_string(),
    })
}

/// Open and parse a signed checkpoint.
///
/// The note is checked against the log's verifier and any `witnesses`. The
/// log's own signature must be among those that verified, and the origin in
/// the body must equal `origin`. Witness signatures are optional here;
/// callers needing a quorum count them with
/// [`SignedCheckpoint::cosigned_by`].
pub fn parse_checkpoint(
    raw: Bytes,
    origin: &str,
    log_verifier: &NoteVerifier,
    witnesses: &[NoteVerifier],
) -> Result<SignedCheckpoint, NoteError> {
    let mut verifiers = Vec::with_capacity(witnesses.len() + 1);
    verifiers.push(log_verifier);
    verifiers.extend(witnesses.iter());

    let note = open(&raw, &verifiers)?;
    if !note.signed_by(log_verifier) {
        return Err(NoteError::NoLogSignature(log_verifier.name().to_string()));
    }

    let checkpoint = unmarshal_checkpoint(&note.text)?;
    if checkpoint.origin != origin {
        return Err(NoteError::OriginMismatch {
            expected: origin.to_string(),
            actual: checkpoint.origin,
        });
    }

    Ok(SignedCheckpoint {
        checkpoint,
        note,
        raw,
    })
}
