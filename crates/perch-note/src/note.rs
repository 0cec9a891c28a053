//! Opening signed notes.
//!
//! A signed note is UTF-8 text ending in a newline, followed by a blank line
//! and one or more signature lines of the form `— <name> <base64>`, where the
//! base64 payload is a 4-byte key hash followed by the signature.

use std::collections::HashSet;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use tracing::trace;

use crate::error::NoteError;
use crate::verifier::{NoteVerifier, is_valid_name};

/// Upper bound on signature lines accepted in one note.
const MAX_SIGNATURES: usize = 100;

const SIG_PREFIX: &str = "\u{2014} ";

/// One signature line from a note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteSignature {
    /// Signer name.
    pub name: String,
    /// Signer key hash.
    pub hash: u32,
    /// The base64 payload exactly as it appeared on the line.
    pub base64: String,
}

/// An opened note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    /// The signed text, including its trailing newline.
    pub text: String,
    /// Signatures from known verifiers that checked out.
    pub sigs: Vec<NoteSignature>,
    /// Signatures from signers that no supplied verifier knows.
    pub unverified_sigs: Vec<NoteSignature>,
}

impl Note {
    /// Whether `verifier` produced one of the verified signatures.
    pub fn signed_by(&self, verifier: &NoteVerifier) -> bool {
        self.sigs
            .iter()
            .any(|s| s.name == verifier.name() && s.hash == verifier.key_hash())
    }
}

fn is_valid_text(text: &str) -> bool {
    !text.chars().any(|c| (c.is_control() && c != '\n') || c == '\u{2028}' || c == '\u{2029}')
}

/// Open `msg`, checking every signature from a signer in `verifiers`.
///
/// Signatures from unknown signers are kept in
/// [`Note::unverified_sigs`]. A known signer whose signature fails is an
/// error, as is a note with no verified signatures at all.
pub fn open(msg: &[u8], verifiers: &[&NoteVerifier]) -> Result<Note, NoteError> {
    let msg = std::str::from_utf8(msg).map_err(|_| NoteError::MalformedNote("not UTF-8"))?;

    let split = msg
        .rfind("\n\n")
        .ok_or(NoteError::MalformedNote("missing signature block"))?;
    let text = &msg[..split + 1];
    let sigs = &msg[split + 2..];

    if !is_valid_text(text) {
        return Err(NoteError::MalformedNote("invalid characters in text"));
    }
    if sigs.is_empty() || !sigs.ends_with('\n') {
        return Err(NoteError::MalformedNote("signature block must end in newline"));
    }

    let mut note = Note {
        text: text.to_string(),
        sigs: Vec::new(),
        unverified_sigs: Vec::new(),
    };
    let mut seen = HashSet::new();
    let mut seen_unverified = HashSet::new();

    let lines: Vec<&str> = sigs[..sigs.len() - 1].split('\n').collect();
    if lines.len() > MAX_SIGNATURES {
        return Err(NoteError::MalformedNote("too many signatures"));
    }

    for line in lines {
        let rest = line
            .strip_prefix(SIG_PREFIX)
            .ok_or(NoteError::MalformedNote("signature line missing prefix"))?;
        let (name, b64) = rest
            .split_once(' ')
            .ok_or(NoteError::MalformedNote("signature line missing payload"))?;
        if !is_valid_name(name) {
            return Err(NoteError::MalformedNote("invalid signer name"));
        }
        let blob = STANDARD
            .decode(b64)
            .map_err(|_| NoteError::MalformedNote("signature is not base64"))?;
        if blob.len() < 5 {
            return Err(NoteError::MalformedNote("signature too short"));
        }
        let hash = u32::from_be_bytes([blob[0], blob[1], blob[2], blob[3]]);
        let sig = NoteSignature {
            name: name.to_string(),
            hash,
            base64: b64.to_string(),
        };

        let Some(verifier) = verifiers
            .iter()
            .find(|v| v.name() == name && v.key_hash() == hash)
        else {
            if seen_unverified.insert(line) {
                trace!(name, hash, "signature from unknown key");
                note.unverified_sigs.push(sig);
            }
            continue;
        };

        if !seen.insert((name, hash)) {
            return Err(NoteError::MalformedNote("repeated signature from one key"));
        }
        if !verifier.verify(text, &blob[4..]) {
            return Err(NoteError::InvalidSignature {
                name: name.to_string(),
                hash,
            });
        }
        note.sigs.push(sig);
    }

    if note.sigs.is_empty() {
        return Err(NoteError::Unverified);
    }
    Ok(note)
}
