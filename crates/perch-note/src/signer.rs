//! Note signers, used to produce fixtures and test logs.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use ed25519_dalek::{Signer, SigningKey};

use crate::error::NoteError;
use crate::verifier::{NoteVerifier, SignatureAlgorithm, cosignature_v1_message, is_valid_name};

/// A private key able to add one signature line to a note.
pub struct NoteSigner {
    name: String,
    algorithm: SignatureAlgorithm,
    key: SigningKey,
    /// Timestamp embedded in cosignatures. Ignored for plain Ed25519.
    timestamp: u64,
}

impl NoteSigner {
    /// A log signer producing plain Ed25519 signatures.
    pub fn new_ed25519(name: &str, key: SigningKey) -> Self {
        Self {
            name: name.to_string(),
            algorithm: SignatureAlgorithm::Ed25519,
            key,
            timestamp: 0,
        }
    }

    /// A witness signer producing cosignature-v1 signatures at `timestamp`.
    pub fn new_cosignature_v1(name: &str, key: SigningKey, timestamp: u64) -> Self {
        Self {
            name: name.to_string(),
            algorithm: SignatureAlgorithm::CosignatureV1,
            key,
            timestamp,
        }
    }

    /// The signer name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The matching verifier.
    pub fn verifier(&self) -> NoteVerifier {
        NoteVerifier::from_parts(self.name.clone(), self.algorithm, self.key.verifying_key())
    }

    /// The matching verifier key string.
    pub fn vkey(&self) -> String {
        self.verifier().vkey()
    }

    /// Sign `text`, returning the raw signature bytes (without key hash).
    pub fn sign(&self, text: &str) -> Result<Vec<u8>, NoteError> {
        match self.algorithm {
            SignatureAlgorithm::Ed25519 => Ok(self.key.sign(text.as_bytes()).to_bytes().to_vec()),
            SignatureAlgorithm::CosignatureV1 => {
                let msg = cosignature_v1_message(self.timestamp, text)?;
                let mut out = Vec::with_capacity(72);
                out.extend_from_slice(&self.timestamp.to_be_bytes());
                out.extend_from_slice(&self.key.sign(&msg).to_bytes());
                Ok(out)
            }
        }
    }

    /// Format one `— name base64` signature line for `text`.
    pub fn signature_line(&self, text: &str) -> Result<String, NoteError> {
        if !is_valid_name(&self.name) {
            return Err(NoteError::MalformedKey(self.name.clone()));
        }
        let mut blob = self.verifier().key_hash().to_be_bytes().to_vec();
        blob.extend_from_slice(&self.sign(text)?);
        Ok(format!("\u{2014} {} {}\n", self.name, STANDARD.encode(blob)))
    }
}

/// Produce a signed note: `text`, a blank line, then one line per signer.
///
/// `text` must be non-empty and end in a newline.
pub fn sign_note(text: &str, signers: &[&NoteSigner]) -> Result<Vec<u8>, NoteError> {
    if text.is_empty() || !text.ends_with('\n') {
        return Err(NoteError::MalformedNote("text must end in newline"));
    }
    let mut out = String::with_capacity(text.len() + 1 + signers.len() * 128);
    out.push_str(text);
    out.push('\n');
    for signer in signers {
        out.push_str(&signer.signature_line(text)?);
    }
    Ok(out.into_bytes())
}
