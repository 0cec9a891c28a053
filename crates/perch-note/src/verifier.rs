//! Verifier keys for signed notes.
//!
//! A verifier key is written `<name>+<hash>+<key>` where `<hash>` is eight
//! hex digits and `<key>` is the base64 of one algorithm byte followed by a
//! 32-byte Ed25519 public key. The hash is the first four bytes of
//! `SHA-256(name || "\n" || alg || key)`, read big-endian.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use sha2::{Digest, Sha256};

use crate::error::NoteError;

/// Signature algorithm named by the first byte of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureAlgorithm {
    /// Plain Ed25519 over the note text. Used by logs.
    Ed25519,
    /// Timestamped Ed25519 cosignature over the checkpoint header. Used by
    /// witnesses.
    CosignatureV1,
}

impl SignatureAlgorithm {
    /// The byte identifying this algorithm in encoded keys.
    pub fn id(self) -> u8 {
        match self {
            SignatureAlgorithm::Ed25519 => 0x01,
            SignatureAlgorithm::CosignatureV1 => 0x04,
        }
    }

    fn from_id(id: u8) -> Result<Self, NoteError> {
        match id {
            0x01 => Ok(SignatureAlgorithm::Ed25519),
            0x04 => Ok(SignatureAlgorithm::CosignatureV1),
            other => Err(NoteError::UnsupportedAlgorithm(other)),
        }
    }
}

/// Compute the 32-bit key hash for `name` and the encoded key bytes.
pub(crate) fn key_hash(name: &str, alg: SignatureAlgorithm, key: &[u8; 32]) -> u32 {
    let mut h = Sha256::new();
    h.update(name.as_bytes());
    h.update(b"\n");
    h.update([alg.id()]);
    h.update(key);
    let digest = h.finalize();
    u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]])
}

/// Key names must be non-empty and free of `+` and whitespace.
pub(crate) fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && !name.chars().any(|c| c == '+' || c.is_whitespace())
}

/// Build the message covered by a cosignature at time `timestamp`.
///
/// Only the first three lines of the checkpoint (origin, size, root hash)
/// are covered; extension lines are not.
pub(crate) fn cosignature_v1_message(timestamp: u64, text: &str) -> Result<Vec<u8>, NoteError> {
    let mut lines = text.split('\n');
    let (Some(origin), Some(size), Some(hash)) = (lines.next(), lines.next(), lines.next()) else {
        return Err(NoteError::MalformedNote("cosigned note has fewer than three lines"));
    };
    if lines.next().is_none() {
        return Err(NoteError::MalformedNote("cosigned note has fewer than three lines"));
    }
    Ok(format!("cosignature/v1\ntime {timestamp}\n{origin}\n{size}\n{hash}\n").into_bytes())
}

/// A parsed public key able to check one signer's signatures on a note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteVerifier {
    name: String,
    key_hash: u32,
    algorithm: SignatureAlgorithm,
    key: VerifyingKey,
}

impl NoteVerifier {
    /// Parse a verifier key of any supported algorithm.
    pub fn from_vkey(vkey: &str) -> Result<Self, NoteError> {
        let (name, rest) = vkey
            .split_once('+')
            .ok_or_else(|| NoteError::MalformedKey(vkey.to_string()))?;
        let (hash_hex, key_b64) = rest
            .split_once('+')
            .ok_or_else(|| NoteError::MalformedKey(vkey.to_string()))?;

        if !is_valid_name(name) || hash_hex.len() != 8 {
            return Err(NoteError::MalformedKey(vkey.to_string()));
        }
        let hash = u32::from_str_radix(hash_hex, 16)
            .map_err(|_| NoteError::MalformedKey(vkey.to_string()))?;
        let raw = STANDARD
            .decode(key_b64)
            .map_err(|_| NoteError::MalformedKey(vkey.to_string()))?;
        let (&alg_id, key_bytes) = raw
            .split_first()
            .ok_or_else(|| NoteError::MalformedKey(vkey.to_string()))?;
        let algorithm = SignatureAlgorithm::from_id(alg_id)?;
        let key_bytes: [u8; 32] = key_bytes
            .try_into()
            .map_err(|_| NoteError::MalformedKey(vkey.to_string()))?;

        if key_hash(name, algorithm, &key_bytes) != hash {
            return Err(NoteError::KeyHashMismatch {
                name: name.to_string(),
            });
        }
        let key = VerifyingKey::from_bytes(&key_bytes)
            .map_err(|_| NoteError::MalformedKey(vkey.to_string()))?;

        Ok(Self {
            name: name.to_string(),
            key_hash: hash,
            algorithm,
            key,
        })
    }

    /// Parse a log's Ed25519 verifier key.
    pub fn new_ed25519(vkey: &str) -> Result<Self, NoteError> {
        let v = Self::from_vkey(vkey)?;
        match v.algorithm {
            SignatureAlgorithm::Ed25519 => Ok(v),
            other => Err(NoteError::UnsupportedAlgorithm(other.id())),
        }
    }

    /// Parse a witness's cosignature-v1 verifier key.
    pub fn new_cosignature_v1(vkey: &str) -> Result<Self, NoteError> {
        let v = Self::from_vkey(vkey)?;
        match v.algorithm {
            SignatureAlgorithm::CosignatureV1 => Ok(v),
            other => Err(NoteError::UnsupportedAlgorithm(other.id())),
        }
    }

    pub(crate) fn from_parts(name: String, algorithm: SignatureAlgorithm, key: VerifyingKey) -> Self {
        let key_hash = key_hash(&name, algorithm, key.as_bytes());
        Self {
            name,
            key_hash,
            algorithm,
            key,
        }
    }

    /// The signer name carried in signature lines.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The 32-bit hash identifying this key.
    pub fn key_hash(&self) -> u32 {
        self.key_hash
    }

    /// The algorithm this key verifies.
    pub fn algorithm(&self) -> SignatureAlgorithm {
        self.algorithm
    }

    /// Re-encode as a `name+hash+key` string.
    pub fn vkey(&self) -> String {
        let mut raw = Vec::with_capacity(33);
        raw.push(self.algorithm.id());
        raw.extend_from_slice(self.key.as_bytes());
        format!("{}+{:08x}+{}", self.name, self.key_hash, STANDARD.encode(raw))
    }

    /// Check `sig` over the note `text`.
    pub fn verify(&self, text: &str, sig: &[u8]) -> bool {
        match self.algorithm {
            SignatureAlgorithm::Ed25519 => {
                let Ok(sig) = Signature::from_slice(sig) else {
                    return false;
                };
                self.key.verify(text.as_bytes(), &sig).is_ok()
            }
            SignatureAlgorithm::CosignatureV1 => {
                if sig.len() != 8 + Signature::BYTE_SIZE {
                    return false;
                }
                let (ts, sig) = sig.split_at(8);
                let mut ts_bytes = [0u8; 8];
                ts_bytes.copy_from_slice(ts);
                let Ok(msg) = cosignature_v1_message(u64::from_be_bytes(ts_bytes), text) else {
                    return false;
                };
                let Ok(sig) = Signature::from_slice(sig) else {
                    return false;
                };
                self.key.verify(&msg, &sig).is_ok()
            }
        }
    }
}
