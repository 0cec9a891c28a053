//! Shared types and identifiers for Perch.
//!
//! This crate defines the core types used across the Perch workspace:
//! the log identifier ([`LogId`]), the unsigned checkpoint body
//! ([`Checkpoint`]), a fetched leaf ([`Leaf`]), and the on-the-wire layout
//! selector for a log ([`LogFormat`]).

use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Number of leaves in one entry bundle, for every supported layout.
pub const BUNDLE_WIDTH: u64 = 256;

// ---------------------------------------------------------------------------
// ID types
// ---------------------------------------------------------------------------

/// Identifier of a log as understood by witness distributors.
///
/// Derived from the log origin: `SHA-256("o:" || origin)`, rendered as
/// lowercase hex.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct LogId([u8; 32]);

impl LogId {
    /// Derive the ID for a log with the given origin string.
    pub fn from_origin(origin: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(b"o:");
        hasher.update(origin.as_bytes());
        Self(hasher.finalize().into())
    }

    /// Return the raw 32-byte representation.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl From<[u8; 32]> for LogId {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for LogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for LogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LogId({self})")
    }
}

// ---------------------------------------------------------------------------
// Core data structures
// ---------------------------------------------------------------------------

/// The body of a checkpoint: a log's size and root hash at signing time.
///
/// Signature material lives alongside it in `perch_note::SignedCheckpoint`;
/// this type only carries what the log committed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkpoint {
    /// Identity of the log that signed this checkpoint.
    pub origin: String,
    /// Number of leaves committed to.
    pub size: u64,
    /// Merkle root hash over the first `size` leaves.
    pub root_hash: [u8; 32],
    /// Any lines after the root hash, verbatim (each ends in `\n`).
    pub extensions: String,
}

/// A single entry fetched from a log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Leaf {
    /// Position of the leaf in the log.
    pub index: u64,
    /// Raw entry bytes, opaque to this client.
    pub contents: Bytes,
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Storage layout a log uses for its leaf data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// tlog-tiles: size-prefixed entries in 256-wide bundles under
    /// `tile/entries/`.
    Tiles,
    /// Serverless log: one file per leaf under `seq/`.
    Serverless,
    /// Go checksum database style: newline-separated records under
    /// `tile/8/data/`.
    #[serde(alias = "legacy")]
    SumDb,
}

impl LogFormat {
    /// The canonical lowercase name used in config files and flags.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Tiles => "tiles",
            LogFormat::Serverless => "serverless",
            LogFormat::SumDb => "sumdb",
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a format name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("log format {0:?} not recognised (expected tiles, serverless or sumdb)")]
pub struct UnknownLogFormat(pub String);

impl FromStr for LogFormat {
    type Err = UnknownLogFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tiles" => Ok(LogFormat::Tiles),
            "serverless" => Ok(LogFormat::Serverless),
            "sumdb" | "legacy" => Ok(LogFormat::SumDb),
            other => Err(UnknownLogFormat(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
