//! Leaf addressing for the supported log layouts.
//!
//! Every function here is pure: given a tree size and leaf index it names
//! the blob holding the leaf and the leaf's position inside that blob, or
//! splits a fetched blob back into leaves.
//!
//! | layout | blob | offset |
//! |---|---|---|
//! | tiles | `tile/entries/<N>[.p/<W>]`, `N = index / 256` | `index % 256` |
//! | serverless | `seq/<hh>/<hh>/<hh>/<hh>/<hh>` | always 0 |
//! | sumdb | `/tile/8/data/<N>[.p/<offset+1>]` | `index % 256` |

use bytes::Bytes;
use perch_types::BUNDLE_WIDTH;

use crate::error::LogError;

/// Where to find one leaf: the blob path and the leaf's position within it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafAddress {
    /// Path relative to the log root.
    pub path: String,
    /// Index of the leaf within the decoded blob.
    pub offset: usize,
}

/// Encode a tile or bundle number as slash-separated three-digit groups.
///
/// The lowest group is plain; every higher group carries an `x` prefix:
/// `67 → 067`, `1500 → x001/500`, `1234067 → x001/x234/067`.
pub fn encode_tile_index(n: u64) -> String {
    let mut out = format!("{:03}", n % 1000);
    let mut rest = n / 1000;
    while rest > 0 {
        out = format!("x{:03}/{out}", rest % 1000);
        rest /= 1000;
    }
    out
}

// ---------------------------------------------------------------------------
// tlog-tiles
// ---------------------------------------------------------------------------

/// Number of entries in bundle `bundle` of a tree of `tree_size` leaves, or
/// 0 when the bundle is full.
pub fn partial_bundle_width(bundle: u64, tree_size: u64) -> u64 {
    if bundle < tree_size / BUNDLE_WIDTH {
        0
    } else {
        tree_size % BUNDLE_WIDTH
    }
}

/// Path of entry bundle `bundle` for a tree of `tree_size` leaves.
pub fn tiles_bundle_path(bundle: u64, tree_size: u64) -> String {
    let mut path = format!("tile/entries/{}", encode_tile_index(bundle));
    let width = partial_bundle_width(bundle, tree_size);
    if width > 0 {
        path.push_str(&format!(".p/{width}"));
    }
    path
}

/// Address of leaf `index` in a tlog-tiles log of `tree_size` leaves.
pub fn tiles_address(tree_size: u64, index: u64) -> LeafAddress {
    LeafAddress {
        path: tiles_bundle_path(index / BUNDLE_WIDTH, tree_size),
        offset: (index % BUNDLE_WIDTH) as usize,
    }
}

/// Split a tlog-tiles entry bundle into its entries.
///
/// Each entry is a big-endian `u16` length followed by that many bytes.
pub fn decode_tiles_bundle(data: &Bytes) -> Result<Vec<Bytes>, LogError> {
    let mut entries = Vec::new();
    let mut pos = 0usize;
    while pos < data.len() {
        if data.len() - pos < 2 {
            return Err(LogError::MalformedBundle(format!(
                "truncated length prefix at byte {pos}"
            )));
        }
        let len = u16::from_be_bytes([data[pos], data[pos + 1]]) as usize;
        pos += 2;
        if data.len() - pos < len {
            return Err(LogError::MalformedBundle(format!(
                "entry {} needs {len} bytes, {} left",
                entries.len(),
                data.len() - pos
            )));
        }
        entries.push(data.slice(pos..pos + len));
        pos += len;
    }
    Ok(entries)
}

/// Encode entries as a tlog-tiles bundle. Entries longer than `u16::MAX`
/// cannot be represented.
pub fn encode_tiles_bundle<'a>(
    entries: impl IntoIterator<Item = &'a [u8]>,
) -> Result<Vec<u8>, LogError> {
    let mut out = Vec::new();
    for entry in entries {
        let len = u16::try_from(entry.len()).map_err(|_| {
            LogError::MalformedBundle(format!("entry of {} bytes too long", entry.len()))
        })?;
        out.extend_from_slice(&len.to_be_bytes());
        out.extend_from_slice(entry);
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// Serverless
// ---------------------------------------------------------------------------

/// Path of the file holding leaf `index` in a serverless log.
pub fn serverless_leaf_path(index: u64) -> String {
    format!(
        "seq/{:02x}/{:02x}/{:02x}/{:02x}/{:02x}",
        index >> 32,
        (index >> 24) & 0xff,
        (index >> 16) & 0xff,
        (index >> 8) & 0xff,
        index & 0xff
    )
}

/// Address of leaf `index` in a serverless log.
///
/// Each leaf is its own blob, so the tree size plays no part and the
/// offset is always zero.
pub fn serverless_address(index: u64) -> LeafAddress {
    LeafAddress {
        path: serverless_leaf_path(index),
        offset: 0,
    }
}

// ---------------------------------------------------------------------------
// sumdb
// ---------------------------------------------------------------------------

/// Path of the (possibly partial) data tile holding leaf `index` in a
/// checksum-database log.
///
/// Unless the leaf is the last of its bundle, only the prefix up to and
/// including it is requested.
pub fn sumdb_bundle_path(index: u64) -> String {
    let mut path = format!("/tile/8/data/{}", encode_tile_index(index / BUNDLE_WIDTH));
    let offset = index % BUNDLE_WIDTH;
    if offset != BUNDLE_WIDTH - 1 {
        path.push_str(&format!(".p/{}", offset + 1));
    }
    path
}

/// Address of leaf `index` in a checksum-database log.
pub fn sumdb_address(index: u64) -> LeafAddress {
    LeafAddress {
        path: sumdb_bundle_path(index),
        offset: (index % BUNDLE_WIDTH) as usize,
    }
}

/// Split a checksum-database data tile into records.
///
/// Records are separated by a blank line. The first newline of each
/// separator stays with the record before it, and the final record is kept
/// even without a trailing separator: `"A\n\nB\n\nC"` gives
/// `["A\n", "B\n", "C"]`.
pub fn decode_sumdb_bundle(data: &Bytes) -> Vec<Bytes> {
    let mut records = Vec::new();
    let mut start = 0usize;
    for i in 1..data.len() {
        if data[i] == b'\n' && data[i - 1] == b'\n' && i > start {
            records.push(data.slice(start..i));
            start = i + 1;
        }
    }
    records.push(data.slice(start..));
    records
}
