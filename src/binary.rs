// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! On-disk index format.
//!
//! Layout of `index.afdx`:
//!
//! ```text
//! ┌───────────┬─────────┬──────────────┬──────────────┬──────────┬──────────────┐
//! │ MAGIC (4) │ VER (1) │ PAYLOAD_LEN  │ JSON payload │ CRC32(4) │ FOOTER_MAGIC │
//! │  "AFDX"   │         │   (8, LE)    │              │   (LE)   │    "XDFA"    │
//! └───────────┴─────────┴──────────────┴──────────────┴──────────┴──────────────┘
//! ```
//!
//! The CRC covers everything before the footer. If the footer is wrong,
//! something got corrupted or truncated. Don't trust the data.
//!
//! Writes go to a temp file in the destination directory and are renamed into
//! place, so a crashed build never leaves a half-written index where a reader
//! could open it. Commit-then-expose: the rename IS the commit.

use std::fs;
use std::path::{Path, PathBuf};

use crc32fast::Hasher as Crc32Hasher;

use crate::error::{AfindexError, Result};
use crate::index::CaseIndex;

/// Magic bytes: "AFDX" in ASCII (header)
pub const MAGIC: [u8; 4] = *b"AFDX";

/// Footer magic: "XDFA" (reversed, marks valid file end)
pub const FOOTER_MAGIC: [u8; 4] = *b"XDFA";

/// Current format version
pub const VERSION: u8 = 1;

/// File name of the persisted index inside its destination directory.
pub const INDEX_FILE_NAME: &str = "index.afdx";

const HEADER_LEN: usize = 4 + 1 + 8;
const FOOTER_LEN: usize = 4 + 4;

fn crc32(bytes: &[u8]) -> u32 {
    let mut hasher = Crc32Hasher::new();
    hasher.update(bytes);
    hasher.finalize()
}

/// Serialize an index into the on-disk byte layout.
pub fn encode_index(index: &CaseIndex) -> Result<Vec<u8>> {
    let payload =
        serde_json::to_vec(index).map_err(|e| AfindexError::Build(format!("serialize: {e}")))?;

    let mut bytes = Vec::with_capacity(HEADER_LEN + payload.len() + FOOTER_LEN);
    bytes.extend_from_slice(&MAGIC);
    bytes.push(VERSION);
    bytes.extend_from_slice(&(payload.len() as u64).to_le_bytes());
    bytes.extend_from_slice(&payload);
    let checksum = crc32(&bytes);
    bytes.extend_from_slice(&checksum.to_le_bytes());
    bytes.extend_from_slice(&FOOTER_MAGIC);
    Ok(bytes)
}

/// Decode on-disk bytes back into an index, verifying magic, version, length,
/// and checksum. Any mismatch is `AfindexError::Search` — the caller's search
/// fails, nothing else does.
pub fn decode_index(bytes: &[u8]) -> Result<CaseIndex> {
    if bytes.len() < HEADER_LEN + FOOTER_LEN {
        return Err(AfindexError::Search("index file truncated".to_string()));
    }
    if bytes[..4] != MAGIC {
        return Err(AfindexError::Search("bad magic bytes".to_string()));
    }
    if bytes[4] != VERSION {
        return Err(AfindexError::Search(format!(
            "unsupported format version {} (expected {})",
            bytes[4], VERSION
        )));
    }

    let payload_len = u64::from_le_bytes(
        bytes[5..HEADER_LEN]
            .try_into()
            .expect("slice is exactly 8 bytes"),
    ) as usize;
    if bytes.len() != HEADER_LEN + payload_len + FOOTER_LEN {
        return Err(AfindexError::Search("payload length mismatch".to_string()));
    }

    let body_end = HEADER_LEN + payload_len;
    let footer = &bytes[body_end..];
    if footer[4..] != FOOTER_MAGIC {
        return Err(AfindexError::Search("bad footer magic".to_string()));
    }
    let stored_crc = u32::from_le_bytes(footer[..4].try_into().expect("slice is exactly 4 bytes"));
    let actual_crc = crc32(&bytes[..body_end]);
    if stored_crc != actual_crc {
        return Err(AfindexError::Search(format!(
            "checksum mismatch: stored {stored_crc:08x}, computed {actual_crc:08x}"
        )));
    }

    serde_json::from_slice(&bytes[HEADER_LEN..body_end])
        .map_err(|e| AfindexError::Search(format!("payload unreadable: {e}")))
}

/// Persist an index into `dest/index.afdx`, creating `dest` if absent.
///
/// The write is atomic with respect to readers: bytes land in a temp file
/// first and the final name appears only via rename.
pub fn save_index(index: &CaseIndex, dest: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dest).map_err(|e| AfindexError::Destination {
        path: dest.to_path_buf(),
        source: e,
    })?;

    let bytes = encode_index(index)?;
    let final_path = dest.join(INDEX_FILE_NAME);
    let tmp_path = dest.join(format!("{INDEX_FILE_NAME}.tmp"));

    fs::write(&tmp_path, &bytes).map_err(|e| AfindexError::Destination {
        path: tmp_path.clone(),
        source: e,
    })?;
    fs::rename(&tmp_path, &final_path).map_err(|e| AfindexError::Destination {
        path: final_path.clone(),
        source: e,
    })?;
    Ok(final_path)
}

/// Load a persisted index from `dest/index.afdx`, read-only.
pub fn load_index(dest: &Path) -> Result<CaseIndex> {
    let path = dest.join(INDEX_FILE_NAME);
    let bytes =
        fs::read(&path).map_err(|e| AfindexError::Search(format!("{}: {e}", path.display())))?;
    decode_index(&bytes)
}
