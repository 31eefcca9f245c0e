// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Parsing one source file into a typed record.
//!
//! Source files are one JSON object per scanned document, usually UTF-8 but
//! occasionally Latin-1 (old OCR pipelines). We try UTF-8 first and fall back
//! to Latin-1 before giving up — Latin-1 decoding cannot fail, since every
//! byte maps to the Unicode scalar with the same value.
//!
//! Every field has a default, so a partially-populated source document still
//! produces a valid record. A parse failure is a typed error, never a panic;
//! the batch build logs it and keeps going.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::error::{AfindexError, Result};

/// Typed metadata for one scanned document.
///
/// Unknown JSON keys are tolerated (they survive inside [`ParsedRecord::content`]),
/// and missing keys default to empty/false/zero per the schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaseRecord {
    #[serde(default)]
    pub document_type: String,
    #[serde(default)]
    pub is_cert_naturalization: bool,
    #[serde(default)]
    pub is_g325a: bool,
    #[serde(default)]
    pub countries: Vec<String>,
    #[serde(default)]
    pub years: Vec<i64>,
    #[serde(default)]
    pub doc_id: String,
    #[serde(default)]
    pub afile_number: String,
    #[serde(default)]
    pub dev_idx: i64,
    #[serde(default)]
    pub pagenumber: i64,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub is_afile_redacted: bool,
    #[serde(default)]
    pub is_afile_withdrawn: bool,
    #[serde(default)]
    pub ocr_path: String,
}

/// A record plus its full original content, re-serialized as one JSON blob.
///
/// The content blob is what gets stored whole in the index (for detail views)
/// and tokenized for free-text search. It always contains every key from the
/// source file, including ones the typed record doesn't model.
#[derive(Debug, Clone)]
pub struct ParsedRecord {
    pub record: CaseRecord,
    pub content: String,
}

/// Decode raw bytes as UTF-8, falling back to Latin-1.
fn decode(raw: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(raw) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => Cow::Owned(raw.iter().map(|&b| b as char).collect()),
    }
}

/// Parse one source file's bytes into a [`ParsedRecord`].
///
/// Tolerates UTF-8 and Latin-1 encodings. Returns `AfindexError::Parse` on
/// JSON syntax errors or a non-object top level.
pub fn parse_record(raw: &[u8]) -> Result<ParsedRecord> {
    let text = decode(raw);

    let value: serde_json::Value = serde_json::from_str(&text)
        .map_err(|e| AfindexError::Parse(format!("invalid JSON: {e}")))?;
    if !value.is_object() {
        return Err(AfindexError::Parse(
            "top-level JSON value is not an object".to_string(),
        ));
    }

    let record: CaseRecord = serde_json::from_value(value.clone())
        .map_err(|e| AfindexError::Parse(format!("schema mismatch: {e}")))?;
    let content = serde_json::to_string(&value)
        .map_err(|e| AfindexError::Parse(format!("re-serialization failed: {e}")))?;

    Ok(ParsedRecord { record, content })
}
