// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Test utilities shared across unit and integration tests.
//!
//! This module is always compiled but hidden from documentation.
//! It provides canonical implementations of test helpers to avoid duplication.

#![doc(hidden)]

use crate::record::{CaseRecord, ParsedRecord};

/// Create a minimal record with just a doc_id.
pub fn make_record(doc_id: &str) -> CaseRecord {
    CaseRecord {
        doc_id: doc_id.to_string(),
        ..CaseRecord::default()
    }
}

/// Create a record with the fields the fixture tests care about.
pub fn make_record_full(
    doc_id: &str,
    document_type: &str,
    afile_number: &str,
    countries: &[&str],
    years: &[i64],
) -> CaseRecord {
    CaseRecord {
        doc_id: doc_id.to_string(),
        document_type: document_type.to_string(),
        afile_number: afile_number.to_string(),
        countries: countries.iter().map(|c| c.to_string()).collect(),
        years: years.to_vec(),
        url: format!("https://archive.example/{doc_id}"),
        ..CaseRecord::default()
    }
}

/// Wrap a record the way `parse_record` would: content is the record
/// serialized back to a JSON blob.
pub fn make_parsed(record: CaseRecord) -> ParsedRecord {
    let content = serde_json::to_string(&record).expect("record serializes");
    ParsedRecord { record, content }
}
