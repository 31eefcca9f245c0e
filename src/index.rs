// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Inverted index construction.
//!
//! Each schema field gets its own term → posting-list map, so `doc_id:D-042`
//! and a free-text hit on "042" never collide. Posting lists hold internal
//! document numbers (positions in the insertion-ordered `docs` array) sorted
//! ascending — that ordering is what makes result order deterministic all the
//! way up the stack.
//!
//! # INVARIANTS (DO NOT VIOLATE)
//!
//! 1. **POSTING_LIST_SORTED**: every posting list is sorted ascending with no
//!    duplicates.
//! 2. **DOC_NUMBERS_DENSE**: doc number `n` refers to exactly `docs[n]`;
//!    numbers are assigned in insertion order and never reused.
//! 3. **SCHEMA_FIXED**: the schema is set at builder construction and is
//!    immutable for the lifetime of the index.
//! 4. **CONTENT_WHOLE**: every stored record carries its full content blob,
//!    never a truncation.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use crate::record::{CaseRecord, ParsedRecord};
use crate::schema::{FieldDef, FieldKind, Schema};

/// Internal document number: position in the insertion-ordered docs array.
pub type DocNo = u32;

/// Normalize a string for indexing and matching: NFD-decompose, strip
/// combining marks, lowercase, collapse whitespace.
///
/// - "José" → "jose"
/// - "  UNITED   KINGDOM " → "united kingdom"
pub fn normalize(value: &str) -> String {
    value
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Check if a character is a combining mark (diacritic).
fn is_combining_mark(c: char) -> bool {
    matches!(c,
        '\u{0300}'..='\u{036F}' |  // Combining Diacritical Marks
        '\u{1DC0}'..='\u{1DFF}' |  // Combining Diacritical Marks Supplement
        '\u{20D0}'..='\u{20FF}' |  // Combining Diacritical Marks for Symbols
        '\u{FE20}'..='\u{FE2F}'    // Combining Half Marks
    )
}

/// Tokenize free text into normalized words.
///
/// Words are maximal runs of alphanumeric characters; everything else is a
/// separator. Empty tokens are dropped.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .map(normalize)
        .filter(|t| !t.is_empty())
        .collect()
}

/// The indexed term for a boolean flag value.
pub fn bool_term(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

/// Index terms for one schema field of one record.
///
/// The `Numeric` kind yields nothing: those fields are stored for display but
/// never searchable.
fn field_terms(field: &FieldDef, record: &CaseRecord, content: &str) -> Vec<String> {
    let raw: Vec<String> = match field.name.as_str() {
        "document_type" => vec![record.document_type.clone()],
        "countries" => record.countries.clone(),
        "years" => record.years.iter().map(|y| y.to_string()).collect(),
        "doc_id" => vec![record.doc_id.clone()],
        "afile_number" => vec![record.afile_number.clone()],
        "url" => vec![record.url.clone()],
        "ocr_path" => vec![record.ocr_path.clone()],
        "content" => vec![content.to_string()],
        "is_cert_naturalization" => return vec![bool_term(record.is_cert_naturalization).into()],
        "is_g325a" => return vec![bool_term(record.is_g325a).into()],
        "is_afile_redacted" => return vec![bool_term(record.is_afile_redacted).into()],
        "is_afile_withdrawn" => return vec![bool_term(record.is_afile_withdrawn).into()],
        _ => return Vec::new(),
    };

    match field.kind {
        FieldKind::Text => raw.iter().flat_map(|v| tokenize(v)).collect(),
        FieldKind::Keyword | FieldKind::Id => raw
            .iter()
            .map(|v| normalize(v))
            .filter(|t| !t.is_empty())
            .collect(),
        // Booleans returned above; numerics are stored-only.
        FieldKind::Boolean | FieldKind::Numeric => Vec::new(),
    }
}

/// One record as stored in the index: the typed projection plus the full
/// content blob for detail views.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredRecord {
    pub record: CaseRecord,
    pub content: String,
}

/// Posting lists for one field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldPostings {
    /// term → sorted, deduplicated doc numbers
    pub terms: HashMap<String, Vec<DocNo>>,
}

/// The complete immutable index: schema, per-field postings, stored records.
///
/// Built once, then read-only. Searches take `&CaseIndex` and never mutate,
/// so any number of them can run concurrently without locking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseIndex {
    schema: Schema,
    fields: HashMap<String, FieldPostings>,
    docs: Vec<StoredRecord>,
}

impl CaseIndex {
    /// The schema this index was built with.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Number of indexed records.
    pub fn num_docs(&self) -> usize {
        self.docs.len()
    }

    /// Stored record by internal doc number.
    pub fn doc(&self, n: DocNo) -> Option<&StoredRecord> {
        self.docs.get(n as usize)
    }

    /// Posting list for an exact term in a field. A missing field or term is
    /// an empty list, not an error — zero matches is a valid answer.
    pub fn postings(&self, field: &str, term: &str) -> &[DocNo] {
        self.fields
            .get(field)
            .and_then(|fp| fp.terms.get(term))
            .map_or(&[], Vec::as_slice)
    }
}

/// What happened when a record was offered to the builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Indexed(DocNo),
    /// A record with the same non-empty `doc_id` was already indexed; this
    /// one was dropped (first write wins).
    DuplicateDocId,
}

/// Accumulates records into an in-memory index, then seals it.
///
/// Consumes records one at a time; nothing is visible to searches until
/// [`IndexBuilder::build`] returns and the result is persisted.
pub struct IndexBuilder {
    schema: Schema,
    fields: HashMap<String, FieldPostings>,
    docs: Vec<StoredRecord>,
    seen_doc_ids: HashSet<String>,
}

impl IndexBuilder {
    pub fn new(schema: Schema) -> Self {
        let fields = schema
            .fields()
            .iter()
            .map(|f| (f.name.clone(), FieldPostings::default()))
            .collect();
        IndexBuilder {
            schema,
            fields,
            docs: Vec::new(),
            seen_doc_ids: HashSet::new(),
        }
    }

    /// Add one parsed record.
    ///
    /// Records whose `doc_id` was already seen are dropped: first write wins.
    /// Records with an empty `doc_id` never collide with each other —
    /// uniqueness is only meaningful for real identifiers.
    pub fn add(&mut self, parsed: ParsedRecord) -> AddOutcome {
        if !parsed.record.doc_id.is_empty()
            && !self.seen_doc_ids.insert(parsed.record.doc_id.clone())
        {
            return AddOutcome::DuplicateDocId;
        }

        let doc_no = self.docs.len() as DocNo;
        for field in self.schema.fields() {
            let terms = field_terms(field, &parsed.record, &parsed.content);
            let postings = self
                .fields
                .get_mut(&field.name)
                .expect("builder initialized a map per schema field");
            for term in terms {
                let list = postings.terms.entry(term).or_default();
                // INVARIANT: POSTING_LIST_SORTED — doc numbers only grow, so
                // guarding against a repeated tail keeps lists sorted+deduped.
                if list.last() != Some(&doc_no) {
                    list.push(doc_no);
                }
            }
        }

        self.docs.push(StoredRecord {
            record: parsed.record,
            content: parsed.content,
        });
        AddOutcome::Indexed(doc_no)
    }

    /// Seal the builder into an immutable index.
    pub fn build(self) -> CaseIndex {
        CaseIndex {
            schema: self.schema,
            fields: self.fields,
            docs: self.docs,
        }
    }
}

/// Check index invariants (debug assertion for tests).
#[cfg(any(debug_assertions, test))]
#[allow(dead_code)]
pub fn check_index_well_formed(index: &CaseIndex) -> bool {
    for fp in index.fields.values() {
        for list in fp.terms.values() {
            if list.is_empty() {
                return false;
            }
            for pair in list.windows(2) {
                if pair[0] >= pair[1] {
                    return false;
                }
            }
            if list.last().copied().unwrap_or(0) as usize >= index.docs.len() {
                return false;
            }
        }
    }
    true
}
