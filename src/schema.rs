// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The field schema that governs what gets indexed and how.
//!
//! The schema is an explicit immutable value: built once when an
//! [`IndexBuilder`](crate::index::IndexBuilder) is created, serialized into
//! the index file, and consulted again at query-compile time. It is never a
//! process-wide singleton — two indexes in one process can (in principle)
//! carry different schemas without stepping on each other.
//!
//! Field kinds map one-to-one onto indexing behavior:
//!
//! | kind      | indexing                                   |
//! |-----------|--------------------------------------------|
//! | `Text`    | tokenized into normalized words            |
//! | `Keyword` | one exact term per comma-separated entry   |
//! | `Id`      | the whole value as a single exact term     |
//! | `Boolean` | single term, `"true"` or `"false"`         |
//! | `Numeric` | stored only, not searchable                |

use serde::{Deserialize, Serialize};

/// How a field's value is turned into index terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Free text, tokenized into words.
    Text,
    /// A set of discrete labels; each label is one exact term.
    Keyword,
    /// An opaque identifier matched only as a whole.
    Id,
    /// A flag indexed as `"true"` or `"false"`.
    Boolean,
    /// Stored for display, never searchable.
    Numeric,
}

/// One field in the schema.
///
/// Every field is stored (the original value survives into search results);
/// `free_text` marks the fields a bare multi-field text query fans out over.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    pub kind: FieldKind,
    /// Included in the multi-field free-text disjunction.
    pub free_text: bool,
}

/// An immutable, ordered collection of field definitions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schema {
    fields: Vec<FieldDef>,
}

impl Schema {
    /// The fixed schema for scanned case-file metadata records.
    ///
    /// Field order here is the canonical field order everywhere else
    /// (stored projections, CLI output).
    pub fn case_records() -> Self {
        fn field(name: &str, kind: FieldKind, free_text: bool) -> FieldDef {
            FieldDef {
                name: name.to_string(),
                kind,
                free_text,
            }
        }

        Schema {
            fields: vec![
                field("document_type", FieldKind::Text, true),
                field("is_cert_naturalization", FieldKind::Boolean, false),
                field("is_g325a", FieldKind::Boolean, false),
                field("countries", FieldKind::Keyword, true),
                field("years", FieldKind::Keyword, false),
                field("doc_id", FieldKind::Id, true),
                field("afile_number", FieldKind::Id, true),
                field("dev_idx", FieldKind::Numeric, false),
                field("pagenumber", FieldKind::Numeric, false),
                field("url", FieldKind::Id, false),
                field("is_afile_redacted", FieldKind::Boolean, false),
                field("is_afile_withdrawn", FieldKind::Boolean, false),
                field("ocr_path", FieldKind::Id, false),
                field("content", FieldKind::Text, true),
            ],
        }
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// All fields, in canonical order.
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// The fields a bare free-text query searches across.
    pub fn free_text_fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter().filter(|f| f.free_text)
    }
}
