// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Query compilation: user-supplied filters into one composable expression.
//!
//! All inputs compile into a single tagged-variant [`Query`] tree:
//!
//! - free text fans out as a disjunction over the schema's free-text fields;
//! - each field filter becomes a field-scoped conjunction of terms;
//! - a year range expands to a disjunction of discrete year tokens (years are
//!   opaque tokens in the index, never compared numerically at search time);
//! - each boolean flag becomes one exact term.
//!
//! Everything present is ANDed together. Nothing present compiles to
//! [`Query::All`]. Clause order never changes the result set — terms are
//! strict boolean predicates, and the executor does pure set algebra.
//!
//! Rejections are typed errors: an unknown field, a filter with no usable
//! tokens, or an inverted/oversized year range fails compilation rather than
//! silently matching nothing. Callers can always tell "zero matches" from
//! "bad query".

use std::collections::BTreeMap;

use crate::error::{AfindexError, Result};
use crate::index::{bool_term, normalize, tokenize};
use crate::schema::{FieldDef, FieldKind, Schema};

/// Widest year range we'll expand into discrete tokens.
pub const MAX_YEAR_SPAN: i64 = 1000;

/// The recognized search options, all optional.
///
/// Maps are ordered so that compilation is deterministic; the search entry
/// point takes this plus pagination parameters.
#[derive(Debug, Clone, Default)]
pub struct QueryInputs {
    /// Multi-field free text: matches if ANY free-text field matches.
    pub free_text: Option<String>,
    /// field name → filter text, each ANDed with everything else.
    pub field_filters: BTreeMap<String, String>,
    /// Inclusive `(start, end)`; expands to a disjunction of year tokens.
    pub year_range: Option<(i64, i64)>,
    /// flag field name → required value.
    pub boolean_flags: BTreeMap<String, bool>,
}

impl QueryInputs {
    pub fn is_empty(&self) -> bool {
        self.free_text.is_none()
            && self.field_filters.is_empty()
            && self.year_range.is_none()
            && self.boolean_flags.is_empty()
    }
}

/// A compiled query expression.
///
/// One variant per predicate kind; combinators are explicit, so there is no
/// untyped nested-map interpretation anywhere downstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// Matches every indexed record.
    All,
    /// Exact term in one field.
    Term { field: String, term: String },
    /// Every sub-query must match.
    And(Vec<Query>),
    /// At least one sub-query must match.
    Or(Vec<Query>),
}

fn term(field: &str, term: impl Into<String>) -> Query {
    Query::Term {
        field: field.to_string(),
        term: term.into(),
    }
}

/// AND combinator that avoids degenerate single-child nodes.
fn and_of(mut clauses: Vec<Query>) -> Query {
    match clauses.len() {
        0 => Query::All,
        1 => clauses.remove(0),
        _ => Query::And(clauses),
    }
}

fn or_of(mut clauses: Vec<Query>) -> Query {
    match clauses.len() {
        0 => Query::All,
        1 => clauses.remove(0),
        _ => Query::Or(clauses),
    }
}

/// Parse filter text scoped to one field, per the field's kind.
fn field_query(field: &FieldDef, raw: &str) -> Result<Query> {
    match field.kind {
        FieldKind::Text => {
            let tokens = tokenize(raw);
            if tokens.is_empty() {
                return Err(AfindexError::Query(format!(
                    "filter on '{}' has no searchable terms",
                    field.name
                )));
            }
            Ok(and_of(
                tokens.into_iter().map(|t| term(&field.name, t)).collect(),
            ))
        }
        FieldKind::Keyword => {
            // Comma-separated entries, each an exact term; all must match.
            let entries: Vec<String> = raw
                .split(',')
                .map(normalize)
                .filter(|t| !t.is_empty())
                .collect();
            if entries.is_empty() {
                return Err(AfindexError::Query(format!(
                    "filter on '{}' has no searchable terms",
                    field.name
                )));
            }
            Ok(and_of(
                entries.into_iter().map(|t| term(&field.name, t)).collect(),
            ))
        }
        FieldKind::Id => {
            let t = normalize(raw);
            if t.is_empty() {
                return Err(AfindexError::Query(format!(
                    "filter on '{}' is empty",
                    field.name
                )));
            }
            Ok(term(&field.name, t))
        }
        FieldKind::Boolean => match normalize(raw).as_str() {
            "true" => Ok(term(&field.name, "true")),
            "false" => Ok(term(&field.name, "false")),
            other => Err(AfindexError::Query(format!(
                "filter on '{}' must be true or false, got '{other}'",
                field.name
            ))),
        },
        FieldKind::Numeric => Err(AfindexError::Query(format!(
            "field '{}' is stored only and cannot be filtered",
            field.name
        ))),
    }
}

/// The free-text disjunction: the query matches if ANY free-text field
/// matches the text. Field-scoped interpretation is lenient — a field whose
/// kind can't express the text (e.g. a multi-word value against an `Id`
/// field) simply contributes a clause that matches nothing there.
fn free_text_query(schema: &Schema, text: &str) -> Result<Query> {
    let tokens = tokenize(text);
    if tokens.is_empty() {
        return Err(AfindexError::Query(
            "free-text query has no searchable terms".to_string(),
        ));
    }

    let mut branches = Vec::new();
    for field in schema.free_text_fields() {
        let branch = match field.kind {
            FieldKind::Text => and_of(
                tokens
                    .iter()
                    .map(|t| term(&field.name, t.clone()))
                    .collect(),
            ),
            // Keyword/Id fields match the whole text as one exact term.
            _ => term(&field.name, normalize(text)),
        };
        branches.push(branch);
    }
    Ok(or_of(branches))
}

/// Expand an inclusive year range into a disjunction of exact year tokens.
fn year_range_query(start: i64, end: i64) -> Result<Query> {
    if start > end {
        return Err(AfindexError::Query(format!(
            "year range is inverted: {start} > {end}"
        )));
    }
    if end - start >= MAX_YEAR_SPAN {
        return Err(AfindexError::Query(format!(
            "year range too wide: {start}..={end} (max span {MAX_YEAR_SPAN})"
        )));
    }
    Ok(or_of(
        (start..=end).map(|y| term("years", y.to_string())).collect(),
    ))
}

/// Compile user inputs against a schema into one [`Query`].
///
/// No inputs at all compiles to [`Query::All`].
pub fn compile(schema: &Schema, inputs: &QueryInputs) -> Result<Query> {
    let mut clauses = Vec::new();

    if let Some(text) = &inputs.free_text {
        clauses.push(free_text_query(schema, text)?);
    }

    for (name, raw) in &inputs.field_filters {
        let field = schema
            .field(name)
            .ok_or_else(|| AfindexError::Query(format!("unknown field '{name}'")))?;
        clauses.push(field_query(field, raw)?);
    }

    if let Some((start, end)) = inputs.year_range {
        clauses.push(year_range_query(start, end)?);
    }

    for (name, value) in &inputs.boolean_flags {
        let field = schema
            .field(name)
            .ok_or_else(|| AfindexError::Query(format!("unknown flag '{name}'")))?;
        if field.kind != FieldKind::Boolean {
            return Err(AfindexError::Query(format!(
                "field '{name}' is not a boolean flag"
            )));
        }
        clauses.push(term(name, bool_term(*value)));
    }

    Ok(and_of(clauses))
}
