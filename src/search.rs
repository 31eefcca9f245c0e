// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Query execution: where the rubber meets the road.
//!
//! Evaluation is pure set algebra over sorted posting lists — intersection
//! for AND, merge for OR, the full doc range for match-all. Matching doc
//! numbers come out ascending, which means results are in **insertion
//! order**: the order records entered the builder. That is the documented
//! deterministic order; repeated identical queries against an unchanged
//! index return identical sequences, and no hash-map iteration order ever
//! leaks into the output.
//!
//! Exactness filters are strict boolean predicates. They decide inclusion,
//! never rank.

use serde::Serialize;

use crate::error::{AfindexError, Result};
use crate::index::{CaseIndex, DocNo, StoredRecord};
use crate::paginate::{paginate, total_pages};
use crate::query::{compile, Query, QueryInputs};

/// A matching record materialized for the caller: the flat stored projection
/// plus `content` expanded back into the original structured record for
/// detail views.
#[derive(Debug, Clone, Serialize)]
pub struct ResultRecord {
    pub doc_id: String,
    pub document_type: String,
    pub afile_number: String,
    pub countries: Vec<String>,
    pub years: Vec<i64>,
    pub is_cert_naturalization: bool,
    pub is_g325a: bool,
    pub is_afile_redacted: bool,
    pub is_afile_withdrawn: bool,
    pub dev_idx: i64,
    pub pagenumber: i64,
    pub url: String,
    pub ocr_path: String,
    /// The full original record, structured. Drives the detail view; `url`
    /// drives the external image fetch.
    pub content: serde_json::Value,
}

impl ResultRecord {
    fn from_stored(stored: &StoredRecord) -> Result<Self> {
        let content: serde_json::Value = serde_json::from_str(&stored.content)
            .map_err(|e| AfindexError::Search(format!("stored content corrupt: {e}")))?;
        let r = &stored.record;
        Ok(ResultRecord {
            doc_id: r.doc_id.clone(),
            document_type: r.document_type.clone(),
            afile_number: r.afile_number.clone(),
            countries: r.countries.clone(),
            years: r.years.clone(),
            is_cert_naturalization: r.is_cert_naturalization,
            is_g325a: r.is_g325a,
            is_afile_redacted: r.is_afile_redacted,
            is_afile_withdrawn: r.is_afile_withdrawn,
            dev_idx: r.dev_idx,
            pagenumber: r.pagenumber,
            url: r.url.clone(),
            ocr_path: r.ocr_path.clone(),
            content,
        })
    }
}

/// Intersect two sorted doc-number lists.
fn intersect(a: &[DocNo], b: &[DocNo]) -> Vec<DocNo> {
    let mut out = Vec::with_capacity(a.len().min(b.len()));
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                out.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    out
}

/// Merge two sorted doc-number lists, dropping duplicates.
fn union(a: &[DocNo], b: &[DocNo]) -> Vec<DocNo> {
    let mut out = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => {
                out.push(a[i]);
                i += 1;
            }
            std::cmp::Ordering::Greater => {
                out.push(b[j]);
                j += 1;
            }
            std::cmp::Ordering::Equal => {
                out.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    out.extend_from_slice(&a[i..]);
    out.extend_from_slice(&b[j..]);
    out
}

/// Evaluate a query to the sorted set of matching doc numbers.
fn eval(index: &CaseIndex, query: &Query) -> Vec<DocNo> {
    match query {
        Query::All => (0..index.num_docs() as DocNo).collect(),
        Query::Term { field, term } => index.postings(field, term).to_vec(),
        Query::And(clauses) => {
            let mut sets: Vec<Vec<DocNo>> = clauses.iter().map(|c| eval(index, c)).collect();
            // Intersect smallest-first; the result only shrinks.
            sets.sort_by_key(Vec::len);
            let mut iter = sets.into_iter();
            let mut acc = iter.next().unwrap_or_default();
            for set in iter {
                if acc.is_empty() {
                    break;
                }
                acc = intersect(&acc, &set);
            }
            acc
        }
        Query::Or(clauses) => {
            let mut acc = Vec::new();
            for clause in clauses {
                acc = union(&acc, &eval(index, clause));
            }
            acc
        }
    }
}

/// Run a compiled query, returning every match in insertion order.
///
/// No implicit limit: the caller gets all matches unless they ask for fewer
/// via [`execute_limited`].
pub fn execute(index: &CaseIndex, query: &Query) -> Result<Vec<ResultRecord>> {
    execute_limited(index, query, usize::MAX)
}

/// Run a compiled query, materializing at most `limit` results.
pub fn execute_limited(index: &CaseIndex, query: &Query, limit: usize) -> Result<Vec<ResultRecord>> {
    eval(index, query)
        .into_iter()
        .take(limit)
        .map(|n| {
            let stored = index
                .doc(n)
                .ok_or_else(|| AfindexError::Search(format!("doc number {n} out of range")))?;
            ResultRecord::from_stored(stored)
        })
        .collect()
}

/// One page of results plus the totals a presentation layer needs for page
/// navigation.
#[derive(Debug, Clone, Serialize)]
pub struct SearchPage {
    pub results: Vec<ResultRecord>,
    pub total_count: usize,
    pub total_pages: usize,
}

/// The paged search entry point: compile, execute, paginate.
///
/// `page` is 1-indexed; a page past the end yields an empty result list with
/// the totals intact. All session state (which page the user is on) lives
/// with the caller — nothing here persists between calls.
pub fn search(
    index: &CaseIndex,
    inputs: &QueryInputs,
    page: usize,
    page_size: usize,
) -> Result<SearchPage> {
    let query = compile(index.schema(), inputs)?;
    let matches = eval(index, &query);

    let total_count = matches.len();
    let pages = total_pages(total_count, page_size);
    let results = paginate(&matches, page, page_size)
        .iter()
        .map(|&n| {
            let stored = index
                .doc(n)
                .ok_or_else(|| AfindexError::Search(format!("doc number {n} out of range")))?;
            ResultRecord::from_stored(stored)
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(SearchPage {
        results,
        total_count,
        total_pages: pages,
    })
}
