// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Inverted-index search over scanned case-file metadata records.
//!
//! One JSON file per scanned document goes in; a persisted, checksummed
//! index comes out; structured + free-text searches with deterministic
//! pagination run against it.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ record.rs  │────▶│  index.rs   │────▶│  binary.rs  │   write path
//! │ (parse +   │     │ (schema-    │     │ (checksummed│   (build.rs)
//! │  defaults) │     │  driven     │     │  on-disk    │
//! └────────────┘     │  postings)  │     │  format)    │
//!                    └─────────────┘     └─────────────┘
//!                           ▲                   │
//!                           │                   ▼
//! ┌────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  query.rs  │────▶│  search.rs  │────▶│ paginate.rs │   read path
//! │ (inputs →  │     │ (set algebra│     │ (pure page  │
//! │  AST)      │     │  + project) │     │  math)      │
//! └────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! The schema ([`Schema::case_records`]) is an explicit immutable value
//! constructed once at builder initialization and serialized with the index;
//! build and query-compile both consult it. The index is write-once: built in
//! a single pass, committed atomically, then opened read-only — concurrent
//! searches share `&CaseIndex` freely.
//!
//! # Usage
//!
//! ```ignore
//! use afindex::{build_and_save, load_index, search, QueryInputs};
//!
//! build_and_save("records/".as_ref(), "index/".as_ref())?;
//! let index = load_index("index/".as_ref())?;
//!
//! let inputs = QueryInputs {
//!     free_text: Some("naturalization".to_string()),
//!     year_range: Some((1950, 1952)),
//!     ..QueryInputs::default()
//! };
//! let page = search(&index, &inputs, 1, 20)?;
//! println!("{} matches", page.total_count);
//! ```

// Module declarations
pub mod binary;
mod build;
mod error;
mod index;
mod paginate;
mod query;
mod record;
mod schema;
mod search;
pub mod testing;

// Re-exports for public API
pub use binary::{load_index, save_index, INDEX_FILE_NAME};
pub use build::{build_and_save, build_from_dir, BuildStats};
pub use error::{AfindexError, Result};
pub use index::{normalize, tokenize, AddOutcome, CaseIndex, DocNo, IndexBuilder, StoredRecord};
pub use paginate::{paginate, total_pages};
pub use query::{compile, Query, QueryInputs, MAX_YEAR_SPAN};
pub use record::{parse_record, CaseRecord, ParsedRecord};
pub use schema::{FieldDef, FieldKind, Schema};
pub use search::{execute, execute_limited, search, ResultRecord, SearchPage};
