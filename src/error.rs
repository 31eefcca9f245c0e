// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Error taxonomy for build and search.
//!
//! Four failure classes with very different blast radii:
//!
//! - `Parse`: one source file is malformed. Recovered locally — the build
//!   logs it, counts it, and moves on to the next file.
//! - `Destination` / `Build`: the whole build run is doomed (unwritable
//!   output, serialization failure). Fatal to the run.
//! - `Query`: the caller handed us a filter we refuse to compile. The index
//!   is untouched; the caller gets the rejection, never an empty result set
//!   masquerading as success.
//! - `Search`: the index file itself is unreadable or corrupt. Fatal to that
//!   search call only.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Crate-wide error type.
#[derive(Error, Debug)]
pub enum AfindexError {
    /// A source record could not be decoded or parsed. Per-file; the batch
    /// continues.
    #[error("malformed record: {0}")]
    Parse(String),

    /// The index destination exists but cannot be written to, or cannot be
    /// created. Fatal to the build run.
    #[error("index destination not writable: {path}: {source}")]
    Destination {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The build run failed for a reason other than the destination.
    #[error("build failed: {0}")]
    Build(String),

    /// A user-supplied filter could not be compiled into a query.
    #[error("invalid query: {0}")]
    Query(String),

    /// The persisted index is unreadable or fails its integrity check.
    #[error("index unreadable: {0}")]
    Search(String),

    /// Underlying I/O failure not covered by a more specific variant.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result type alias for afindex operations.
pub type Result<T> = std::result::Result<T, AfindexError>;

impl AfindexError {
    /// Whether this error aborts an entire build run (as opposed to a single
    /// file or a single search call).
    pub fn is_fatal_to_build(&self) -> bool {
        matches!(
            self,
            AfindexError::Destination { .. } | AfindexError::Build(_) | AfindexError::Io(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AfindexError::Query("unknown field 'colour'".to_string());
        assert_eq!(err.to_string(), "invalid query: unknown field 'colour'");
    }

    #[test]
    fn test_parse_is_not_fatal() {
        assert!(!AfindexError::Parse("bad json".to_string()).is_fatal_to_build());
        assert!(AfindexError::Build("no records".to_string()).is_fatal_to_build());
    }

    #[test]
    fn test_destination_carries_path() {
        let err = AfindexError::Destination {
            path: PathBuf::from("/readonly/index"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("/readonly/index"));
        assert!(err.is_fatal_to_build());
    }
}
