// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! CLI definitions for the afindex command-line interface.
//!
//! Two subcommands: `index` to build an index from a directory of record
//! files, and `search` to query a built index with any combination of free
//! text, field filters, a year range, and boolean flags.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "afindex",
    about = "Case-file metadata index builder and search tool",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a search index from a directory of JSON record files
    Index {
        /// Path to the directory of per-document record files
        #[arg(long)]
        path: String,

        /// Destination directory for the persisted index
        #[arg(long, default_value = "index")]
        output: String,
    },

    /// Search a built index
    Search {
        /// Directory containing the persisted index
        #[arg(long, default_value = "index")]
        index: String,

        /// Free-text query across document_type, countries, doc_id,
        /// afile_number, and content
        #[arg(long)]
        text: Option<String>,

        /// Field-scoped filter, repeatable (e.g. --filter afile_number=A123)
        #[arg(long = "filter", value_name = "FIELD=VALUE")]
        filters: Vec<String>,

        /// Inclusive lower bound of a year range (requires --year-to)
        #[arg(long, requires = "year_to")]
        year_from: Option<i64>,

        /// Inclusive upper bound of a year range (requires --year-from)
        #[arg(long, requires = "year_from")]
        year_to: Option<i64>,

        /// Boolean flag that must be set, repeatable
        /// (e.g. --flag is_g325a, or --flag is_afile_redacted=false)
        #[arg(long = "flag", value_name = "NAME[=BOOL]")]
        flags: Vec<String>,

        /// 1-indexed page of results to display
        #[arg(long, default_value = "1")]
        page: usize,

        /// Results per page
        #[arg(long, default_value = "20")]
        page_size: usize,

        /// Print the full structured content of each result
        #[arg(long)]
        detail: bool,
    },
}
