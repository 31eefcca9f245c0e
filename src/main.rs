// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;

use afindex::{
    build_and_save, load_index, search, AfindexError, QueryInputs, Result, SearchPage,
};

mod cli;
use cli::{Cli, Commands};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Index { path, output } => run_index(&path, &output),
        Commands::Search {
            index,
            text,
            filters,
            year_from,
            year_to,
            flags,
            page,
            page_size,
            detail,
        } => run_search(
            &index, text, &filters, year_from, year_to, &flags, page, page_size, detail,
        ),
    };

    if let Err(e) = outcome {
        eprintln!("❌ {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn run_index(path: &str, output: &str) -> Result<()> {
    let stats = build_and_save(Path::new(path), Path::new(output))?;
    eprintln!(
        "✅ {} records indexed │ {} skipped │ {} duplicates",
        stats.indexed, stats.skipped, stats.duplicates
    );
    // Completion marker on stdout; scripts wait for this line.
    println!("Indexing complete!");
    Ok(())
}

/// Parse a repeatable `field=value` argument.
fn parse_filter(raw: &str) -> Result<(String, String)> {
    match raw.split_once('=') {
        Some((field, value)) if !field.is_empty() => {
            Ok((field.trim().to_string(), value.to_string()))
        }
        _ => Err(AfindexError::Query(format!(
            "filter must be FIELD=VALUE, got '{raw}'"
        ))),
    }
}

/// Parse a repeatable flag argument: `name` means true, `name=bool` is
/// explicit.
fn parse_flag(raw: &str) -> Result<(String, bool)> {
    match raw.split_once('=') {
        None => Ok((raw.trim().to_string(), true)),
        Some((name, "true")) => Ok((name.trim().to_string(), true)),
        Some((name, "false")) => Ok((name.trim().to_string(), false)),
        Some((_, other)) => Err(AfindexError::Query(format!(
            "flag value must be true or false, got '{other}'"
        ))),
    }
}

#[allow(clippy::too_many_arguments)]
fn run_search(
    index_dir: &str,
    text: Option<String>,
    filters: &[String],
    year_from: Option<i64>,
    year_to: Option<i64>,
    flags: &[String],
    page: usize,
    page_size: usize,
    detail: bool,
) -> Result<()> {
    let mut inputs = QueryInputs {
        free_text: text,
        ..QueryInputs::default()
    };
    for raw in filters {
        let (field, value) = parse_filter(raw)?;
        inputs.field_filters.insert(field, value);
    }
    if let (Some(from), Some(to)) = (year_from, year_to) {
        inputs.year_range = Some((from, to));
    }
    for raw in flags {
        let (name, value) = parse_flag(raw)?;
        inputs.boolean_flags.insert(name, value);
    }

    let index = load_index(Path::new(index_dir))?;
    let found = search(&index, &inputs, page, page_size)?;
    print_page(&found, page, detail);
    Ok(())
}

fn print_page(found: &SearchPage, page: usize, detail: bool) {
    for result in &found.results {
        println!(
            "{}\t{}\t{}\t{}",
            result.doc_id, result.document_type, result.afile_number, result.url
        );
        if detail {
            match serde_json::to_string_pretty(&result.content) {
                Ok(pretty) => println!("{pretty}"),
                Err(e) => eprintln!("⚠️  content unprintable: {e}"),
            }
        }
    }
    println!(
        "page {}/{} ({} matches)",
        page, found.total_pages, found.total_count
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_filter() {
        assert_eq!(
            parse_filter("afile_number=A123").unwrap(),
            ("afile_number".to_string(), "A123".to_string())
        );
        // Values may contain '='.
        assert_eq!(
            parse_filter("url=https://a.example/?q=1").unwrap().1,
            "https://a.example/?q=1"
        );
        assert!(parse_filter("no-equals-sign").is_err());
        assert!(parse_filter("=value").is_err());
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("is_g325a").unwrap(), ("is_g325a".to_string(), true));
        assert_eq!(
            parse_flag("is_afile_redacted=false").unwrap(),
            ("is_afile_redacted".to_string(), false)
        );
        assert!(parse_flag("is_g325a=maybe").is_err());
    }
}
