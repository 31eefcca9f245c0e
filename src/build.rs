// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Batch index build: a directory of record files in, one persisted index out.
//!
//! Per-file failures (unreadable bytes, malformed JSON, duplicate doc_id) are
//! recovered locally: logged to stderr, counted, batch continues. Only a
//! build-wide failure — unreadable input directory, unwritable destination —
//! aborts the run.
//!
//! Files are processed in file-name order so that doc numbers, and therefore
//! result order, are reproducible for a given corpus. The index becomes
//! visible only when the final rename in [`save_index`] lands; a search
//! running against the previous index never observes a partial build.

use std::fs;
use std::path::{Path, PathBuf};

use crate::binary::save_index;
use crate::error::Result;
use crate::index::{AddOutcome, CaseIndex, IndexBuilder};
use crate::record::parse_record;
use crate::schema::Schema;

/// Counters from one build run, for observability.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Records that made it into the index.
    pub indexed: usize,
    /// Files skipped because they could not be read or parsed.
    pub skipped: usize,
    /// Records dropped because their doc_id was already indexed.
    pub duplicates: usize,
}

/// Enumerate the candidate record files in a directory.
///
/// Regular files only, dotfiles excluded (`.DS_Store` and friends), sorted
/// by file name for reproducible insertion order.
fn record_files(input: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(input)? {
        let entry = entry?;
        let path = entry.path();
        let hidden = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with('.'));
        if hidden || !entry.file_type()?.is_file() {
            continue;
        }
        paths.push(path);
    }
    paths.sort();
    Ok(paths)
}

/// Build an in-memory index from every readable record file in `input`.
///
/// Returns the sealed index and the skip/duplicate counters. Nothing is
/// persisted; see [`build_and_save`] for the full write path.
pub fn build_from_dir(input: &Path) -> Result<(CaseIndex, BuildStats)> {
    let mut builder = IndexBuilder::new(Schema::case_records());
    let mut stats = BuildStats::default();

    for path in record_files(input)? {
        let raw = match fs::read(&path) {
            Ok(raw) => raw,
            Err(e) => {
                eprintln!("⚠️  skipping {}: {e}", path.display());
                stats.skipped += 1;
                continue;
            }
        };
        let parsed = match parse_record(&raw) {
            Ok(parsed) => parsed,
            Err(e) => {
                eprintln!("⚠️  skipping {}: {e}", path.display());
                stats.skipped += 1;
                continue;
            }
        };
        match builder.add(parsed) {
            AddOutcome::Indexed(_) => stats.indexed += 1,
            AddOutcome::DuplicateDocId => {
                eprintln!("⚠️  skipping {}: duplicate doc_id", path.display());
                stats.duplicates += 1;
            }
        }
    }

    Ok((builder.build(), stats))
}

/// The full build write path: read `input`, build, commit atomically to
/// `dest`. The single logical transaction of the batch is the final rename
/// inside [`save_index`].
pub fn build_and_save(input: &Path, dest: &Path) -> Result<BuildStats> {
    let (index, stats) = build_from_dir(input)?;
    save_index(&index, dest)?;
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binary::load_index;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, contents: &[u8]) {
        let mut f = fs::File::create(dir.join(name)).unwrap();
        f.write_all(contents).unwrap();
    }

    #[test]
    fn test_build_skips_malformed_keeps_siblings() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "a.json", br#"{"doc_id": "D-1"}"#);
        write_file(dir.path(), "b.json", b"{definitely not json");
        write_file(dir.path(), "c.json", br#"{"doc_id": "D-3"}"#);

        let (index, stats) = build_from_dir(dir.path()).unwrap();
        assert_eq!(stats.indexed, 2);
        assert_eq!(stats.skipped, 1);
        assert_eq!(index.num_docs(), 2);
        assert_eq!(index.postings("doc_id", "d-3"), &[1]);
    }

    #[test]
    fn test_build_ignores_dotfiles() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), ".DS_Store", b"\x00\x01garbage");
        write_file(dir.path(), "a.json", br#"{"doc_id": "D-1"}"#);

        let (_, stats) = build_from_dir(dir.path()).unwrap();
        assert_eq!(stats.indexed, 1);
        assert_eq!(stats.skipped, 0);
    }

    #[test]
    fn test_build_counts_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "a.json", br#"{"doc_id": "D-1"}"#);
        write_file(dir.path(), "b.json", br#"{"doc_id": "D-1"}"#);

        let (index, stats) = build_from_dir(dir.path()).unwrap();
        assert_eq!(stats.indexed, 1);
        assert_eq!(stats.duplicates, 1);
        assert_eq!(index.num_docs(), 1);
    }

    #[test]
    fn test_files_indexed_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "z.json", br#"{"doc_id": "D-z"}"#);
        write_file(dir.path(), "a.json", br#"{"doc_id": "D-a"}"#);

        let (index, _) = build_from_dir(dir.path()).unwrap();
        assert_eq!(index.postings("doc_id", "d-a"), &[0]);
        assert_eq!(index.postings("doc_id", "d-z"), &[1]);
    }

    #[test]
    fn test_missing_input_dir_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(build_from_dir(&missing).is_err());
    }

    #[test]
    fn test_build_and_save_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let corpus = dir.path().join("corpus");
        fs::create_dir(&corpus).unwrap();
        write_file(&corpus, "a.json", br#"{"doc_id": "D-1", "years": [1951]}"#);

        let dest = dir.path().join("index");
        let stats = build_and_save(&corpus, &dest).unwrap();
        assert_eq!(stats.indexed, 1);

        let index = load_index(&dest).unwrap();
        assert_eq!(index.postings("years", "1951"), &[0]);
    }
}
