//! Integration tests: the full write path (directory → persisted index) and
//! read path (load → compile → execute → paginate) end to end.

mod common;

use std::fs;

use afindex::{
    build_and_save, load_index, search, AfindexError, QueryInputs, INDEX_FILE_NAME,
};
use common::{seed_corpus, write_record};
use tempfile::tempdir;

#[test]
fn test_build_then_search_round_trip() {
    let dir = tempdir().unwrap();
    let corpus = dir.path().join("corpus");
    fs::create_dir(&corpus).unwrap();
    seed_corpus(&corpus);

    let dest = dir.path().join("index");
    let stats = build_and_save(&corpus, &dest).unwrap();
    assert_eq!(stats.indexed, 4);
    assert_eq!(stats.skipped, 0);

    let index = load_index(&dest).unwrap();
    let mut inputs = QueryInputs::default();
    inputs
        .field_filters
        .insert("doc_id".to_string(), "D-0001".to_string());
    let page = search(&index, &inputs, 1, 20).unwrap();

    assert_eq!(page.total_count, 1);
    let hit = &page.results[0];
    assert_eq!(hit.afile_number, "A1234567");
    assert_eq!(hit.url, "https://archive.example/D-0001");
    // Detail view: the full structured record survives the round trip.
    assert_eq!(hit.content["document_type"], "Certificate of Naturalization");
    assert_eq!(hit.content["years"][1], 1951);
}

#[test]
fn test_malformed_sibling_is_skipped_and_unsearchable() {
    let dir = tempdir().unwrap();
    let corpus = dir.path().join("corpus");
    fs::create_dir(&corpus).unwrap();
    seed_corpus(&corpus);
    write_record(&corpus, "0005.json", "{broken json!!");

    let dest = dir.path().join("index");
    let stats = build_and_save(&corpus, &dest).unwrap();
    assert_eq!(stats.indexed, 4);
    assert_eq!(stats.skipped, 1);

    let index = load_index(&dest).unwrap();
    let page = search(&index, &QueryInputs::default(), 1, 20).unwrap();
    assert_eq!(page.total_count, 4);
}

#[test]
fn test_combined_filters_over_persisted_index() {
    let dir = tempdir().unwrap();
    let corpus = dir.path().join("corpus");
    fs::create_dir(&corpus).unwrap();
    seed_corpus(&corpus);

    let dest = dir.path().join("index");
    build_and_save(&corpus, &dest).unwrap();
    let index = load_index(&dest).unwrap();

    // Poland AND years 1950-1952: docs 0001 and 0003.
    let mut inputs = QueryInputs {
        year_range: Some((1950, 1952)),
        ..QueryInputs::default()
    };
    inputs
        .field_filters
        .insert("countries".to_string(), "Poland".to_string());
    let page = search(&index, &inputs, 1, 20).unwrap();
    let ids: Vec<&str> = page.results.iter().map(|r| r.doc_id.as_str()).collect();
    assert_eq!(ids, vec!["D-0001", "D-0003"]);

    // Narrow with the redaction flag: only 0003.
    inputs
        .boolean_flags
        .insert("is_afile_redacted".to_string(), true);
    let page = search(&index, &inputs, 1, 20).unwrap();
    assert_eq!(page.total_count, 1);
    assert_eq!(page.results[0].doc_id, "D-0003");
}

#[test]
fn test_free_text_search_over_persisted_index() {
    let dir = tempdir().unwrap();
    let corpus = dir.path().join("corpus");
    fs::create_dir(&corpus).unwrap();
    seed_corpus(&corpus);

    let dest = dir.path().join("index");
    build_and_save(&corpus, &dest).unwrap();
    let index = load_index(&dest).unwrap();

    let inputs = QueryInputs {
        free_text: Some("manifest".to_string()),
        ..QueryInputs::default()
    };
    let page = search(&index, &inputs, 1, 20).unwrap();
    assert_eq!(page.total_count, 1);
    assert_eq!(page.results[0].doc_id, "D-0004");
}

#[test]
fn test_pagination_against_larger_corpus() {
    let dir = tempdir().unwrap();
    let corpus = dir.path().join("corpus");
    fs::create_dir(&corpus).unwrap();
    for i in 0..45 {
        write_record(
            &corpus,
            &format!("{i:04}.json"),
            &format!(r#"{{"doc_id": "D-{i:04}", "document_type": "Letter"}}"#),
        );
    }

    let dest = dir.path().join("index");
    build_and_save(&corpus, &dest).unwrap();
    let index = load_index(&dest).unwrap();

    let pages: Vec<_> = (1..=4)
        .map(|p| search(&index, &QueryInputs::default(), p, 20).unwrap())
        .collect();
    assert_eq!(pages[0].results.len(), 20);
    assert_eq!(pages[1].results.len(), 20);
    assert_eq!(pages[2].results.len(), 5);
    assert_eq!(pages[3].results.len(), 0);
    assert_eq!(pages[0].total_pages, 3);
    assert_eq!(pages[0].total_count, 45);

    // Order-preserving and non-overlapping across page boundaries.
    assert_eq!(pages[0].results[19].doc_id, "D-0019");
    assert_eq!(pages[1].results[0].doc_id, "D-0020");
}

#[test]
fn test_latin1_record_is_indexed() {
    let dir = tempdir().unwrap();
    let corpus = dir.path().join("corpus");
    fs::create_dir(&corpus).unwrap();

    let mut raw = Vec::new();
    raw.extend_from_slice(br#"{"doc_id": "D-L1", "countries": ["Per"#);
    raw.push(0xFA); // ú in Latin-1
    raw.extend_from_slice(br#""]}"#);
    fs::write(corpus.join("latin1.json"), &raw).unwrap();

    let dest = dir.path().join("index");
    let stats = build_and_save(&corpus, &dest).unwrap();
    assert_eq!(stats.indexed, 1);

    let index = load_index(&dest).unwrap();
    let mut inputs = QueryInputs::default();
    inputs
        .field_filters
        .insert("countries".to_string(), "Peru".to_string());
    let page = search(&index, &inputs, 1, 20).unwrap();
    assert_eq!(page.total_count, 1);
}

#[test]
fn test_corrupted_index_file_fails_search_load() {
    let dir = tempdir().unwrap();
    let corpus = dir.path().join("corpus");
    fs::create_dir(&corpus).unwrap();
    seed_corpus(&corpus);

    let dest = dir.path().join("index");
    build_and_save(&corpus, &dest).unwrap();

    // Flip a byte in the middle of the persisted file.
    let path = dest.join(INDEX_FILE_NAME);
    let mut bytes = fs::read(&path).unwrap();
    let mid = bytes.len() / 2;
    bytes[mid] ^= 0xFF;
    fs::write(&path, &bytes).unwrap();

    let err = load_index(&dest).unwrap_err();
    assert!(matches!(err, AfindexError::Search(_)));
}

#[test]
fn test_rebuild_replaces_index_atomically() {
    let dir = tempdir().unwrap();
    let corpus = dir.path().join("corpus");
    fs::create_dir(&corpus).unwrap();
    seed_corpus(&corpus);

    let dest = dir.path().join("index");
    build_and_save(&corpus, &dest).unwrap();
    assert_eq!(load_index(&dest).unwrap().num_docs(), 4);

    write_record(
        &corpus,
        "0006.json",
        r#"{"doc_id": "D-0006", "document_type": "Letter"}"#,
    );
    build_and_save(&corpus, &dest).unwrap();
    assert_eq!(load_index(&dest).unwrap().num_docs(), 5);
}
