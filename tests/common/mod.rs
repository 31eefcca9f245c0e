//! Shared test utilities and fixtures.

#![allow(dead_code)]

use std::fs;
use std::path::Path;

/// Write one record file into a corpus directory.
pub fn write_record(dir: &Path, name: &str, json: &str) {
    fs::write(dir.join(name), json).expect("write record file");
}

/// A small realistic corpus: four scanned-document records.
pub fn seed_corpus(dir: &Path) {
    write_record(
        dir,
        "0001.json",
        r#"{
            "document_type": "Certificate of Naturalization",
            "is_cert_naturalization": true,
            "countries": ["Poland"],
            "years": [1923, 1951],
            "doc_id": "D-0001",
            "afile_number": "A1234567",
            "dev_idx": 1,
            "pagenumber": 1,
            "url": "https://archive.example/D-0001",
            "ocr_path": "ocr/0001.txt"
        }"#,
    );
    write_record(
        dir,
        "0002.json",
        r#"{
            "document_type": "Form G-325A Biographic Information",
            "is_g325a": true,
            "countries": ["Germany", "United Kingdom"],
            "years": [1960],
            "doc_id": "D-0002",
            "afile_number": "A7654321",
            "url": "https://archive.example/D-0002"
        }"#,
    );
    write_record(
        dir,
        "0003.json",
        r#"{
            "document_type": "Visa Application",
            "countries": ["Poland", "Germany"],
            "years": [1950, 1952],
            "doc_id": "D-0003",
            "afile_number": "A1234567",
            "is_afile_redacted": true,
            "url": "https://archive.example/D-0003"
        }"#,
    );
    write_record(
        dir,
        "0004.json",
        r#"{
            "document_type": "Ship Manifest",
            "countries": ["Italy"],
            "years": [1907],
            "doc_id": "D-0004",
            "afile_number": "A0000001",
            "is_afile_withdrawn": true,
            "url": "https://archive.example/D-0004"
        }"#,
    );
}
