//! Integration tests for storage sinks.

use std::fs;
use std::sync::Arc;
use std::thread;

use pdfscene::storage::validate_relative_path;
use pdfscene::{DiscardStorage, Error, LocalStorage, Page, StorageSink};

#[test]
fn test_local_storage_creates_root_on_first_write() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("nested").join("output");
    let storage = LocalStorage::new(&root);
    assert!(!root.exists());

    storage
        .put_bytes(b"\x89PNG", "images/abc.png", "image/png")
        .unwrap();

    assert_eq!(fs::read(root.join("images/abc.png")).unwrap(), b"\x89PNG");
}

#[test]
fn test_put_json_serializes_pages() {
    let dir = tempfile::tempdir().unwrap();
    let storage = LocalStorage::new(dir.path());

    let pages = vec![Page::letter(1), Page::letter(2)];
    let reference = storage.put_json("doc.json", &pages).unwrap();
    assert!(reference.ends_with("doc.json"));

    let written: Vec<Page> =
        serde_json::from_slice(&fs::read(dir.path().join("doc.json")).unwrap()).unwrap();
    assert_eq!(written, pages);
}

#[test]
fn test_escaping_paths_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let storage = LocalStorage::new(dir.path().join("root"));

    for path in ["../outside.json", "fonts/../../outside.ttf", "/tmp/abs.json", ""] {
        let err = storage.put_bytes(b"x", path, "text/plain").unwrap_err();
        assert!(matches!(err, Error::InvalidPath(_)), "{path}: {err}");
        assert!(DiscardStorage.put_bytes(b"x", path, "text/plain").is_err());
    }
    assert!(!dir.path().join("outside.json").exists());
    assert!(!dir.path().join("outside.ttf").exists());
}

#[test]
fn test_inner_parent_components_stay_inside_root() {
    // `a/../b` never leaves the root but is still refused.
    assert!(validate_relative_path("a/../b.json").is_err());
    assert!(validate_relative_path("a/./b.json").is_ok());
}

#[test]
fn test_concurrent_writes_to_same_path() {
    let dir = tempfile::tempdir().unwrap();
    let storage = Arc::new(LocalStorage::new(dir.path()));

    let handles: Vec<_> = (0..8u8)
        .map(|i| {
            let storage = Arc::clone(&storage);
            thread::spawn(move || {
                storage
                    .put_bytes(&[i; 64], "images/shared.png", "image/png")
                    .unwrap()
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    // Whichever write landed last, the file is one complete payload.
    let data = fs::read(dir.path().join("images/shared.png")).unwrap();
    assert_eq!(data.len(), 64);
    assert!(data.iter().all(|b| *b == data[0]));
    assert_eq!(fs::read_dir(dir.path().join("images")).unwrap().count(), 1);
}

#[test]
fn test_discard_storage_returns_relative_path() {
    let reference = DiscardStorage.put_json("report.json", &vec![1, 2, 3]).unwrap();
    assert_eq!(reference, "report.json");
}
