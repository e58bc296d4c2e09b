use super::common::*;
use crate::{ComicsBackend, ComicsBackendConfig};

#[test]
fn test_open_db() {
    temp_backend();
}

#[test]
fn test_reopen_existing_db() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    {
        let backend = ComicsBackend::open(temp_dir.path(), ComicsBackendConfig::default()).unwrap();
        backend.add_comic("Tower of Ink", "tower-of-ink", "").unwrap();
    }

    // Second open finds the schema up to date and the data still there
    let backend = ComicsBackend::open(temp_dir.path(), ComicsBackendConfig::default()).unwrap();
    assert!(backend.comic_by_slug("tower-of-ink").unwrap().is_some());
}

#[test]
fn test_foreign_keys_enforced_on_open() {
    let backend = temp_backend();
    // No chapter 9999 exists, the counter insert must be rejected
    assert!(backend.record_chapter_view(9999).is_err());
}
