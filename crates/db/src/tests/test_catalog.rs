use super::common::*;
use crate::ComicsStorageError;

#[test]
fn test_add_and_fetch_comic() {
    let backend = temp_backend();
    let comic = backend.add_comic("Tower of Ink", "tower-of-ink", "Climbing, mostly").unwrap();

    let fetched = backend.comic_by_slug("tower-of-ink").unwrap().unwrap();
    assert_eq!(fetched, comic);
    assert!(backend.comic_by_slug("no-such-comic").unwrap().is_none());
}

#[test]
fn test_duplicate_slug_is_rejected() {
    let backend = temp_backend();
    backend.add_comic("Tower of Ink", "tower-of-ink", "").unwrap();

    let err = backend.add_comic("Tower of Ink, Again", "tower-of-ink", "").unwrap_err();
    assert!(matches!(err, ComicsStorageError::Sqlite(_)));
}

#[test]
fn test_update_refreshes_updated_date_only() {
    let backend = temp_backend();
    let comic = backend.add_comic("Tower of Ink", "tower-of-ink", "").unwrap();

    std::thread::sleep(std::time::Duration::from_millis(5));
    backend.set_comic_description(comic.id, "Climbing, mostly").unwrap();

    let updated = backend.comic_by_slug("tower-of-ink").unwrap().unwrap();
    assert_eq!(updated.description, "Climbing, mostly");
    assert_eq!(updated.created_date, comic.created_date);
    assert!(updated.updated_date > comic.updated_date);
}

#[test]
fn test_chapters_ordered_by_number() {
    let (backend, comic, _) = seeded_backend();
    backend.add_chapter(comic.id, 7, "The Seventh Floor").unwrap();

    let chapters = backend.chapters_of_comic(comic.id).unwrap();
    let numbers: Vec<u32> = chapters.iter().map(|c| c.chapter_number).collect();
    assert_eq!(numbers, vec![1, 2, 7]);
}

#[test]
fn test_duplicate_chapter_number_is_rejected() {
    let (backend, comic, _) = seeded_backend();
    let err = backend.add_chapter(comic.id, 1, "Prologue, Again").unwrap_err();
    assert!(matches!(err, ComicsStorageError::Sqlite(_)));
}

#[test]
fn test_removing_comic_cascades_to_chapters() {
    let (backend, comic, chapters) = seeded_backend();

    assert!(backend.remove_comic(comic.id).unwrap());
    assert!(backend.chapter(chapters[0].id).unwrap().is_none());
    assert!(backend.chapters_of_comic(comic.id).unwrap().is_empty());

    // Removing again reports nothing deleted
    assert!(!backend.remove_comic(comic.id).unwrap());
}
