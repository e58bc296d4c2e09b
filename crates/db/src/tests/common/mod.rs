use crate::{Chapter, Comic, ComicsBackend};

pub fn temp_backend() -> ComicsBackend {
    ComicsBackend::open_for_testing()
}

/// Backend pre-populated with one comic and two chapters.
pub fn seeded_backend() -> (ComicsBackend, Comic, Vec<Chapter>) {
    let backend = temp_backend();
    let comic = backend.add_comic("Tower of Ink", "tower-of-ink", "Climbing, mostly").unwrap();
    let chapters = vec![
        backend.add_chapter(comic.id, 1, "Prologue").unwrap(),
        backend.add_chapter(comic.id, 2, "The First Floor").unwrap(),
    ];
    (backend, comic, chapters)
}
