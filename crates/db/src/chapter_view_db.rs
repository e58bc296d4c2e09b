use crate::{ChapterId, ComicsBackend, ComicsStorageError};
use chrono::{DateTime, Utc};
use rusqlite::{OptionalExtension, Row};

/// View counter for a single chapter.
///
/// At most one counter row exists per chapter, created lazily on the first
/// recorded view. `created_date` is set when the row first appears and never
/// changes afterwards; `updated_date` moves on every recorded view.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ChapterView {
    pub id: i64,
    pub created_date: DateTime<Utc>,
    pub updated_date: DateTime<Utc>,
    pub views: u64,
    pub chapter_id: Option<ChapterId>,
}

fn chapter_view_from_row(row: &Row<'_>) -> rusqlite::Result<ChapterView> {
    Ok(ChapterView {
        id: row.get(0)?,
        created_date: row.get(1)?,
        updated_date: row.get(2)?,
        views: row.get(3)?,
        chapter_id: row.get(4)?,
    })
}

/// Per-chapter view counters, written by the view-tracking path of the web
/// service.
impl ComicsBackend {
    /// Record one view of a chapter, returning the new total.
    ///
    /// The first view inserts the counter row; later views only bump the
    /// count and refresh `updated_date`. The chapter must exist.
    pub fn record_chapter_view(&self, chapter_id: ChapterId) -> Result<u64, ComicsStorageError> {
        let db = self.db();
        let now = Utc::now();
        let views: i64 = db.query_row(
            "INSERT INTO chapter_views (created_date, updated_date, views, chapter_id) \
             VALUES (?1, ?1, 1, ?2) \
             ON CONFLICT (chapter_id) DO UPDATE \
             SET views = views + 1, updated_date = excluded.updated_date \
             RETURNING views",
            rusqlite::params![now, chapter_id],
            |row| row.get(0),
        )?;
        u64::try_from(views)
            .map_err(|_| ComicsStorageError::InconsistentStorage("Negative view count".into()))
    }

    /// The counter row for a chapter, if any views were recorded yet.
    pub fn chapter_view(&self, chapter_id: ChapterId) -> Result<Option<ChapterView>, ComicsStorageError> {
        let db = self.db();
        let view = db
            .query_row(
                "SELECT id, created_date, updated_date, views, chapter_id \
                 FROM chapter_views WHERE chapter_id = ?1",
                [chapter_id],
                chapter_view_from_row,
            )
            .optional()?;
        Ok(view)
    }

    /// Total recorded views for a chapter. Chapters without a counter row
    /// report zero.
    pub fn chapter_view_count(&self, chapter_id: ChapterId) -> Result<u64, ComicsStorageError> {
        Ok(self.chapter_view(chapter_id)?.map(|view| view.views).unwrap_or(0))
    }
}
