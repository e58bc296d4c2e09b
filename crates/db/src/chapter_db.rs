use crate::{ChapterId, ComicId, ComicsBackend, ComicsStorageError};
use chrono::{DateTime, Utc};
use rusqlite::{OptionalExtension, Row};

/// A chapter of a comic. `chapter_number` is unique within its comic.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Chapter {
    pub id: ChapterId,
    pub created_date: DateTime<Utc>,
    pub updated_date: DateTime<Utc>,
    pub name: String,
    pub chapter_number: u32,
    pub comic_id: ComicId,
}

fn chapter_from_row(row: &Row<'_>) -> rusqlite::Result<Chapter> {
    Ok(Chapter {
        id: row.get(0)?,
        created_date: row.get(1)?,
        updated_date: row.get(2)?,
        name: row.get(3)?,
        chapter_number: row.get(4)?,
        comic_id: row.get(5)?,
    })
}

/// Chapter operations.
impl ComicsBackend {
    pub fn add_chapter(
        &self,
        comic_id: ComicId,
        chapter_number: u32,
        name: &str,
    ) -> Result<Chapter, ComicsStorageError> {
        let db = self.db();
        let now = Utc::now();
        let id = db.query_row(
            "INSERT INTO chapters (created_date, updated_date, name, chapter_number, comic_id) \
             VALUES (?1, ?1, ?2, ?3, ?4) RETURNING id",
            rusqlite::params![now, name, chapter_number, comic_id],
            |row| row.get(0),
        )?;
        Ok(Chapter {
            id,
            created_date: now,
            updated_date: now,
            name: name.to_string(),
            chapter_number,
            comic_id,
        })
    }

    pub fn chapter(&self, chapter_id: ChapterId) -> Result<Option<Chapter>, ComicsStorageError> {
        let db = self.db();
        let chapter = db
            .query_row(
                "SELECT id, created_date, updated_date, name, chapter_number, comic_id \
                 FROM chapters WHERE id = ?1",
                [chapter_id],
                chapter_from_row,
            )
            .optional()?;
        Ok(chapter)
    }

    /// All chapters of a comic, ordered by chapter number.
    pub fn chapters_of_comic(&self, comic_id: ComicId) -> Result<Vec<Chapter>, ComicsStorageError> {
        let db = self.db();
        let mut stmt = db.prepare(
            "SELECT id, created_date, updated_date, name, chapter_number, comic_id \
             FROM chapters WHERE comic_id = ?1 ORDER BY chapter_number",
        )?;
        let chapters = stmt.query_map([comic_id], chapter_from_row)?.collect::<Result<Vec<_>, _>>()?;
        Ok(chapters)
    }

    /// Delete a chapter. Its view counter, if any, goes with it.
    ///
    /// Returns whether a row was actually deleted.
    pub fn remove_chapter(&self, chapter_id: ChapterId) -> Result<bool, ComicsStorageError> {
        let db = self.db();
        let deleted = db.execute("DELETE FROM chapters WHERE id = ?1", [chapter_id])?;
        Ok(deleted > 0)
    }
}
