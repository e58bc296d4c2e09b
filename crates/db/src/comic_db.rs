use crate::{ComicId, ComicsBackend, ComicsStorageError};
use chrono::{DateTime, Utc};
use rusqlite::{OptionalExtension, Row};

/// A comic series in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Comic {
    pub id: ComicId,
    pub created_date: DateTime<Utc>,
    pub updated_date: DateTime<Utc>,
    pub title: String,
    pub slug: String,
    pub description: String,
}

fn comic_from_row(row: &Row<'_>) -> rusqlite::Result<Comic> {
    Ok(Comic {
        id: row.get(0)?,
        created_date: row.get(1)?,
        updated_date: row.get(2)?,
        title: row.get(3)?,
        slug: row.get(4)?,
        description: row.get(5)?,
    })
}

/// Comic catalog operations.
impl ComicsBackend {
    /// Insert a new comic. The slug must be unique across the catalog.
    pub fn add_comic(&self, title: &str, slug: &str, description: &str) -> Result<Comic, ComicsStorageError> {
        let db = self.db();
        let now = Utc::now();
        let id = db.query_row(
            "INSERT INTO comics (created_date, updated_date, title, slug, description) \
             VALUES (?1, ?1, ?2, ?3, ?4) RETURNING id",
            rusqlite::params![now, title, slug, description],
            |row| row.get(0),
        )?;
        Ok(Comic {
            id,
            created_date: now,
            updated_date: now,
            title: title.to_string(),
            slug: slug.to_string(),
            description: description.to_string(),
        })
    }

    pub fn comic_by_slug(&self, slug: &str) -> Result<Option<Comic>, ComicsStorageError> {
        let db = self.db();
        let comic = db
            .query_row(
                "SELECT id, created_date, updated_date, title, slug, description FROM comics WHERE slug = ?1",
                [slug],
                comic_from_row,
            )
            .optional()?;
        Ok(comic)
    }

    /// Update a comic's description, refreshing its `updated_date`.
    pub fn set_comic_description(&self, comic_id: ComicId, description: &str) -> Result<(), ComicsStorageError> {
        let db = self.db();
        db.execute(
            "UPDATE comics SET description = ?1, updated_date = ?2 WHERE id = ?3",
            rusqlite::params![description, Utc::now(), comic_id],
        )?;
        Ok(())
    }

    /// Delete a comic. Its chapters, and their view counters, go with it.
    ///
    /// Returns whether a row was actually deleted.
    pub fn remove_comic(&self, comic_id: ComicId) -> Result<bool, ComicsStorageError> {
        let db = self.db();
        let deleted = db.execute("DELETE FROM comics WHERE id = ?1", [comic_id])?;
        Ok(deleted > 0)
    }
}
