//! Migration to v1: comic catalog tables.
//!
//! Creates `comics` and `chapters`. Timestamp columns hold RFC 3339 UTC text
//! and are maintained by the access layer, not by SQLite.

use crate::migration::{MigrationContext, MigrationError};

pub fn migrate(ctx: &MigrationContext<'_>) -> Result<(), MigrationError> {
    ctx.tx().execute_batch(
        r#"
        CREATE TABLE comics (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            created_date TEXT NOT NULL,
            updated_date TEXT NOT NULL,
            title TEXT NOT NULL,
            slug TEXT NOT NULL UNIQUE,
            description TEXT NOT NULL DEFAULT ''
        );

        CREATE TABLE chapters (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            created_date TEXT NOT NULL,
            updated_date TEXT NOT NULL,
            name TEXT NOT NULL,
            chapter_number INTEGER NOT NULL,
            comic_id INTEGER NOT NULL REFERENCES comics (id) ON DELETE CASCADE
        );

        CREATE INDEX idx_chapters_comic ON chapters (comic_id);
        "#,
    )?;
    Ok(())
}
