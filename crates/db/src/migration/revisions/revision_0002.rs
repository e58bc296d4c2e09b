//! Migration from v1 to v2: comic-level view counters, unique chapter
//! numbering.

use crate::migration::{MigrationContext, MigrationError};

pub fn migrate(ctx: &MigrationContext<'_>) -> Result<(), MigrationError> {
    ctx.tx().execute_batch(
        r#"
        CREATE TABLE comic_views (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            created_date TEXT NOT NULL,
            updated_date TEXT NOT NULL,
            views INTEGER NOT NULL DEFAULT 0,
            comic_id INTEGER UNIQUE REFERENCES comics (id) ON DELETE CASCADE
        );

        CREATE UNIQUE INDEX idx_chapters_comic_number ON chapters (comic_id, chapter_number);
        "#,
    )?;
    Ok(())
}
