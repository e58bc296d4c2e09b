//! Migration from v2 to v3: view tracking moves from comics to chapters.
//!
//! Creates `chapter_views`, one counter row per chapter, unique on its
//! chapter and cascade-deleted with it. The superseded `comic_views` table is
//! dropped, data included; counter rows are not carried over, so chapter
//! counts start from zero.

use crate::migration::{MigrationContext, MigrationError};

pub fn migrate(ctx: &MigrationContext<'_>) -> Result<(), MigrationError> {
    ctx.tx().execute_batch(
        r#"
        CREATE TABLE chapter_views (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            created_date TEXT NOT NULL,
            updated_date TEXT NOT NULL,
            views INTEGER NOT NULL DEFAULT 0,
            chapter_id INTEGER UNIQUE REFERENCES chapters (id) ON DELETE CASCADE
        );

        DROP TABLE comic_views;
        "#,
    )?;
    Ok(())
}
