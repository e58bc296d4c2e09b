//! ComicTrack database
//!
//! This crate owns the on-disk state of the comic tracker: the comic and
//! chapter catalog, and the per-chapter view counters. Everything lives in a
//! single SQLite database file inside a backend directory, opened through
//! [`ComicsBackend::open`].
//!
//! Opening the backend runs any pending schema migrations first; the schema
//! itself is defined entirely by the revision chain in
//! [`migration::revisions`]. See the [`migration`] module for how revisions
//! are versioned, locked and applied.
//!
//! The access layer is split per concern, each file contributing an impl
//! block on [`ComicsBackend`]:
//!
//! - `comic_db.rs`: the comic catalog,
//! - `chapter_db.rs`: chapters within a comic,
//! - `chapter_view_db.rs`: per-chapter view counters, written by the
//!   view-tracking path of the web service.
//!
//! rusqlite connections are not `Sync`, so the backend serializes access
//! through a mutex. The tracker's write load is a single web service; one
//! writer at a time is enough.

mod chapter_db;
mod chapter_view_db;
mod comic_db;
mod error;
mod sqlite_options;

pub mod migration;

#[cfg(test)]
mod tests;

pub use chapter_db::Chapter;
pub use chapter_view_db::ChapterView;
pub use comic_db::Comic;
pub use error::ComicsStorageError;
pub use sqlite_options::SqliteConfig;

use crate::migration::MigrationRunner;
use anyhow::Context;
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// Name of the SQLite database file inside the backend directory.
pub(crate) const DB_FILE_NAME: &str = "comics.sqlite";

/// Schema version required by this binary. Bumped together with every new
/// revision registered in [`migration::revisions`].
pub const DB_VERSION: u32 = 3;

/// Minimum schema version this binary can still migrate from.
pub const DB_BASE_VERSION: u32 = 0;

/// ComicTrack database backend singleton.
#[derive(Debug)]
pub struct ComicsBackend {
    db: Mutex<Connection>,
    config: ComicsBackendConfig,

    /// Keep the TempDir instance around so that the directory is not deleted
    /// until the ComicsBackend struct is dropped.
    #[cfg(any(test, feature = "testing"))]
    _temp_dir: Option<tempfile::TempDir>,
}

#[derive(Debug, Clone, Default)]
pub struct ComicsBackendConfig {
    pub sqlite: SqliteConfig,
}

impl ComicsBackend {
    /// Open (or create) the backend directory and run pending schema
    /// migrations.
    ///
    /// Migrations are applied before the backend is handed out, so a
    /// successfully opened backend is always at [`DB_VERSION`].
    pub fn open(base_path: &Path, config: ComicsBackendConfig) -> anyhow::Result<Self> {
        std::fs::create_dir_all(base_path)
            .with_context(|| format!("Creating backend directory {}", base_path.display()))?;

        let mut conn = Connection::open(base_path.join(DB_FILE_NAME)).context("Opening database")?;
        sqlite_options::apply_connection_pragmas(&conn, &config.sqlite)?;

        let runner = MigrationRunner::new(base_path, DB_VERSION, DB_BASE_VERSION);
        runner.run_migrations(&mut conn).context("Running schema migrations")?;

        Ok(Self {
            db: Mutex::new(conn),
            config,
            #[cfg(any(test, feature = "testing"))]
            _temp_dir: None,
        })
    }

    /// Open a backend over a temporary directory that lives as long as the
    /// returned instance.
    #[cfg(any(test, feature = "testing"))]
    pub fn open_for_testing() -> Self {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let mut backend = Self::open(temp_dir.path(), ComicsBackendConfig::default()).unwrap();
        backend._temp_dir = Some(temp_dir);
        backend
    }

    pub fn config(&self) -> &ComicsBackendConfig {
        &self.config
    }

    pub(crate) fn db(&self) -> MutexGuard<'_, Connection> {
        self.db.lock().expect("Poisoned lock")
    }
}

/// Rowid of a row in the `comics` table.
pub type ComicId = i64;

/// Rowid of a row in the `chapters` table.
pub type ChapterId = i64;
