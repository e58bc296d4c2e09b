//! Database migration system for the ComicTrack backend.
//!
//! This module upgrades the database schema between versions. It handles:
//!
//! - Version detection and comparison
//! - Sequential, transactional revision execution
//! - Pre-migration backups
//! - A lock file to keep concurrent migration runs out
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      MigrationRunner                            │
//! │  - Checks current vs required schema version                    │
//! │  - Determines which revisions to run                            │
//! │  - Executes revisions sequentially, one transaction each        │
//! └─────────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      Revision registry                          │
//! │  - Maps version numbers to revision functions                   │
//! │  - Validates the revision chain                                 │
//! └─────────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      Individual revisions                       │
//! │  - revision_0001.rs: v0 -> v1 (catalog tables)                  │
//! │  - revision_0002.rs: v1 -> v2 (comic view counters)             │
//! │  - revision_0003.rs: v2 -> v3 (chapter view counters)           │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The current schema version lives in SQLite's `user_version` pragma. Each
//! revision's DDL and its version bump commit in the same transaction, so an
//! interrupted run leaves the database at the last completed revision and
//! the next open simply continues from there.
//!
//! # Usage
//!
//! The migration system is automatically invoked when opening the backend:
//!
//! ```ignore
//! let backend = ComicsBackend::open(path, config)?;
//! // Migrations run automatically if needed
//! ```
//!
//! # Files
//!
//! Besides the database file, the migration system uses in the backend
//! directory:
//!
//! - `.db-migration.lock`: lock file to prevent concurrent migrations
//! - `backup_pre_migration/`: copy of the database taken before migrating
//!
//! # Adding a new revision
//!
//! See the documentation in [`revisions`].

mod context;
mod error;
mod registry;
pub mod revisions;

pub use context::MigrationContext;
pub use error::MigrationError;
pub use registry::{migrations, migrations_for_range, validate_chain, Migration, MigrationFn};

use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// File name for the migration lock.
const DB_MIGRATION_LOCK: &str = ".db-migration.lock";

/// Directory name for the pre-migration backup.
const BACKUP_DIR_NAME: &str = "backup_pre_migration";

/// Result of checking migration status.
#[derive(Debug)]
pub enum MigrationStatus {
    /// Empty database - the full revision chain will be applied.
    FreshDatabase,

    /// Database is already at the required version.
    NoMigrationNeeded,

    /// Revisions need to be applied.
    MigrationRequired {
        /// Current database version
        current_version: u32,
        /// Target version
        target_version: u32,
        /// Number of revisions to apply
        migration_count: usize,
    },

    /// Database version is older than the minimum supported.
    DatabaseTooOld {
        /// Current database version
        current_version: u32,
        /// Minimum supported version
        base_version: u32,
    },

    /// Database version is newer than the binary supports.
    DatabaseNewer {
        /// Database version
        db_version: u32,
        /// Binary's expected version
        binary_version: u32,
    },
}

/// Main migration orchestrator.
///
/// Checks migration status and executes pending revisions against an open
/// connection.
pub struct MigrationRunner {
    /// Base path to the backend directory
    base_path: PathBuf,
    /// Version required by the binary
    required_version: u32,
    /// Minimum version that can be migrated from
    base_version: u32,
    /// Flag for graceful abort
    abort_flag: Arc<AtomicBool>,
}

impl MigrationRunner {
    /// Create a new migration runner.
    ///
    /// # Arguments
    ///
    /// * `base_path` - Path to the backend directory
    /// * `required_version` - Version required by the binary
    /// * `base_version` - Minimum version that can be migrated from
    pub fn new(base_path: &Path, required_version: u32, base_version: u32) -> Self {
        Self {
            base_path: base_path.to_path_buf(),
            required_version,
            base_version,
            abort_flag: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Set the abort flag to signal the migration should stop.
    pub fn abort(&self) {
        self.abort_flag.store(true, Ordering::Relaxed);
    }

    /// Check migration status without running anything.
    pub fn check_status(&self, conn: &Connection) -> Result<MigrationStatus, MigrationError> {
        let current_version = schema_version(conn)?;

        // Fresh database: nothing in it yet, not even a schema
        if current_version == 0 && is_empty_schema(conn)? {
            return Ok(MigrationStatus::FreshDatabase);
        }

        // Already at target version
        if current_version == self.required_version {
            return Ok(MigrationStatus::NoMigrationNeeded);
        }

        // Database is newer than binary
        if current_version > self.required_version {
            return Ok(MigrationStatus::DatabaseNewer {
                db_version: current_version,
                binary_version: self.required_version,
            });
        }

        // Database is too old
        if current_version < self.base_version {
            return Ok(MigrationStatus::DatabaseTooOld { current_version, base_version: self.base_version });
        }

        // Check if a migration path exists
        let migrations = migrations_for_range(current_version, self.required_version)?;

        Ok(MigrationStatus::MigrationRequired {
            current_version,
            target_version: self.required_version,
            migration_count: migrations.len(),
        })
    }

    /// Run migrations if needed.
    ///
    /// This is the main entry point for the migration system. It will:
    /// 1. Check if revisions need to be applied
    /// 2. Create a backup (unless the database is fresh)
    /// 3. Run revisions sequentially, each in its own transaction
    /// 4. Bump the `user_version` pragma inside each revision's transaction
    ///
    /// Returns Ok(()) if no migrations were needed or all revisions completed
    /// successfully.
    pub fn run_migrations(&self, conn: &mut Connection) -> Result<(), MigrationError> {
        debug_assert!(validate_chain().is_ok());

        match self.check_status(conn)? {
            MigrationStatus::FreshDatabase => {
                tracing::info!("📦 Fresh database, initializing schema at version {}", self.required_version);
                self.execute_migrations(conn, 0, self.required_version, false)
            }
            MigrationStatus::NoMigrationNeeded => {
                tracing::debug!("✅ Database version {} matches binary, no migration needed", self.required_version);
                Ok(())
            }
            MigrationStatus::DatabaseNewer { db_version, binary_version } => {
                Err(MigrationError::DatabaseNewerThanBinary { db_version, binary_version })
            }
            MigrationStatus::DatabaseTooOld { current_version, base_version } => {
                Err(MigrationError::DatabaseTooOld { current_version, base_version })
            }
            MigrationStatus::MigrationRequired { current_version, target_version, .. } => {
                self.execute_migrations(conn, current_version, target_version, true)
            }
        }
    }

    /// Execute the actual revisions.
    fn execute_migrations(
        &self,
        conn: &mut Connection,
        from_version: u32,
        to_version: u32,
        with_backup: bool,
    ) -> Result<(), MigrationError> {
        // Acquire the migration lock
        let _lock = self.acquire_lock()?;

        let migrations = migrations_for_range(from_version, to_version)?;

        tracing::info!(
            "🔄 Starting database migration from v{} to v{} ({} revision(s))",
            from_version,
            to_version,
            migrations.len()
        );

        if with_backup {
            tracing::info!("📸 Creating pre-migration backup...");
            self.create_backup(conn)?;
        }

        for migration in migrations {
            if self.abort_flag.load(Ordering::Relaxed) {
                tracing::warn!("⚠️  Migration aborted by user");
                return Err(MigrationError::Aborted);
            }

            tracing::info!(
                "📦 Running migration '{}' (v{} -> v{})",
                migration.name,
                migration.from_version,
                migration.to_version
            );

            let start_time = std::time::Instant::now();

            let tx = conn.transaction()?;
            let context = MigrationContext::new(&tx, self.abort_flag.clone());

            match (migration.migrate)(&context) {
                Ok(()) => {
                    // The version bump commits atomically with the revision's DDL
                    tx.pragma_update(None, "user_version", migration.to_version)?;
                    tx.commit()?;

                    let elapsed = start_time.elapsed();
                    tracing::info!("✅ Migration '{}' completed in {:.2}s", migration.name, elapsed.as_secs_f64());
                }
                Err(e) => {
                    drop(tx); // rolls back
                    tracing::error!("❌ Migration '{}' failed: {}", migration.name, e);
                    tracing::error!("Database left at v{}.", migration.from_version);
                    if with_backup {
                        tracing::error!(
                            "A pre-migration copy of the database is available at: {:?}",
                            self.backup_path()
                        );
                    }
                    return Err(MigrationError::MigrationStepFailed {
                        name: migration.name.to_string(),
                        from_version: migration.from_version,
                        to_version: migration.to_version,
                        message: e.to_string(),
                    });
                }
            }
        }

        tracing::info!("🎉 Database migration completed successfully! Now at version {}", to_version);

        Ok(())
    }

    /// Acquire the migration lock.
    fn acquire_lock(&self) -> Result<MigrationLock, MigrationError> {
        let lock_path = self.base_path.join(DB_MIGRATION_LOCK);

        if lock_path.exists() {
            // Check if the lock is stale (older than 24 hours)
            if let Ok(metadata) = fs::metadata(&lock_path) {
                if let Ok(modified) = metadata.modified() {
                    let age = modified.elapsed().unwrap_or_default();
                    if age > std::time::Duration::from_secs(24 * 60 * 60) {
                        tracing::warn!("Found stale migration lock ({}h old), removing...", age.as_secs() / 3600);
                        fs::remove_file(&lock_path)?;
                    } else {
                        return Err(MigrationError::MigrationInProgress);
                    }
                }
            }
        }

        fs::write(&lock_path, format!("pid:{}\ntime:{}", std::process::id(), chrono::Utc::now().to_rfc3339()))?;
        Ok(MigrationLock { path: lock_path })
    }

    /// Create a backup of the database file before migrating.
    fn create_backup(&self, conn: &Connection) -> Result<(), MigrationError> {
        let backup_dir = self.base_path.join(BACKUP_DIR_NAME);

        // Remove the old backup if one exists
        if backup_dir.exists() {
            tracing::debug!("Removing old backup at {:?}", backup_dir);
            fs::remove_dir_all(&backup_dir)?;
        }
        fs::create_dir_all(&backup_dir)?;

        // Use SQLite's online backup API for a consistent copy
        let mut dst = Connection::open(backup_dir.join(crate::DB_FILE_NAME))
            .map_err(|e| MigrationError::BackupFailed(e.to_string()))?;
        let backup = rusqlite::backup::Backup::new(conn, &mut dst)
            .map_err(|e| MigrationError::BackupFailed(e.to_string()))?;
        backup
            .run_to_completion(512, std::time::Duration::ZERO, None)
            .map_err(|e| MigrationError::BackupFailed(e.to_string()))?;

        tracing::info!("✅ Backup created at {:?}", backup_dir);
        Ok(())
    }

    /// Get the path to the backup directory.
    pub fn backup_path(&self) -> PathBuf {
        self.base_path.join(BACKUP_DIR_NAME)
    }
}

/// Read the schema version from the `user_version` pragma.
pub(crate) fn schema_version(conn: &Connection) -> Result<u32, MigrationError> {
    let version: i64 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    u32::try_from(version).map_err(|_| MigrationError::InvalidSchemaVersion(version))
}

/// A database with no schema objects at all is considered fresh.
fn is_empty_schema(conn: &Connection) -> Result<bool, MigrationError> {
    let objects: i64 = conn.query_row("SELECT count(*) FROM sqlite_master", [], |row| row.get(0))?;
    Ok(objects == 0)
}

/// RAII lock guard for migration.
struct MigrationLock {
    path: PathBuf,
}

impl Drop for MigrationLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_test_db(version: Option<u32>) -> (TempDir, Connection) {
        let temp_dir = TempDir::new().unwrap();
        let conn = Connection::open(temp_dir.path().join(crate::DB_FILE_NAME)).unwrap();

        if let Some(v) = version {
            // A schema object so the database does not read as fresh
            conn.execute_batch("CREATE TABLE marker (id INTEGER PRIMARY KEY)").unwrap();
            conn.pragma_update(None, "user_version", v).unwrap();
        }

        (temp_dir, conn)
    }

    #[test]
    fn test_fresh_database_status() {
        let (temp_dir, conn) = setup_test_db(None);
        let runner = MigrationRunner::new(temp_dir.path(), 3, 0);

        let status = runner.check_status(&conn).unwrap();
        assert!(matches!(status, MigrationStatus::FreshDatabase));
    }

    #[test]
    fn test_no_migration_needed() {
        let (temp_dir, conn) = setup_test_db(Some(3));
        let runner = MigrationRunner::new(temp_dir.path(), 3, 0);

        let status = runner.check_status(&conn).unwrap();
        assert!(matches!(status, MigrationStatus::NoMigrationNeeded));
    }

    #[test]
    fn test_database_too_old() {
        let (temp_dir, conn) = setup_test_db(Some(1));
        let runner = MigrationRunner::new(temp_dir.path(), 3, 2);

        let status = runner.check_status(&conn).unwrap();
        assert!(matches!(status, MigrationStatus::DatabaseTooOld { current_version: 1, base_version: 2 }));
    }

    #[test]
    fn test_database_newer_than_binary() {
        let (temp_dir, conn) = setup_test_db(Some(9));
        let runner = MigrationRunner::new(temp_dir.path(), 3, 0);

        let status = runner.check_status(&conn).unwrap();
        assert!(matches!(status, MigrationStatus::DatabaseNewer { db_version: 9, binary_version: 3 }));
    }

    #[test]
    fn test_migration_required_counts_revisions() {
        let (temp_dir, conn) = setup_test_db(Some(1));
        let runner = MigrationRunner::new(temp_dir.path(), 3, 0);

        let status = runner.check_status(&conn).unwrap();
        assert!(matches!(
            status,
            MigrationStatus::MigrationRequired { current_version: 1, target_version: 3, migration_count: 2 }
        ));
    }

    #[test]
    fn test_schema_version_pragma_roundtrip() {
        let (_temp_dir, conn) = setup_test_db(None);

        assert_eq!(schema_version(&conn).unwrap(), 0);

        conn.pragma_update(None, "user_version", 42).unwrap();
        assert_eq!(schema_version(&conn).unwrap(), 42);

        conn.pragma_update(None, "user_version", 100).unwrap();
        assert_eq!(schema_version(&conn).unwrap(), 100);
    }

    #[test]
    fn test_lock_acquisition() {
        let (temp_dir, _conn) = setup_test_db(None);
        let runner = MigrationRunner::new(temp_dir.path(), 3, 0);

        // First lock should succeed
        let lock1 = runner.acquire_lock().unwrap();

        // Second lock should fail
        let runner2 = MigrationRunner::new(temp_dir.path(), 3, 0);
        assert!(matches!(runner2.acquire_lock(), Err(MigrationError::MigrationInProgress)));

        // After dropping the first lock, the second should succeed
        drop(lock1);
        let _lock2 = runner2.acquire_lock().unwrap();
    }
}
