#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("Database version {db_version} is newer than binary supports ({binary_version}). Upgrade the binary.")]
    DatabaseNewerThanBinary { db_version: u32, binary_version: u32 },

    #[error("Database version {current_version} too old (minimum: {base_version}). Delete the backend directory and start over.")]
    DatabaseTooOld { current_version: u32, base_version: u32 },

    #[error("No migration registered for v{from} -> v{to}")]
    NoMigrationPath { from: u32, to: u32 },

    #[error("Migration lock exists - another migration may be in progress")]
    MigrationInProgress,

    #[error("Failed to create backup: {0}")]
    BackupFailed(String),

    #[error("Invalid schema version in database: {0}")]
    InvalidSchemaVersion(i64),

    #[error("Migration '{name}' (v{from_version} -> v{to_version}) failed: {message}")]
    MigrationStepFailed { name: String, from_version: u32, to_version: u32, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Migration aborted")]
    Aborted,
}
