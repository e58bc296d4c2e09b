#![allow(non_upper_case_globals)] // allow KiB name

use anyhow::{Context, Result};
use rusqlite::Connection;
use std::time::Duration;

const KiB: i64 = 1024;

/// Connection-level SQLite tuning.
#[derive(Debug, Clone)]
pub struct SqliteConfig {
    /// Use write-ahead logging instead of the rollback journal.
    pub write_ahead_log: bool,
    /// How long a connection waits on a locked database before failing with
    /// `SQLITE_BUSY`.
    pub busy_timeout: Duration,
    /// Page cache budget. Negative values are KiB, positive values are pages.
    pub cache_size: i64,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self { write_ahead_log: true, busy_timeout: Duration::from_secs(5), cache_size: -64 * KiB }
    }
}

/// Applied to every connection before it touches the schema.
///
/// `foreign_keys` is unconditional: the cascade and uniqueness semantics of
/// the schema depend on it, and SQLite defaults it to off.
pub fn apply_connection_pragmas(conn: &Connection, config: &SqliteConfig) -> Result<()> {
    conn.pragma_update(None, "foreign_keys", true).context("Enabling foreign key enforcement")?;

    if config.write_ahead_log {
        // journal_mode returns the resulting mode as a row
        conn.pragma_update_and_check(None, "journal_mode", "wal", |_| Ok(()))
            .context("Enabling write-ahead logging")?;
        conn.pragma_update(None, "synchronous", "normal").context("Setting synchronous mode")?;
    }

    conn.busy_timeout(config.busy_timeout).context("Setting busy timeout")?;
    conn.pragma_update(None, "cache_size", config.cache_size).context("Setting page cache size")?;

    Ok(())
}
