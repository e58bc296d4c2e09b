//! Migration context provided to each revision function.

use rusqlite::Transaction;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Context provided to each revision function.
///
/// The wrapped transaction is committed by the runner together with the
/// schema version bump, so a revision either applies fully or not at all.
pub struct MigrationContext<'a> {
    tx: &'a Transaction<'a>,
    abort_flag: Arc<AtomicBool>,
}

impl<'a> MigrationContext<'a> {
    pub(crate) fn new(tx: &'a Transaction<'a>, abort_flag: Arc<AtomicBool>) -> Self {
        Self { tx, abort_flag }
    }

    pub fn tx(&self) -> &Transaction<'a> {
        self.tx
    }

    /// Long-running revisions should poll this between batches of work.
    pub fn should_abort(&self) -> bool {
        self.abort_flag.load(Ordering::Relaxed)
    }
}
