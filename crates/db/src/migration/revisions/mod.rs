//! Database schema revisions.
//!
//! Files: `revision_XXXX.rs` where XXXX is the target version (e.g.
//! `revision_0003.rs` = v2→v3).
//!
//! To add a new revision:
//! 1. Create `revision_XXXX.rs` with `pub fn migrate(ctx: &MigrationContext<'_>) -> Result<(), MigrationError>`
//! 2. Export the module here
//! 3. Register it in `registry::migrations()`
//! 4. Bump [`crate::DB_VERSION`]

pub mod revision_0001;
pub mod revision_0002;
pub mod revision_0003;
