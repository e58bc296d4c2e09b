//! Maps schema versions to revision functions.

use super::revisions;
use super::{MigrationContext, MigrationError};

pub type MigrationFn = fn(&MigrationContext<'_>) -> Result<(), MigrationError>;

/// A single registered schema revision.
#[derive(Debug)]
pub struct Migration {
    pub name: &'static str,
    pub from_version: u32,
    pub to_version: u32,
    pub migrate: MigrationFn,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        name: "catalog_tables",
        from_version: 0,
        to_version: 1,
        migrate: revisions::revision_0001::migrate,
    },
    Migration {
        name: "comic_view_counters",
        from_version: 1,
        to_version: 2,
        migrate: revisions::revision_0002::migrate,
    },
    Migration {
        name: "chapter_view_counters",
        from_version: 2,
        to_version: 3,
        migrate: revisions::revision_0003::migrate,
    },
];

/// The full revision chain, oldest first.
pub fn migrations() -> &'static [Migration] {
    MIGRATIONS
}

/// Return the revisions covering `from` to `to`, in application order.
///
/// The chain must start at `from` and land exactly on `to` with no gaps,
/// otherwise there is no usable migration path.
pub fn migrations_for_range(from: u32, to: u32) -> Result<Vec<&'static Migration>, MigrationError> {
    let chain: Vec<_> =
        MIGRATIONS.iter().filter(|m| m.from_version >= from && m.to_version <= to).collect();

    let mut expected = from;
    for migration in &chain {
        if migration.from_version != expected {
            return Err(MigrationError::NoMigrationPath { from, to });
        }
        expected = migration.to_version;
    }
    if expected != to {
        return Err(MigrationError::NoMigrationPath { from, to });
    }

    Ok(chain)
}

/// Check that the registry is a gapless chain of single-version steps.
pub fn validate_chain() -> Result<(), MigrationError> {
    let mut expected_from = 0;
    for migration in MIGRATIONS {
        if migration.from_version != expected_from || migration.to_version != migration.from_version + 1 {
            return Err(MigrationError::NoMigrationPath {
                from: migration.from_version,
                to: migration.to_version,
            });
        }
        expected_from = migration.to_version;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_is_valid_and_ends_at_current_version() {
        validate_chain().unwrap();
        assert_eq!(migrations().last().unwrap().to_version, crate::DB_VERSION);
    }

    #[test]
    fn test_full_range() {
        let chain = migrations_for_range(0, crate::DB_VERSION).unwrap();
        assert_eq!(chain.len(), crate::DB_VERSION as usize);
    }

    #[test]
    fn test_single_step_range() {
        let chain = migrations_for_range(2, 3).unwrap();
        assert_eq!(chain.len(), 1);
        assert_eq!(chain[0].name, "chapter_view_counters");
    }

    #[test]
    fn test_empty_range() {
        assert!(migrations_for_range(3, 3).unwrap().is_empty());
    }

    #[test]
    fn test_unreachable_range() {
        assert!(matches!(
            migrations_for_range(0, 99),
            Err(MigrationError::NoMigrationPath { from: 0, to: 99 })
        ));
    }
}
