//! The revision contract and the context revisions run against.

use async_trait::async_trait;
use rl_core::{CapabilityOverrides, Dialect};
use rl_db::{Database, DbResult};

/// Optional behaviours a revision may rely on, derived from the dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Downgrades may recreate the structure of tables a revision retired.
    pub restore_dropped_tables: bool,
}

impl Capabilities {
    /// Defaults for a dialect: only SQLite restores retired tables.
    pub fn for_dialect(dialect: Dialect) -> Self {
        Self {
            restore_dropped_tables: matches!(dialect, Dialect::Sqlite),
        }
    }

    /// Replace defaults with any explicitly configured values.
    pub fn with_overrides(self, overrides: &CapabilityOverrides) -> Self {
        Self {
            restore_dropped_tables: overrides
                .restore_dropped_tables
                .unwrap_or(self.restore_dropped_tables),
        }
    }
}

/// What a revision body gets to work with.
pub struct MigrationContext<'a> {
    pub db: &'a dyn Database,
    pub capabilities: Capabilities,
}

impl<'a> MigrationContext<'a> {
    pub fn new(db: &'a dyn Database, capabilities: Capabilities) -> Self {
        Self { db, capabilities }
    }
}

/// A single named, ordered unit of schema change.
///
/// `upgrade` moves the revision from unapplied to applied and `downgrade`
/// moves it back. Neither is called out of order; the runner owns ordering
/// and transactions.
#[async_trait]
pub trait Revision: Send + Sync {
    /// Unique revision id
    fn id(&self) -> &'static str;

    /// The immediate predecessor, `None` for the base revision
    fn down_revision(&self) -> Option<&'static str>;

    /// One-line description
    fn message(&self) -> &'static str;

    async fn upgrade(&self, ctx: &MigrationContext<'_>) -> DbResult<()>;

    async fn downgrade(&self, ctx: &MigrationContext<'_>) -> DbResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_defaults() {
        assert!(Capabilities::for_dialect(Dialect::Sqlite).restore_dropped_tables);
        assert!(!Capabilities::for_dialect(Dialect::DuckDb).restore_dropped_tables);
    }

    #[test]
    fn test_capability_overrides() {
        let forced = CapabilityOverrides {
            restore_dropped_tables: Some(true),
        };
        assert!(
            Capabilities::for_dialect(Dialect::DuckDb)
                .with_overrides(&forced)
                .restore_dropped_tables
        );

        let unset = CapabilityOverrides::default();
        assert!(
            Capabilities::for_dialect(Dialect::Sqlite)
                .with_overrides(&unset)
                .restore_dropped_tables
        );
    }
}
