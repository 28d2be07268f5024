//! Revision history and migration runner for Revlane.
//!
//! Each [`Revision`] is a forward/backward pair of schema operations linked
//! to its predecessor through `down_revision`. The [`Migrator`] orders the
//! registered revisions, records the current one in a version table, and
//! applies or reverts them one transaction at a time.

pub mod error;
pub mod revision;
pub mod runner;
pub mod version_table;
pub mod versions;

pub use error::{MigrateError, MigrateResult};
pub use revision::{Capabilities, MigrationContext, Revision};
pub use runner::{Direction, HistoryEntry, MigrationStep, Migrator, Target};
pub use version_table::VersionTable;
