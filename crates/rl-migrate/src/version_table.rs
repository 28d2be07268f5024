//! Version table bookkeeping.
//!
//! The version table holds at most one row: the id of the current revision.
//! An empty table means the database is at base.

use crate::error::{MigrateError, MigrateResult};
use rl_core::sql_utils::{is_plain_identifier, quote_ident, quote_literal};
use rl_core::RevisionId;
use rl_db::{Database, DatabaseCore};

/// Default version table name
pub const DEFAULT_VERSION_TABLE: &str = "revlane_version";

/// Handle on the table recording the current revision
#[derive(Debug, Clone)]
pub struct VersionTable {
    name: String,
}

impl Default for VersionTable {
    fn default() -> Self {
        Self {
            name: DEFAULT_VERSION_TABLE.to_string(),
        }
    }
}

impl VersionTable {
    pub fn new(name: impl Into<String>) -> MigrateResult<Self> {
        let name = name.into();
        if !is_plain_identifier(&name) {
            return Err(MigrateError::VersionTableError(format!(
                "'{name}' is not a valid table name"
            )));
        }
        Ok(Self { name })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Create the version table if it does not exist yet.
    pub async fn ensure(&self, db: &dyn Database) -> MigrateResult<()> {
        db.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {} (
                 version_num VARCHAR(32) NOT NULL,
                 PRIMARY KEY (version_num)
             )",
            quote_ident(&self.name)
        ))
        .await
        .map_err(|e| {
            MigrateError::VersionTableError(format!("failed to create {}: {e}", self.name))
        })
    }

    /// Return the recorded revision, or `None` at base.
    pub async fn current(&self, db: &dyn Database) -> MigrateResult<Option<RevisionId>> {
        let rows = db
            .query_strings(&format!(
                "SELECT version_num FROM {}",
                quote_ident(&self.name)
            ))
            .await
            .map_err(|e| {
                MigrateError::VersionTableError(format!("failed to read {}: {e}", self.name))
            })?;

        match rows.as_slice() {
            [] => Ok(None),
            [id] => Ok(Some(RevisionId::parse(id.as_str())?)),
            many => Err(MigrateError::VersionTableError(format!(
                "{} holds {} rows, expected at most one: {}",
                self.name,
                many.len(),
                many.join(", ")
            ))),
        }
    }

    /// Replace the recorded revision. `None` clears the table (base).
    pub async fn set(&self, db: &dyn Database, revision: Option<&RevisionId>) -> MigrateResult<()> {
        let table = quote_ident(&self.name);
        let mut sql = format!("DELETE FROM {table}");
        if let Some(revision) = revision {
            sql.push_str(&format!(
                ";\nINSERT INTO {table} (version_num) VALUES ({})",
                quote_literal(revision.as_str())
            ));
        }
        db.execute_batch(&sql).await.map_err(|e| {
            MigrateError::VersionTableError(format!("failed to update {}: {e}", self.name))
        })
    }
}
