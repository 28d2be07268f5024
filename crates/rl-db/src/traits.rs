//! Database trait definitions

use crate::duckdb::DuckDbBackend;
use crate::error::DbResult;
use crate::introspect::{ColumnInfo, ForeignKeyInfo};
use crate::schema::{render_create_index, render_create_table, IndexDef, TableDef};
use crate::sqlite::SqliteBackend;
use async_trait::async_trait;
use rl_core::sql_utils::quote_ident;
use rl_core::{DatabaseConfig, Dialect};
use std::sync::Arc;

/// Statement execution and transaction control
///
/// Implementations must be Send + Sync for async operation.
#[async_trait]
pub trait DatabaseCore: Send + Sync {
    /// Execute SQL that modifies data, returns affected rows
    async fn execute(&self, sql: &str) -> DbResult<usize>;

    /// Execute multiple SQL statements
    async fn execute_batch(&self, sql: &str) -> DbResult<()>;

    /// Execute query returning row count
    async fn query_count(&self, sql: &str) -> DbResult<usize>;

    /// Execute a query and return its first column as text, one entry per row
    async fn query_strings(&self, sql: &str) -> DbResult<Vec<String>>;

    /// Dialect of the connected database
    fn dialect(&self) -> Dialect;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str {
        self.dialect().name()
    }

    async fn begin(&self) -> DbResult<()> {
        self.execute_batch("BEGIN TRANSACTION").await
    }

    async fn commit(&self) -> DbResult<()> {
        self.execute_batch("COMMIT").await
    }

    async fn rollback(&self) -> DbResult<()> {
        self.execute_batch("ROLLBACK").await
    }
}

/// Structural changes and live schema introspection
#[async_trait]
pub trait DatabaseSchema: DatabaseCore {
    /// Create a table (and, on DuckDB, its id sequences)
    async fn create_table(&self, table: &TableDef) -> DbResult<()> {
        let statements = render_create_table(table, self.dialect())?;
        self.execute_batch(&statements.join(";\n")).await
    }

    /// Create an index
    async fn create_index(&self, index: &IndexDef) -> DbResult<()> {
        self.execute_batch(&render_create_index(index)?).await
    }

    /// Drop a table, failing if it does not exist
    async fn drop_table(&self, name: &str) -> DbResult<()> {
        self.execute_batch(&format!("DROP TABLE {}", quote_ident(name)))
            .await
    }

    /// Names of all user tables in the live database, sorted
    async fn table_names(&self) -> DbResult<Vec<String>>;

    /// Check if a table exists in the live database
    async fn table_exists(&self, name: &str) -> DbResult<bool> {
        Ok(self.table_names().await?.iter().any(|t| t == name))
    }

    /// Columns of a table in declaration order
    async fn columns(&self, table: &str) -> DbResult<Vec<ColumnInfo>>;

    /// Names of explicitly created indexes on a table, sorted
    async fn index_names(&self, table: &str) -> DbResult<Vec<String>>;

    /// Foreign keys declared on a table
    async fn foreign_keys(&self, table: &str) -> DbResult<Vec<ForeignKeyInfo>>;

    /// Number of rows in a table
    async fn row_count(&self, table: &str) -> DbResult<usize> {
        self.query_count(&format!("SELECT * FROM {}", quote_ident(table)))
            .await
    }
}

/// Full database interface used by revisions and the migration runner
pub trait Database: DatabaseCore + DatabaseSchema {}

impl<T: DatabaseCore + DatabaseSchema> Database for T {}

/// Open a backend for a database configuration
pub fn connect(config: &DatabaseConfig) -> DbResult<Arc<dyn Database>> {
    log::debug!("Connecting to {} database at {}", config.dialect, config.path);
    let db: Arc<dyn Database> = match config.dialect {
        Dialect::DuckDb => Arc::new(DuckDbBackend::new(&config.path)?),
        Dialect::Sqlite => Arc::new(SqliteBackend::new(&config.path)?),
    };
    Ok(db)
}
