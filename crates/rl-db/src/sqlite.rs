//! SQLite database backend implementation

use crate::error::{DbError, DbResult};
use crate::introspect::{ColumnInfo, ForeignKeyInfo};
use crate::traits::{DatabaseCore, DatabaseSchema};
use async_trait::async_trait;
use rl_core::Dialect;
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// SQLite database backend
///
/// Foreign key enforcement is switched on for every connection.
pub struct SqliteBackend {
    conn: Mutex<Connection>,
}

impl SqliteBackend {
    /// Create a new in-memory SQLite connection
    pub fn in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| DbError::ConnectionError(format!("failed to open in-memory database: {e}")))?;
        Self::configure(conn)
    }

    /// Create a new SQLite connection from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| DbError::ConnectionError(format!("{e}: {}", path.display())))?;
        Self::configure(conn)
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path == ":memory:" {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    fn configure(conn: Connection) -> DbResult<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(|e| DbError::ConnectionError(format!("failed to set pragmas: {e}")))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))
    }

    fn execute_sync(&self, sql: &str) -> DbResult<usize> {
        log::debug!("sqlite: {sql}");
        let conn = self.lock()?;
        Ok(conn.execute(sql, [])?)
    }

    fn execute_batch_sync(&self, sql: &str) -> DbResult<()> {
        log::debug!("sqlite: {sql}");
        let conn = self.lock()?;
        Ok(conn.execute_batch(sql)?)
    }

    fn query_count_sync(&self, sql: &str) -> DbResult<usize> {
        let conn = self.lock()?;
        let count: i64 =
            conn.query_row(&format!("SELECT COUNT(*) FROM ({sql})"), [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn query_strings_sync(&self, sql: &str) -> DbResult<Vec<String>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn table_names_sync(&self) -> DbResult<Vec<String>> {
        self.query_strings_sync(
            "SELECT name FROM sqlite_master \
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%' \
             ORDER BY name",
        )
    }

    fn columns_sync(&self, table: &str) -> DbResult<Vec<ColumnInfo>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT name, type, \"notnull\", dflt_value FROM pragma_table_info(?1) ORDER BY cid",
        )?;
        let rows = stmt.query_map(params![table], |row| {
            Ok(ColumnInfo {
                name: row.get(0)?,
                data_type: row.get(1)?,
                nullable: row.get::<_, i64>(2)? == 0,
                default: row.get(3)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn index_names_sync(&self, table: &str) -> DbResult<Vec<String>> {
        let conn = self.lock()?;
        // Automatic indexes backing PRIMARY KEY/UNIQUE constraints have no SQL text
        let mut stmt = conn.prepare(
            "SELECT name FROM sqlite_master \
             WHERE type = 'index' AND tbl_name = ?1 AND sql IS NOT NULL \
             ORDER BY name",
        )?;
        let rows = stmt.query_map(params![table], |row| row.get::<_, String>(0))?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn foreign_keys_sync(&self, table: &str) -> DbResult<Vec<ForeignKeyInfo>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT \"from\", \"table\", \"to\" FROM pragma_foreign_key_list(?1) ORDER BY id, seq",
        )?;
        let rows = stmt.query_map(params![table], |row| {
            Ok(ForeignKeyInfo {
                column: row.get(0)?,
                referenced_table: row.get(1)?,
                referenced_column: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}

#[async_trait]
impl DatabaseCore for SqliteBackend {
    async fn execute(&self, sql: &str) -> DbResult<usize> {
        self.execute_sync(sql)
    }

    async fn execute_batch(&self, sql: &str) -> DbResult<()> {
        self.execute_batch_sync(sql)
    }

    async fn query_count(&self, sql: &str) -> DbResult<usize> {
        self.query_count_sync(sql)
    }

    async fn query_strings(&self, sql: &str) -> DbResult<Vec<String>> {
        self.query_strings_sync(sql)
    }

    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }
}

#[async_trait]
impl DatabaseSchema for SqliteBackend {
    async fn table_names(&self) -> DbResult<Vec<String>> {
        self.table_names_sync()
    }

    async fn columns(&self, table: &str) -> DbResult<Vec<ColumnInfo>> {
        self.columns_sync(table)
    }

    async fn index_names(&self, table: &str) -> DbResult<Vec<String>> {
        self.index_names_sync(table)
    }

    async fn foreign_keys(&self, table: &str) -> DbResult<Vec<ForeignKeyInfo>> {
        self.foreign_keys_sync(table)
    }
}

#[cfg(test)]
#[path = "sqlite_test.rs"]
mod tests;
