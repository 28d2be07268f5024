//! DuckDB database backend implementation

use crate::error::{DbError, DbResult};
use crate::introspect::{ColumnInfo, ForeignKeyInfo};
use crate::traits::{DatabaseCore, DatabaseSchema};
use async_trait::async_trait;
use duckdb::{params, Connection};
use rl_core::sql_utils::quote_ident;
use rl_core::Dialect;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// DuckDB database backend
pub struct DuckDbBackend {
    conn: Mutex<Connection>,
}

impl DuckDbBackend {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create a new DuckDB connection from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| DbError::ConnectionError(format!("{e}: {}", path.display())))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path == ":memory:" {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))
    }

    /// Execute SQL synchronously
    fn execute_sync(&self, sql: &str) -> DbResult<usize> {
        log::debug!("duckdb: {sql}");
        let conn = self.lock()?;
        Ok(conn.execute(sql, [])?)
    }

    /// Execute batch SQL synchronously
    fn execute_batch_sync(&self, sql: &str) -> DbResult<()> {
        log::debug!("duckdb: {sql}");
        let conn = self.lock()?;
        Ok(conn.execute_batch(sql)?)
    }

    /// Query count synchronously
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
            "SELECT table_name FROM information_schema.tables \
             WHERE table_schema = 'main' AND table_type = 'BASE TABLE' \
             ORDER BY table_name",
        )
    }

    fn columns_sync(&self, table: &str) -> DbResult<Vec<ColumnInfo>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT column_name, data_type, is_nullable, column_default \
             FROM information_schema.columns \
             WHERE table_schema = 'main' AND table_name = ? \
             ORDER BY ordinal_position",
        )?;
        let rows = stmt.query_map(params![table], |row| {
            Ok(ColumnInfo {
                name: row.get(0)?,
                data_type: row.get(1)?,
                nullable: row.get::<_, String>(2)? == "YES",
                default: row.get(3)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn index_names_sync(&self, table: &str) -> DbResult<Vec<String>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT index_name FROM duckdb_indexes() \
             WHERE schema_name = 'main' AND table_name = ? \
             ORDER BY index_name",
        )?;
        let rows = stmt.query_map(params![table], |row| row.get::<_, String>(0))?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn foreign_keys_sync(&self, table: &str) -> DbResult<Vec<ForeignKeyInfo>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT array_to_string(constraint_column_names, ','), \
                    referenced_table, \
                    array_to_string(referenced_column_names, ',') \
             FROM duckdb_constraints() \
             WHERE schema_name = 'main' AND table_name = ? \
               AND constraint_type = 'FOREIGN KEY' \
             ORDER BY constraint_index",
        )?;
        let rows = stmt.query_map(params![table], |row| {
            Ok(ForeignKeyInfo {
                column: row.get(0)?,
                referenced_table: row.get(1)?,
                referenced_column: row.get(2)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Sequences referenced by `nextval('...')` column defaults of a table
    fn owned_sequences(&self, table: &str) -> DbResult<Vec<String>> {
        Ok(self
            .columns_sync(table)?
            .iter()
            .filter_map(|c| c.default.as_deref().and_then(nextval_sequence))
            .collect())
    }
}

/// Extract the sequence name from a `nextval('name')` default expression
fn nextval_sequence(default: &str) -> Option<String> {
    let start = default.find("nextval('")? + "nextval('".len();
    let len = default[start..].find('\'')?;
    Some(default[start..start + len].to_string())
}

#[async_trait]
impl DatabaseCore for DuckDbBackend {
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
        Dialect::DuckDb
    }
}

#[async_trait]
impl DatabaseSchema for DuckDbBackend {
    /// Drops the table, then the sequences that fed its id columns
    async fn drop_table(&self, name: &str) -> DbResult<()> {
        if !self.table_names_sync()?.iter().any(|t| t == name) {
            return Err(DbError::TableNotFound(name.to_string()));
        }
        let sequences = self.owned_sequences(name)?;

        let mut sql = format!("DROP TABLE {}", quote_ident(name));
        for seq in &sequences {
            sql.push_str(&format!(";\nDROP SEQUENCE IF EXISTS {}", quote_ident(seq)));
        }
        self.execute_batch_sync(&sql)
    }

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
#[path = "duckdb_test.rs"]
mod tests;
