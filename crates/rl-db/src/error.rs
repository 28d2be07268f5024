//! Error types for rl-db

use thiserror::Error;

/// Database operation errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Connection error (D001)
    #[error("[D001] Database connection failed: {0}")]
    ConnectionError(String),

    /// Query execution error (D002)
    #[error("[D002] SQL execution failed: {0}")]
    ExecutionError(String),

    /// Table not found (D003)
    #[error("[D003] Table or view not found: {0}")]
    TableNotFound(String),

    /// Object already exists (D004)
    #[error("[D004] Schema conflict: {0}")]
    SchemaConflict(String),

    /// Foreign key, primary key, unique or NOT NULL violation (D005)
    #[error("[D005] Constraint violation: {0}")]
    ConstraintViolation(String),

    /// Table or index definition rejected before reaching the database (D006)
    #[error("[D006] Invalid schema definition: {0}")]
    InvalidDefinition(String),

    /// Mutex poisoned (D007)
    #[error("[D007] Database mutex poisoned: {0}")]
    MutexPoisoned(String),
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;

impl DbError {
    /// Classify a driver error message.
    ///
    /// Neither `duckdb::Error` nor `rusqlite::Error` exposes structured
    /// variants for catalog and constraint failures, so string matching is
    /// the only reliable approach. "already exists" is checked first because
    /// DuckDB phrases both conflicts and lookups as "Table with name ...".
    pub fn classify(msg: String) -> Self {
        let lower = msg.to_ascii_lowercase();
        if lower.contains("already exists") {
            DbError::SchemaConflict(msg)
        } else if lower.contains("foreign key")
            || lower.contains("constraint failed")
            || lower.contains("constraint error")
        {
            DbError::ConstraintViolation(msg)
        } else if lower.contains("no such table")
            || msg.contains("Table with name")
            || msg.contains("Table or view with name")
            || (msg.contains("Catalog Error") && msg.contains("Table") && msg.contains("not exist"))
        {
            DbError::TableNotFound(msg)
        } else {
            DbError::ExecutionError(msg)
        }
    }
}

impl From<duckdb::Error> for DbError {
    fn from(err: duckdb::Error) -> Self {
        DbError::classify(err.to_string())
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(err: rusqlite::Error) -> Self {
        DbError::classify(err.to_string())
    }
}
