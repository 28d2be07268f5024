//! rl-db - Database abstraction layer for Revlane
//!
//! This crate provides the `Database` traits used by revisions and the
//! migration runner, a dialect-independent description of tables and
//! indexes, and implementations for DuckDB and SQLite.

pub mod duckdb;
pub mod error;
pub mod introspect;
pub mod schema;
pub mod sqlite;
pub mod traits;

pub use duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
pub use introspect::{ColumnInfo, ForeignKeyInfo, SchemaSnapshot, TableSnapshot};
pub use schema::{ColumnDef, ColumnType, DefaultValue, ForeignKeyDef, IndexDef, TableDef};
pub use sqlite::SqliteBackend;
pub use traits::{connect, Database, DatabaseCore, DatabaseSchema};
