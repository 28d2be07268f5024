//! Live schema introspection results and whole-schema snapshots
//!
//! Snapshots capture structure only (tables, columns, indexes, foreign
//! keys), never data. Two snapshots compare equal when the schemas match.

use crate::error::DbResult;
use crate::traits::{Database, DatabaseSchema};
use serde::Serialize;
use std::fmt;

/// A column as reported by the live database
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    /// Type as reported by the engine (DuckDB normalizes, SQLite keeps the declared text)
    pub data_type: String,
    pub nullable: bool,
    /// Default expression text, if any
    pub default: Option<String>,
}

/// A single-column foreign key as reported by the live database
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct ForeignKeyInfo {
    pub column: String,
    pub referenced_table: String,
    pub referenced_column: String,
}

/// Structure of one table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSnapshot {
    pub name: String,
    pub columns: Vec<ColumnInfo>,
    pub indexes: Vec<String>,
    pub foreign_keys: Vec<ForeignKeyInfo>,
}

impl TableSnapshot {
    /// Column names in declaration order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Look up a column by name
    pub fn column(&self, name: &str) -> Option<&ColumnInfo> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// Structure of every user table in a database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct SchemaSnapshot {
    pub tables: Vec<TableSnapshot>,
}

impl SchemaSnapshot {
    /// Capture the structure of all tables
    pub async fn capture(db: &dyn Database) -> DbResult<Self> {
        let mut tables = Vec::new();
        for name in db.table_names().await? {
            tables.push(Self::capture_table(db, &name).await?);
        }
        Ok(Self { tables })
    }

    /// Capture the structure of a single table
    pub async fn capture_table(db: &dyn Database, name: &str) -> DbResult<TableSnapshot> {
        let mut foreign_keys = db.foreign_keys(name).await?;
        foreign_keys.sort();
        Ok(TableSnapshot {
            name: name.to_string(),
            columns: db.columns(name).await?,
            indexes: db.index_names(name).await?,
            foreign_keys,
        })
    }

    /// Look up a table by name
    pub fn table(&self, name: &str) -> Option<&TableSnapshot> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Table names, sorted
    pub fn table_names(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.name.as_str()).collect()
    }
}

impl fmt::Display for TableSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        for column in &self.columns {
            write!(
                f,
                "  {:<16} {:<14} {}",
                column.name,
                column.data_type,
                if column.nullable { "NULL" } else { "NOT NULL" }
            )?;
            if let Some(default) = &column.default {
                write!(f, " DEFAULT {default}")?;
            }
            writeln!(f)?;
        }
        for index in &self.indexes {
            writeln!(f, "  index {index}")?;
        }
        for fk in &self.foreign_keys {
            writeln!(
                f,
                "  foreign key {} -> {}.{}",
                fk.column, fk.referenced_table, fk.referenced_column
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for SchemaSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, table) in self.tables.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{table}")?;
        }
        Ok(())
    }
}
