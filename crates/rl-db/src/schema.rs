//! Dialect-independent table and index definitions
//!
//! Revisions describe structure with [`TableDef`] and [`IndexDef`]; each
//! backend renders the statements for its own dialect through
//! [`render_create_table`] and [`render_create_index`].

use crate::error::{DbError, DbResult};
use rl_core::sql_utils::{quote_ident, quote_literal};
use rl_core::Dialect;
use std::collections::HashSet;

/// Logical column type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    /// 32-bit integer
    Integer,
    /// Variable-length string with a maximum length
    String(u32),
    /// Unbounded text
    Text,
    /// Structured JSON payload
    Json,
    /// Boolean flag
    Boolean,
    /// Timestamp without time zone
    DateTime,
}

impl ColumnType {
    /// SQL type name for a dialect
    pub fn sql_type(&self, dialect: Dialect) -> String {
        match (self, dialect) {
            (ColumnType::Integer, _) => "INTEGER".to_string(),
            (ColumnType::String(len), _) => format!("VARCHAR({len})"),
            (ColumnType::Text, _) => "TEXT".to_string(),
            (ColumnType::Json, _) => "JSON".to_string(),
            (ColumnType::Boolean, _) => "BOOLEAN".to_string(),
            (ColumnType::DateTime, Dialect::DuckDb) => "TIMESTAMP".to_string(),
            (ColumnType::DateTime, Dialect::Sqlite) => "DATETIME".to_string(),
        }
    }
}

/// Server-side column default
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultValue {
    /// String literal
    Str(String),
    /// Boolean literal
    Bool(bool),
    /// Current timestamp at insert time
    Now,
}

impl DefaultValue {
    /// SQL default expression for a dialect
    pub fn sql(&self, dialect: Dialect) -> String {
        match (self, dialect) {
            (DefaultValue::Str(s), _) => quote_literal(s),
            (DefaultValue::Bool(b), Dialect::DuckDb) => (if *b { "TRUE" } else { "FALSE" }).to_string(),
            // SQLite stores booleans as integers
            (DefaultValue::Bool(b), Dialect::Sqlite) => (if *b { "1" } else { "0" }).to_string(),
            (DefaultValue::Now, _) => "CURRENT_TIMESTAMP".to_string(),
        }
    }
}

/// A single column definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: String,
    pub column_type: ColumnType,
    pub nullable: bool,
    pub default: Option<DefaultValue>,
    pub auto_increment: bool,
}

impl ColumnDef {
    /// New nullable column without a default
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            nullable: true,
            default: None,
            auto_increment: false,
        }
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn default(mut self, value: DefaultValue) -> Self {
        self.default = Some(value);
        self
    }

    /// Let the database assign values. Only valid on a single-column integer
    /// primary key.
    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }
}

/// Single-column foreign key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyDef {
    pub column: String,
    pub referenced_table: String,
    pub referenced_column: String,
}

/// A table definition: columns, primary key and foreign keys
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDef {
    pub name: String,
    pub columns: Vec<ColumnDef>,
    pub primary_key: Vec<String>,
    pub foreign_keys: Vec<ForeignKeyDef>,
}

impl TableDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            primary_key: Vec::new(),
            foreign_keys: Vec::new(),
        }
    }

    pub fn col(mut self, column: ColumnDef) -> Self {
        self.columns.push(column);
        self
    }

    pub fn primary_key(mut self, columns: &[&str]) -> Self {
        self.primary_key = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn foreign_key(mut self, column: &str, referenced_table: &str, referenced_column: &str) -> Self {
        self.foreign_keys.push(ForeignKeyDef {
            column: column.to_string(),
            referenced_table: referenced_table.to_string(),
            referenced_column: referenced_column.to_string(),
        });
        self
    }

    /// Names of columns, in declaration order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Check internal consistency before any SQL is sent
    pub fn validate(&self) -> DbResult<()> {
        let invalid = |msg: String| Err(DbError::InvalidDefinition(format!("{}: {msg}", self.name)));

        if self.columns.is_empty() {
            return invalid("table has no columns".to_string());
        }

        let mut seen = HashSet::new();
        for column in &self.columns {
            if !seen.insert(column.name.as_str()) {
                return invalid(format!("duplicate column '{}'", column.name));
            }
        }

        for pk in &self.primary_key {
            if !seen.contains(pk.as_str()) {
                return invalid(format!("primary key column '{pk}' is not defined"));
            }
        }

        for fk in &self.foreign_keys {
            if !seen.contains(fk.column.as_str()) {
                return invalid(format!("foreign key column '{}' is not defined", fk.column));
            }
        }

        for column in self.columns.iter().filter(|c| c.auto_increment) {
            let sole_pk = self.primary_key.len() == 1 && self.primary_key[0] == column.name;
            if !sole_pk || column.column_type != ColumnType::Integer {
                return invalid(format!(
                    "auto-increment column '{}' must be the single INTEGER primary key",
                    column.name
                ));
            }
        }

        Ok(())
    }
}

/// Index over one or more columns of a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDef {
    pub name: String,
    pub table: String,
    pub columns: Vec<String>,
    pub unique: bool,
}

impl IndexDef {
    pub fn new(name: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: table.into(),
            columns: Vec::new(),
            unique: false,
        }
    }

    pub fn col(mut self, column: &str) -> Self {
        self.columns.push(column.to_string());
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }
}

/// Name of the DuckDB sequence backing an auto-increment column
pub fn sequence_name(table: &str, column: &str) -> String {
    format!("{table}_{column}_seq")
}

/// Render the statements that create `table` in `dialect`.
///
/// DuckDB has no implicit rowid, so every auto-increment column gets a
/// sequence created ahead of the table and wired in as the column default.
pub fn render_create_table(table: &TableDef, dialect: Dialect) -> DbResult<Vec<String>> {
    table.validate()?;

    let mut statements = Vec::new();
    let mut lines = Vec::new();

    for column in &table.columns {
        let mut line = format!(
            "{} {}",
            quote_ident(&column.name),
            column.column_type.sql_type(dialect)
        );
        if !column.nullable {
            line.push_str(" NOT NULL");
        }

        let default = if column.auto_increment && dialect == Dialect::DuckDb {
            let seq = sequence_name(&table.name, &column.name);
            statements.push(format!("CREATE SEQUENCE {} START 1", quote_ident(&seq)));
            Some(format!("nextval({})", quote_literal(&seq)))
        } else {
            column.default.as_ref().map(|d| d.sql(dialect))
        };
        if let Some(default) = default {
            line.push_str(" DEFAULT ");
            line.push_str(&default);
        }
        lines.push(line);
    }

    if !table.primary_key.is_empty() {
        lines.push(format!("PRIMARY KEY ({})", quote_list(&table.primary_key)));
    }

    for fk in &table.foreign_keys {
        lines.push(format!(
            "FOREIGN KEY ({}) REFERENCES {} ({})",
            quote_ident(&fk.column),
            quote_ident(&fk.referenced_table),
            quote_ident(&fk.referenced_column)
        ));
    }

    statements.push(format!(
        "CREATE TABLE {} (\n    {}\n)",
        quote_ident(&table.name),
        lines.join(",\n    ")
    ));
    Ok(statements)
}

/// Render the statement that creates `index`
pub fn render_create_index(index: &IndexDef) -> DbResult<String> {
    if index.columns.is_empty() {
        return Err(DbError::InvalidDefinition(format!(
            "{}: index has no columns",
            index.name
        )));
    }
    Ok(format!(
        "CREATE {}INDEX {} ON {} ({})",
        if index.unique { "UNIQUE " } else { "" },
        quote_ident(&index.name),
        quote_ident(&index.table),
        quote_list(&index.columns)
    ))
}

fn quote_list(names: &[String]) -> String {
    names
        .iter()
        .map(|n| quote_ident(n))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
#[path = "schema_test.rs"]
mod tests;
