//! SQL identifier quoting utilities
//!
//! Revision DDL and introspection queries are assembled from table, column,
//! and index names. These helpers keep that string building safe.

/// Quote a SQL identifier.
///
/// Wraps the identifier in double quotes and escapes any embedded double quotes
/// by doubling them, following the SQL standard. Both DuckDB and SQLite accept
/// this form.
///
/// # Examples
/// ```
/// use rl_core::sql_utils::quote_ident;
/// assert_eq!(quote_ident("users"), r#""users""#);
/// assert_eq!(quote_ident(r#"my"table"#), r#""my""table""#);
/// ```
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Escape a SQL string literal value by doubling single quotes.
///
/// This is for use inside single-quoted SQL string literals, not identifiers.
pub fn escape_sql_string(value: &str) -> String {
    value.replace('\'', "''")
}

/// Quote a value as a single-quoted SQL string literal.
///
/// ```
/// use rl_core::sql_utils::quote_literal;
/// assert_eq!(quote_literal("normal"), "'normal'");
/// assert_eq!(quote_literal("it's"), "'it''s'");
/// ```
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", escape_sql_string(value))
}

/// Returns true when `name` is a plain identifier: ASCII letters, digits, and
/// underscores, not starting with a digit.
pub fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_ident_simple() {
        assert_eq!(quote_ident("notifications"), r#""notifications""#);
    }

    #[test]
    fn test_quote_ident_reserved_word() {
        assert_eq!(quote_ident("read"), r#""read""#);
    }

    #[test]
    fn test_escape_sql_string() {
        assert_eq!(escape_sql_string("O'Brien"), "O''Brien");
        assert_eq!(escape_sql_string("plain"), "plain");
    }

    #[test]
    fn test_is_plain_identifier() {
        assert!(is_plain_identifier("revlane_version"));
        assert!(is_plain_identifier("_private"));
        assert!(is_plain_identifier("t2"));
        assert!(!is_plain_identifier(""));
        assert!(!is_plain_identifier("2fast"));
        assert!(!is_plain_identifier("drop table;"));
        assert!(!is_plain_identifier("main.users"));
    }
}
