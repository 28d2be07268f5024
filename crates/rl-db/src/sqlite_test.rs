use super::*;
use crate::schema::{ColumnDef, ColumnType, DefaultValue, IndexDef, TableDef};

fn users_table() -> TableDef {
    TableDef::new("users")
        .col(ColumnDef::new("id", ColumnType::Integer).not_null().auto_increment())
        .col(ColumnDef::new("email", ColumnType::String(255)).not_null())
        .primary_key(&["id"])
}

fn posts_table() -> TableDef {
    TableDef::new("posts")
        .col(ColumnDef::new("id", ColumnType::Integer).not_null().auto_increment())
        .col(ColumnDef::new("user_id", ColumnType::Integer).not_null())
        .col(
            ColumnDef::new("published", ColumnType::Boolean)
                .not_null()
                .default(DefaultValue::Bool(false)),
        )
        .col(
            ColumnDef::new("created_at", ColumnType::DateTime)
                .not_null()
                .default(DefaultValue::Now),
        )
        .col(ColumnDef::new("meta", ColumnType::Json))
        .primary_key(&["id"])
        .foreign_key("user_id", "users", "id")
}

async fn with_tables() -> SqliteBackend {
    let db = SqliteBackend::in_memory().unwrap();
    db.create_table(&users_table()).await.unwrap();
    db.create_table(&posts_table()).await.unwrap();
    db
}

#[tokio::test]
async fn test_in_memory() {
    let db = SqliteBackend::in_memory().unwrap();
    assert_eq!(db.db_type(), "sqlite");
    assert_eq!(db.dialect(), Dialect::Sqlite);
    assert!(db.table_names().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_foreign_keys_pragma_enabled() {
    let db = SqliteBackend::in_memory().unwrap();
    let value = db
        .query_strings("SELECT CAST(foreign_keys AS TEXT) FROM pragma_foreign_keys")
        .await
        .unwrap();
    assert_eq!(value, vec!["1"]);
}

#[tokio::test]
async fn test_columns_keep_declared_types() {
    let db = with_tables().await;
    let columns = db.columns("posts").await.unwrap();

    let described: Vec<(&str, &str, bool, Option<&str>)> = columns
        .iter()
        .map(|c| {
            (
                c.name.as_str(),
                c.data_type.as_str(),
                c.nullable,
                c.default.as_deref(),
            )
        })
        .collect();
    assert_eq!(
        described,
        vec![
            ("id", "INTEGER", false, None),
            ("user_id", "INTEGER", false, None),
            ("published", "BOOLEAN", false, Some("0")),
            ("created_at", "DATETIME", false, Some("CURRENT_TIMESTAMP")),
            ("meta", "JSON", true, None),
        ]
    );
}

#[tokio::test]
async fn test_integer_primary_key_auto_assigns() {
    let db = with_tables().await;
    db.execute_batch(
        "INSERT INTO users (email) VALUES ('a@example.com');
         INSERT INTO users (email) VALUES ('b@example.com');",
    )
    .await
    .unwrap();

    let ids = db
        .query_strings("SELECT CAST(id AS TEXT) FROM users ORDER BY id")
        .await
        .unwrap();
    assert_eq!(ids, vec!["1", "2"]);
}

#[tokio::test]
async fn test_foreign_key_enforced() {
    let db = with_tables().await;
    let err = db
        .execute("INSERT INTO posts (user_id) VALUES (999)")
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::ConstraintViolation(_)), "{err}");
}

#[tokio::test]
async fn test_foreign_keys_introspection() {
    let db = with_tables().await;
    assert_eq!(
        db.foreign_keys("posts").await.unwrap(),
        vec![ForeignKeyInfo {
            column: "user_id".to_string(),
            referenced_table: "users".to_string(),
            referenced_column: "id".to_string(),
        }]
    );
    assert!(db.foreign_keys("users").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_index_names_skip_automatic_indexes() {
    let db = SqliteBackend::in_memory().unwrap();
    db.execute_batch("CREATE TABLE t (id INTEGER PRIMARY KEY, code TEXT UNIQUE, label TEXT)")
        .await
        .unwrap();
    db.create_index(&IndexDef::new("ix_t_label", "t").col("label"))
        .await
        .unwrap();

    assert_eq!(db.index_names("t").await.unwrap(), vec!["ix_t_label"]);
}

#[tokio::test]
async fn test_create_existing_index_is_schema_conflict() {
    let db = with_tables().await;
    let index = IndexDef::new("ix_posts_user_id", "posts").col("user_id");
    db.create_index(&index).await.unwrap();

    let err = db.create_index(&index).await.unwrap_err();
    assert!(matches!(err, DbError::SchemaConflict(_)), "{err}");
}

#[tokio::test]
async fn test_drop_table() {
    let db = with_tables().await;
    db.drop_table("posts").await.unwrap();
    assert_eq!(db.table_names().await.unwrap(), vec!["users"]);

    let err = db.drop_table("posts").await.unwrap_err();
    assert!(matches!(err, DbError::TableNotFound(_)), "{err}");
}

#[tokio::test]
async fn test_rollback_discards_ddl() {
    let db = SqliteBackend::in_memory().unwrap();
    db.begin().await.unwrap();
    db.create_table(&users_table()).await.unwrap();
    db.rollback().await.unwrap();
    assert!(!db.table_exists("users").await.unwrap());
}

#[tokio::test]
async fn test_file_database_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.db");
    {
        let db = SqliteBackend::from_path(&path).unwrap();
        db.create_table(&users_table()).await.unwrap();
    }
    let db = SqliteBackend::new(path.to_str().unwrap()).unwrap();
    assert!(db.table_exists("users").await.unwrap());
}
