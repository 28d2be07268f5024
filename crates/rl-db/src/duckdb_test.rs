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
            ColumnDef::new("status", ColumnType::String(20))
                .not_null()
                .default(DefaultValue::Str("draft".into())),
        )
        .col(ColumnDef::new("meta", ColumnType::Json))
        .primary_key(&["id"])
        .foreign_key("user_id", "users", "id")
}

#[tokio::test]
async fn test_in_memory() {
    let db = DuckDbBackend::in_memory().unwrap();
    assert_eq!(db.db_type(), "duckdb");
    assert_eq!(db.dialect(), Dialect::DuckDb);
    assert!(db.table_names().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_execute_batch_and_table_names() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch("CREATE TABLE t2 (id INT); CREATE TABLE t1 (id INT);")
        .await
        .unwrap();

    assert_eq!(db.table_names().await.unwrap(), vec!["t1", "t2"]);
    assert!(db.table_exists("t1").await.unwrap());
    assert!(!db.table_exists("nonexistent").await.unwrap());
}

#[tokio::test]
async fn test_create_table_assigns_ids() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.create_table(&users_table()).await.unwrap();
    db.execute("INSERT INTO users (email) VALUES ('a@example.com'), ('b@example.com')")
        .await
        .unwrap();

    let ids = db
        .query_strings("SELECT CAST(id AS VARCHAR) FROM users ORDER BY id")
        .await
        .unwrap();
    assert_eq!(ids, vec!["1", "2"]);
}

#[tokio::test]
async fn test_columns_introspection() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.create_table(&users_table()).await.unwrap();
    db.create_table(&posts_table()).await.unwrap();

    let columns = db.columns("posts").await.unwrap();
    let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["id", "user_id", "status", "meta"]);

    assert_eq!(columns[1].data_type, "INTEGER");
    assert!(!columns[1].nullable);
    assert!(columns[2].data_type.starts_with("VARCHAR"));
    assert!(columns[2].default.as_deref().unwrap().contains("draft"));
    assert!(columns[3].nullable);
    assert!(columns[0]
        .default
        .as_deref()
        .unwrap()
        .contains("nextval('posts_id_seq')"));
}

#[tokio::test]
async fn test_default_applies_on_insert() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.create_table(&users_table()).await.unwrap();
    db.create_table(&posts_table()).await.unwrap();
    db.execute_batch(
        "INSERT INTO users (email) VALUES ('a@example.com');
         INSERT INTO posts (user_id) VALUES (1);",
    )
    .await
    .unwrap();

    let status = db.query_strings("SELECT status FROM posts").await.unwrap();
    assert_eq!(status, vec!["draft"]);
}

#[tokio::test]
async fn test_foreign_key_enforced() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.create_table(&users_table()).await.unwrap();
    db.create_table(&posts_table()).await.unwrap();

    let err = db
        .execute("INSERT INTO posts (user_id) VALUES (999)")
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::ConstraintViolation(_)), "{err}");
}

#[tokio::test]
async fn test_foreign_keys_introspection() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.create_table(&users_table()).await.unwrap();
    db.create_table(&posts_table()).await.unwrap();

    let fks = db.foreign_keys("posts").await.unwrap();
    assert!(fks.contains(&ForeignKeyInfo {
        column: "user_id".to_string(),
        referenced_table: "users".to_string(),
        referenced_column: "id".to_string(),
    }));
}

#[tokio::test]
async fn test_index_names() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.create_table(&users_table()).await.unwrap();
    db.create_index(&IndexDef::new("ix_users_email", "users").col("email").unique())
        .await
        .unwrap();
    db.create_index(&IndexDef::new("ix_users_id", "users").col("id"))
        .await
        .unwrap();

    assert_eq!(
        db.index_names("users").await.unwrap(),
        vec!["ix_users_email", "ix_users_id"]
    );
}

#[tokio::test]
async fn test_create_existing_table_is_schema_conflict() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch("CREATE TABLE users (id INTEGER)").await.unwrap();

    let err = db.create_table(&users_table()).await.unwrap_err();
    assert!(matches!(err, DbError::SchemaConflict(_)), "{err}");
}

#[tokio::test]
async fn test_drop_table_removes_sequence() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.create_table(&users_table()).await.unwrap();
    assert_eq!(
        db.query_count("SELECT * FROM duckdb_sequences() WHERE sequence_name = 'users_id_seq'")
            .await
            .unwrap(),
        1
    );

    db.drop_table("users").await.unwrap();

    assert!(!db.table_exists("users").await.unwrap());
    assert_eq!(
        db.query_count("SELECT * FROM duckdb_sequences()")
            .await
            .unwrap(),
        0
    );
}

#[tokio::test]
async fn test_drop_missing_table() {
    let db = DuckDbBackend::in_memory().unwrap();
    let err = db.drop_table("ghost").await.unwrap_err();
    assert!(matches!(err, DbError::TableNotFound(_)));
}

#[tokio::test]
async fn test_rollback_discards_ddl() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.begin().await.unwrap();
    db.create_table(&users_table()).await.unwrap();
    db.rollback().await.unwrap();

    assert!(!db.table_exists("users").await.unwrap());
}

#[tokio::test]
async fn test_row_count() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch("CREATE TABLE nums AS SELECT * FROM range(10) t(n)")
        .await
        .unwrap();
    assert_eq!(db.row_count("nums").await.unwrap(), 10);
}

#[tokio::test]
async fn test_file_database_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.duckdb");
    {
        let db = DuckDbBackend::from_path(&path).unwrap();
        db.create_table(&users_table()).await.unwrap();
    }
    let db = DuckDbBackend::new(path.to_str().unwrap()).unwrap();
    assert!(db.table_exists("users").await.unwrap());
}

#[test]
fn test_nextval_sequence() {
    assert_eq!(
        nextval_sequence("nextval('notifications_id_seq')").as_deref(),
        Some("notifications_id_seq")
    );
    assert_eq!(nextval_sequence("'normal'"), None);
    assert_eq!(nextval_sequence("CURRENT_TIMESTAMP"), None);
}
