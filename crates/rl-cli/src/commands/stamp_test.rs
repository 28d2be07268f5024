use super::*;
use rl_db::{DatabaseCore, DatabaseSchema, SqliteBackend};
use std::fs;
use tempfile::tempdir;

#[tokio::test]
async fn test_stamp_records_without_running() {
    let temp_dir = tempdir().unwrap();
    let project_path = temp_dir.path();

    let config_content = r#"
name: test_project
database:
  type: sqlite
  path: app.db
version_table: schema_revision
"#;
    fs::write(project_path.join("revlane.yml"), config_content).unwrap();

    let args = StampArgs {
        revision: "head".to_string(),
    };
    let global = GlobalArgs {
        verbose: false,
        project_dir: project_path.display().to_string(),
        config: None,
        target: None,
        database: None,
    };
    execute(&args, &global).await.unwrap();

    let db = SqliteBackend::from_path(&project_path.join("app.db")).unwrap();
    assert!(!db.table_exists("users").await.unwrap());
    assert_eq!(
        db.query_strings("SELECT version_num FROM schema_revision")
            .await
            .unwrap(),
        vec!["e5a09c3d7b18"]
    );
}
