use super::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_parse_minimal_config() {
    let config: Config = serde_yaml::from_str("name: notifications_service").unwrap();
    assert_eq!(config.name, "notifications_service");
    assert_eq!(config.database.dialect, Dialect::DuckDb);
    assert_eq!(config.database.path, ":memory:");
    assert_eq!(config.version_table, "revlane_version");
    assert_eq!(config.capabilities.restore_dropped_tables, None);
    assert!(config.targets.is_empty());
}

#[test]
fn test_parse_full_config() {
    let yaml = r#"
name: notifications_service
database:
  type: sqlite
  path: app.db
version_table: schema_revision
capabilities:
  restore_dropped_tables: false
targets:
  prod:
    database:
      type: duckdb
      path: /var/lib/app/app.duckdb
    capabilities:
      restore_dropped_tables: true
  staging:
    database:
      type: sqlite
      path: staging.db
"#;
    let config: Config = serde_yaml::from_str(yaml).unwrap();
    config.validate().unwrap();
    assert_eq!(config.database.dialect, Dialect::Sqlite);
    assert_eq!(config.version_table, "schema_revision");
    assert_eq!(config.available_targets(), vec!["prod", "staging"]);

    let prod = config.get_database_config(Some("prod")).unwrap();
    assert_eq!(prod.dialect, Dialect::DuckDb);
    assert_eq!(prod.path, "/var/lib/app/app.duckdb");
    assert_eq!(
        config
            .get_capability_overrides(Some("prod"))
            .unwrap()
            .restore_dropped_tables,
        Some(true)
    );

    // staging has no capability section, so the base overrides apply
    assert_eq!(
        config
            .get_capability_overrides(Some("staging"))
            .unwrap()
            .restore_dropped_tables,
        Some(false)
    );
}

#[test]
fn test_target_without_database_falls_back_to_base() {
    let yaml = r#"
name: svc
database:
  type: sqlite
  path: base.db
targets:
  dev: {}
"#;
    let config: Config = serde_yaml::from_str(yaml).unwrap();
    let db = config.get_database_config(Some("dev")).unwrap();
    assert_eq!(db.path, "base.db");
}

#[test]
fn test_unknown_target_lists_available() {
    let yaml = r#"
name: svc
targets:
  dev: {}
  prod: {}
"#;
    let config: Config = serde_yaml::from_str(yaml).unwrap();
    let err = config.get_database_config(Some("qa")).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("[E003]"));
    assert!(msg.contains("dev, prod"));
}

#[test]
fn test_unknown_field_rejected() {
    let result: Result<Config, _> = serde_yaml::from_str("name: svc\nmodel_paths: [models]");
    assert!(result.is_err());
}

#[test]
fn test_unknown_dialect_rejected() {
    let result: Result<Config, _> = serde_yaml::from_str("name: svc\ndatabase:\n  type: oracle");
    assert!(result.is_err());
}

#[test]
fn test_dialect_from_str() {
    assert_eq!("duckdb".parse::<Dialect>().unwrap(), Dialect::DuckDb);
    assert_eq!("SQLite".parse::<Dialect>().unwrap(), Dialect::Sqlite);
    assert!("postgres".parse::<Dialect>().is_err());
    assert_eq!(Dialect::Sqlite.to_string(), "sqlite");
}

#[test]
fn test_validate_rejects_empty_name() {
    let config: Config = serde_yaml::from_str("name: ''").unwrap();
    assert!(matches!(
        config.validate(),
        Err(CoreError::ConfigInvalid { .. })
    ));
}

#[test]
fn test_validate_rejects_bad_version_table() {
    let config: Config =
        serde_yaml::from_str("name: svc\nversion_table: \"v; DROP TABLE users\"").unwrap();
    assert!(config.validate().is_err());
}

#[test]
fn test_load_from_dir() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("revlane.yml"),
        "name: from_disk\ndatabase:\n  type: sqlite\n",
    )
    .unwrap();

    let config = Config::load_from_dir(dir.path()).unwrap();
    assert_eq!(config.name, "from_disk");
    assert_eq!(config.database.dialect, Dialect::Sqlite);
}

#[test]
fn test_load_from_dir_accepts_yaml_extension() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("revlane.yaml"), "name: alt_ext\n").unwrap();
    assert_eq!(Config::load_from_dir(dir.path()).unwrap().name, "alt_ext");
}

#[test]
fn test_load_from_dir_missing() {
    let dir = tempdir().unwrap();
    let err = Config::load_from_dir(dir.path()).unwrap_err();
    assert!(matches!(err, CoreError::ConfigNotFound { .. }));
}

#[test]
fn test_load_parse_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("revlane.yml");
    fs::write(&path, "name: [unterminated").unwrap();
    assert!(matches!(
        Config::load(&path),
        Err(CoreError::ConfigParseError { .. })
    ));
}
