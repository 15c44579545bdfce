//! Integration tests for configuration loader
//!
//! Tests the end-to-end behavior of loading configuration from files and
//! opening a database from it.

use std::io::Write;

use tempfile::{NamedTempFile, TempDir};
use wiss_infra::config;
use wiss_infra::database::DbManager;

fn write_config(contents: &str, extension: &str) -> (NamedTempFile, std::path::PathBuf) {
    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    temp_file.write_all(contents.as_bytes()).expect("Failed to write to temp file");

    let path = temp_file.path().with_extension(extension);
    std::fs::copy(temp_file.path(), &path).expect("Failed to copy file");
    (temp_file, path)
}

#[test]
fn test_load_config_from_json_file() {
    let json_content = r#"{
        "database": { "path": "/tmp/wiss_integration.db", "pool_size": 6 },
        "listing": { "page_size": 12 },
        "logging": { "level": "wiss_core=debug,info", "json": true }
    }"#;
    let (_temp, path) = write_config(json_content, "json");

    let config = config::load_from_file(Some(path.clone())).expect("config loads");

    assert_eq!(config.database.path, "/tmp/wiss_integration.db");
    assert_eq!(config.database.pool_size, 6);
    assert_eq!(config.listing.page_size, 12);
    assert_eq!(config.logging.level, "wiss_core=debug,info");
    assert!(config.logging.json);

    std::fs::remove_file(path).ok();
}

#[test]
fn test_load_config_from_toml_file_with_defaults() {
    let toml_content = r#"
[database]
path = "/tmp/wiss_integration_toml.db"
"#;
    let (_temp, path) = write_config(toml_content, "toml");

    let config = config::load_from_file(Some(path.clone())).expect("config loads");

    assert_eq!(config.database.path, "/tmp/wiss_integration_toml.db");
    assert_eq!(config.database.pool_size, 4);
    assert_eq!(config.listing.page_size, 10);
    assert_eq!(config.logging.level, "info");
    assert!(!config.logging.json);

    std::fs::remove_file(path).ok();
}

#[test]
fn test_load_config_missing_database_section() {
    let (_temp, path) = write_config(r#"{ "listing": { "page_size": 5 } }"#, "json");

    let result = config::load_from_file(Some(path.clone()));
    assert!(matches!(result, Err(wiss_domain::WissError::Config(_))));

    std::fs::remove_file(path).ok();
}

#[test]
fn test_loaded_config_opens_database() {
    let dir = TempDir::new().expect("temp dir");
    let db_path = dir.path().join("from-config.db");
    let json_content = format!(
        r#"{{ "database": {{ "path": {}, "pool_size": 2 }} }}"#,
        serde_json::to_string(&db_path.to_string_lossy()).expect("path encodes")
    );
    let (_temp, path) = write_config(&json_content, "json");

    let config = config::load_from_file(Some(path.clone())).expect("config loads");
    let manager = DbManager::from_config(&config.database).expect("manager opens");
    manager.run_migrations().expect("migrations run");
    manager.health_check().expect("database answers");

    assert!(db_path.exists());
    std::fs::remove_file(path).ok();
}
