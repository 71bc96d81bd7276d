//! Tests for configuration loading and database path resolution
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.
//! Tests that manipulate POLIMONEY_DATABASE are marked with #[serial].

use polimoney_common::config::{
    load_toml_config, resolve_database_path, TomlConfig, DATABASE_ENV_VAR,
};
use polimoney_common::Error;
use serial_test::serial;
use std::env;
use std::path::{Path, PathBuf};

fn config_with_path(path: &str) -> TomlConfig {
    TomlConfig {
        database_path: Some(PathBuf::from(path)),
        ..TomlConfig::default()
    }
}

#[test]
#[serial]
fn test_cli_argument_has_highest_priority() {
    env::set_var(DATABASE_ENV_VAR, "/tmp/from-env.db");
    let config = config_with_path("/tmp/from-toml.db");

    let resolved = resolve_database_path(Some(Path::new("/tmp/from-cli.db")), &config).unwrap();
    assert_eq!(resolved, PathBuf::from("/tmp/from-cli.db"));

    env::remove_var(DATABASE_ENV_VAR);
}

#[test]
#[serial]
fn test_env_var_beats_toml() {
    env::set_var(DATABASE_ENV_VAR, "/tmp/from-env.db");
    let config = config_with_path("/tmp/from-toml.db");

    let resolved = resolve_database_path(None, &config).unwrap();
    assert_eq!(resolved, PathBuf::from("/tmp/from-env.db"));

    env::remove_var(DATABASE_ENV_VAR);
}

#[test]
#[serial]
fn test_blank_env_var_is_ignored() {
    env::set_var(DATABASE_ENV_VAR, "   ");
    let config = config_with_path("/tmp/from-toml.db");

    let resolved = resolve_database_path(None, &config).unwrap();
    assert_eq!(resolved, PathBuf::from("/tmp/from-toml.db"));

    env::remove_var(DATABASE_ENV_VAR);
}

#[test]
#[serial]
fn test_missing_destination_is_config_error() {
    env::remove_var(DATABASE_ENV_VAR);

    let result = resolve_database_path(None, &TomlConfig::default());
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn test_load_toml_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
database_path = "/var/lib/polimoney/polimoney.db"

[master]
page_size = 200
batch_size = 100
"#,
    )
    .unwrap();

    let config = load_toml_config(&path).unwrap();
    assert_eq!(
        config.database_path,
        Some(PathBuf::from("/var/lib/polimoney/polimoney.db"))
    );
    assert_eq!(config.master.page_size, 200);
    assert_eq!(config.master.batch_size, 100);
}

#[test]
fn test_load_malformed_toml_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "database_path = [not toml").unwrap();

    assert!(matches!(load_toml_config(&path), Err(Error::Config(_))));
}

#[test]
fn test_load_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_toml_config(&dir.path().join("absent.toml"));
    assert!(matches!(result, Err(Error::Io(_))));
}
