//! Tests for configuration loading and graceful degradation
//!
//! Covers:
//! - Missing TOML file → warning + defaults
//! - Malformed TOML file → Config error
//! - Config path resolution priority (explicit → IPREP_CONFIG → platform dir)
//! - Effective value priority (override → TOML → default)
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.
//! Tests that manipulate IPREP_CONFIG are marked with #[serial].

use iprep_common::config::{
    resolve_config_path, ConfigOverrides, ServiceConfig, TomlConfig, CONFIG_ENV_VAR,
    DEFAULT_EDIT_KEY, DEFAULT_PORT,
};
use iprep_common::Error;
use serial_test::serial;
use std::env;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

#[test]
fn test_missing_file_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("absent.toml");

    let config = TomlConfig::load_or_default(Some(&path)).unwrap();
    assert_eq!(config, TomlConfig::default());
}

#[test]
fn test_no_path_uses_defaults() {
    let config = TomlConfig::load_or_default(None).unwrap();
    assert_eq!(config, TomlConfig::default());
}

#[test]
fn test_malformed_file_is_config_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(&path, "port = [not toml").unwrap();

    let result = TomlConfig::load_or_default(Some(&path));
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn test_file_values_flow_into_service_config() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
port = 8088
edit_key = "from-file"
seed_csv = "problems.csv"

[ingest.tag_aliases]
"Dynamic Programming" = "DP"
"Depth-First Search" = "DFS"
"#,
    )
    .unwrap();

    let toml = TomlConfig::load_or_default(Some(&path)).unwrap();
    let config = ServiceConfig::resolve(ConfigOverrides::default(), toml);

    assert_eq!(config.port, 8088);
    assert_eq!(config.bind, "127.0.0.1");
    assert_eq!(config.edit_key, "from-file");
    assert_eq!(config.seed_csv, Some(PathBuf::from("problems.csv")));
    assert_eq!(config.normalize_rules.tag_aliases.len(), 2);
}

#[test]
fn test_overrides_beat_file_values() {
    let toml = TomlConfig {
        port: Some(8088),
        edit_key: Some("from-file".to_string()),
        ..Default::default()
    };
    let overrides = ConfigOverrides {
        port: Some(9099),
        edit_key: Some("from-env".to_string()),
        log_level: Some("debug".to_string()),
        ..Default::default()
    };

    let config = ServiceConfig::resolve(overrides, toml);
    assert_eq!(config.port, 9099);
    assert_eq!(config.edit_key, "from-env");
    assert_eq!(config.log_level, "debug");
}

#[test]
fn test_compiled_defaults() {
    let config = ServiceConfig::default();
    assert_eq!(config.port, DEFAULT_PORT);
    assert_eq!(config.edit_key, DEFAULT_EDIT_KEY);
    assert!(config.seed_csv.is_none());
}

#[test]
#[serial]
fn test_explicit_path_beats_env_var() {
    env::set_var(CONFIG_ENV_VAR, "/tmp/iprep-from-env.toml");

    let resolved = resolve_config_path(Some(Path::new("/tmp/iprep-explicit.toml")));
    assert_eq!(resolved, Some(PathBuf::from("/tmp/iprep-explicit.toml")));

    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_env_var_used_without_explicit_path() {
    env::set_var(CONFIG_ENV_VAR, "/tmp/iprep-from-env.toml");

    let resolved = resolve_config_path(None);
    assert_eq!(resolved, Some(PathBuf::from("/tmp/iprep-from-env.toml")));

    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_blank_env_var_is_ignored() {
    env::set_var(CONFIG_ENV_VAR, "  ");

    let resolved = resolve_config_path(None);
    assert_ne!(resolved, Some(PathBuf::from("  ")));

    env::remove_var(CONFIG_ENV_VAR);
}
