// Tests for config loading and output path validation

use behold_core::config::{
    BeholdConfig, default_asset_paths, install_defaults, validate_output_path,
};
use behold_core::error::ConfigError;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_load_resolves_relative_paths_against_config_dir() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.json");
    fs::write(
        &config_path,
        r#"{
            "sites_json_filepath": "data/sites.json",
            "sites_nsfw_json_filepath": "/abs/nsfw.json",
            "common_encodings": ["utf-8", "latin-1"]
        }"#,
    )
    .unwrap();

    let config = BeholdConfig::load(&config_path).unwrap();
    assert_eq!(config.sites_json_filepath, temp_dir.path().join("data/sites.json"));
    assert_eq!(config.sites_nsfw_json_filepath, PathBuf::from("/abs/nsfw.json"));
    assert_eq!(config.decoder().unwrap().candidates().len(), 2);
}

#[test]
fn test_load_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    let result = BeholdConfig::load(&temp_dir.path().join("nope.json"));
    assert!(matches!(result, Err(ConfigError::Io { .. })));
}

#[test]
fn test_load_malformed_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.json");
    fs::write(&config_path, r#"{ "sites_json_filepath": 5 }"#).unwrap();

    let result = BeholdConfig::load(&config_path);
    assert!(matches!(result, Err(ConfigError::Parse { .. })));
}

#[test]
fn test_load_rejects_unknown_encoding() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.json");
    fs::write(
        &config_path,
        r#"{
            "sites_json_filepath": "sites.json",
            "sites_nsfw_json_filepath": "nsfw.json",
            "common_encodings": ["utf-8", "not-an-encoding"]
        }"#,
    )
    .unwrap();

    let err = BeholdConfig::load(&config_path).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
    assert!(err.to_string().contains("not-an-encoding"));
}

#[test]
fn test_output_path_new_file_is_not_left_behind() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("results.csv");

    validate_output_path(&path).unwrap();
    assert!(!path.exists());
}

#[test]
fn test_output_path_existing_file_is_kept() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("results.csv");
    fs::write(&path, "previous run").unwrap();

    validate_output_path(&path).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "previous run");
}

#[test]
fn test_output_path_in_missing_directory_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("no/such/dir/results.csv");

    assert!(matches!(
        validate_output_path(&path),
        Err(ConfigError::OutputPath { .. })
    ));
}

#[test]
fn test_output_path_that_is_a_directory_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    assert!(matches!(
        validate_output_path(temp_dir.path()),
        Err(ConfigError::OutputPath { .. })
    ));
}

#[test]
fn test_install_defaults_writes_all_assets() {
    let temp_dir = TempDir::new().unwrap();
    let config_dir = temp_dir.path().join("behold");

    let written = install_defaults(&config_dir).unwrap();
    assert_eq!(written, default_asset_paths(&config_dir).to_vec());
    for path in &written {
        assert!(path.exists(), "{} was not written", path.display());
    }

    let config = BeholdConfig::load(&written[0]).unwrap();
    assert_eq!(config.sites_json_filepath, config_dir.join("sites.json"));
}

#[test]
fn test_install_defaults_overwrites() {
    let temp_dir = TempDir::new().unwrap();
    let sites = temp_dir.path().join("sites.json");
    fs::write(&sites, "stale").unwrap();

    install_defaults(temp_dir.path()).unwrap();
    assert_ne!(fs::read_to_string(&sites).unwrap(), "stale");
}
