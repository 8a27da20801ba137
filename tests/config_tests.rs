//! Tests for installation config files
//!
//! These tests verify:
//! - A saved config loads back identically
//! - Partial files fall back to defaults
//! - Enum fields use their lowercase names on disk

use gentoo_installer::config::{DEFAULT_PACKAGES, InstallConfig};
use gentoo_installer::tools::disk::{Filesystem, PartitionTable};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_empty_object_is_default_config() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("install.json");
    fs::write(&path, "{}").unwrap();

    let config = InstallConfig::load_from_file(&path).unwrap();
    assert_eq!(config, InstallConfig::default());
    assert_eq!(config.packages.len(), DEFAULT_PACKAGES.len());
}

#[test]
fn test_enum_fields_are_lowercase_on_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("install.json");
    let config = InstallConfig {
        partition_table: PartitionTable::Msdos,
        filesystem: Filesystem::Xfs,
        ..Default::default()
    };
    config.save_to_file(&path).unwrap();

    let json = fs::read_to_string(&path).unwrap();
    assert!(json.contains(r#""partition_table": "msdos""#));
    assert!(json.contains(r#""filesystem": "xfs""#));

    let loaded = InstallConfig::load_from_file(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_unknown_filesystem_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("install.json");
    fs::write(&path, r#"{ "filesystem": "ntfs" }"#).unwrap();

    let err = InstallConfig::load_from_file(&path).unwrap_err();
    assert!(format!("{:#}", err).contains("parse"));
}

#[test]
fn test_loaded_config_still_needs_validation() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("install.json");
    fs::write(&path, r#"{ "username": "root" }"#).unwrap();

    let config = InstallConfig::load_from_file(&path).unwrap();
    assert!(config.validate().is_err());
}

#[test]
fn test_padded_username_from_file_is_refused() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("install.json");
    fs::write(&path, r#"{ "username": " user ", "hostname": "gentoo " }"#).unwrap();

    let config = InstallConfig::load_from_file(&path).unwrap();
    assert_eq!(config.username, " user ");
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("whitespace"));
}
