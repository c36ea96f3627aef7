//! Root folder resolution and config file handling
//!
//! Tests that manipulate MFG_ROOT_FOLDER are marked #[serial] so they never
//! race each other on the process environment.

use mfg_common::config::{
    database_path, default_root_folder, ensure_root_folder, RootFolderResolver, Service,
    TomlConfig, ROOT_FOLDER_ENV,
};
use serial_test::serial;
use std::env;
use std::path::PathBuf;

fn config_with_root(root: &str) -> TomlConfig {
    TomlConfig::parse(&format!("root_folder = \"{}\"", root)).unwrap()
}

#[test]
#[serial]
fn test_resolver_with_no_overrides_uses_default() {
    env::remove_var(ROOT_FOLDER_ENV);

    let root = RootFolderResolver::new().resolve();
    assert_eq!(root, default_root_folder());
    assert!(!root.as_os_str().is_empty());
}

#[test]
#[serial]
fn test_cli_argument_wins() {
    env::set_var(ROOT_FOLDER_ENV, "/tmp/mfg-env");

    let root = RootFolderResolver::new()
        .with_cli_arg(Some(PathBuf::from("/tmp/mfg-cli")))
        .with_config(Some(config_with_root("/tmp/mfg-toml")))
        .resolve();
    assert_eq!(root, PathBuf::from("/tmp/mfg-cli"));

    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn test_env_var_beats_config_file() {
    env::set_var(ROOT_FOLDER_ENV, "/tmp/mfg-env");

    let root = RootFolderResolver::new()
        .with_config(Some(config_with_root("/tmp/mfg-toml")))
        .resolve();
    assert_eq!(root, PathBuf::from("/tmp/mfg-env"));

    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn test_blank_env_var_is_ignored() {
    env::set_var(ROOT_FOLDER_ENV, "  ");

    let root = RootFolderResolver::new()
        .with_config(Some(config_with_root("/tmp/mfg-toml")))
        .resolve();
    assert_eq!(root, PathBuf::from("/tmp/mfg-toml"));

    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
fn test_service_ports_are_distinct() {
    let config = TomlConfig::default();
    let ports = [
        config.service(Service::Purchasing).port,
        config.service(Service::Quality).port,
        config.service(Service::Resources).port,
    ];
    assert_eq!(ports, [5741, 5742, 5743]);
}

#[tokio::test]
async fn test_database_created_in_new_root_folder() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("nested").join("mfg");

    ensure_root_folder(&root).unwrap();
    let db_path = database_path(&root);
    let pool = mfg_common::db::init_database(&db_path).await.unwrap();
    assert!(db_path.exists());

    let version = mfg_common::db::migrations::get_schema_version(&pool).await.unwrap();
    assert_eq!(version, mfg_common::db::migrations::CURRENT_SCHEMA_VERSION);
    pool.close().await;

    // reopening an existing database is a no-op
    let pool = mfg_common::db::init_database(&db_path).await.unwrap();
    pool.close().await;
}
