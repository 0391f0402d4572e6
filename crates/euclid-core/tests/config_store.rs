use std::fs;

use tempfile::TempDir;

use euclid_core::config::{CURRENT_SCHEMA_VERSION, Config, ConfigStore, DEFAULT_REMOTE_MANIFEST_URL};
use euclid_core::error::SyncError;
use euclid_core::version::ComponentVersion;

fn store_in(temp: &TempDir) -> ConfigStore {
    ConfigStore::new(temp.path().join("config"))
}

#[test]
fn load_missing_creates_and_persists_defaults() {
    let temp = TempDir::new().unwrap();
    let store = store_in(&temp);

    let config = store.load().unwrap();

    assert_eq!(config.schema_version, CURRENT_SCHEMA_VERSION);
    assert_eq!(config.remote_manifest_url, DEFAULT_REMOTE_MANIFEST_URL);
    assert!(config.component_versions.is_empty());
    assert!(!config.installed);
    assert!(store.config_path().exists(), "defaults should be written");
}

#[test]
fn first_run_uses_custom_defaults() {
    let temp = TempDir::new().unwrap();
    let install_root = temp.path().join(".minecraft");
    let store = store_in(&temp)
        .with_defaults(Config::new().with_install_root(Some(install_root.clone())));

    let config = store.load().unwrap();

    assert_eq!(config.install_root, Some(install_root));
}

#[test]
fn save_then_load_roundtrip() {
    let temp = TempDir::new().unwrap();
    let store = store_in(&temp);

    let mut config = Config::new().with_install_root(Some(temp.path().join("game")));
    config.record_installed("core", ComponentVersion::from(2u64));
    config.record_installed("shaders", ComponentVersion::parse("1.4.0").unwrap());
    config.installed = true;

    store.save(&config).unwrap();
    let loaded = store.load().unwrap();

    assert_eq!(loaded, config);
}

#[test]
fn save_leaves_no_temp_files_behind() {
    let temp = TempDir::new().unwrap();
    let store = store_in(&temp);

    store.save(&Config::new()).unwrap();
    store.save(&Config::new()).unwrap();

    let names: Vec<_> = fs::read_dir(temp.path().join("config"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(names, ["euclid.toml"]);
}

#[test]
fn corrupt_config_is_reported_and_left_in_place() {
    let temp = TempDir::new().unwrap();
    let store = store_in(&temp);
    fs::create_dir_all(temp.path().join("config")).unwrap();
    fs::write(store.config_path(), "component_versions = {{{").unwrap();

    let err = store.load().unwrap_err();

    assert!(matches!(err, SyncError::ConfigCorrupt { .. }), "{err}");
    assert_eq!(
        fs::read_to_string(store.config_path()).unwrap(),
        "component_versions = {{{"
    );
}

#[test]
fn unsupported_schema_version_is_corrupt() {
    let temp = TempDir::new().unwrap();
    let store = store_in(&temp);
    fs::create_dir_all(temp.path().join("config")).unwrap();
    fs::write(store.config_path(), "schema_version = 99\n").unwrap();

    let err = store.load().unwrap_err();

    assert!(
        matches!(err, SyncError::ConfigCorrupt { ref message, .. } if message.contains("schema_version"))
    );
}

#[test]
fn reset_keeps_backup_and_writes_defaults() {
    let temp = TempDir::new().unwrap();
    let store = store_in(&temp);
    fs::create_dir_all(temp.path().join("config")).unwrap();
    fs::write(store.config_path(), "not = [valid").unwrap();

    let config = store.reset().unwrap();

    assert_eq!(config, Config::new());
    assert_eq!(
        fs::read_to_string(store.backup_path()).unwrap(),
        "not = [valid"
    );
    assert_eq!(store.load().unwrap(), Config::new());
}

#[test]
fn save_into_unwritable_location_is_persist_error() {
    let temp = TempDir::new().unwrap();
    // A regular file where the config directory should be.
    let blocker = temp.path().join("config");
    fs::write(&blocker, "file").unwrap();
    let store = ConfigStore::new(blocker);

    let err = store.save(&Config::new()).unwrap_err();

    assert!(matches!(err, SyncError::Persist { .. }), "{err}");
}
