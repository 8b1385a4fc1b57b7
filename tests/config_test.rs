//! Integration tests for Settings loading from an explicit config file.
//!
//! Precedence: defaults → config file → CARDTREE_* env vars → CLI flags.
//! These tests only use temp files; the global config is bypassed by `--config`.

use std::fs;
use std::sync::Arc;

use tempfile::TempDir;

use cardtree::application::services::SnapshotService;
use cardtree::application::ApplicationError;
use cardtree::config::{SeedMode, Settings};
use cardtree::infrastructure::di::ServiceContainer;
use cardtree::infrastructure::traits::RealFileSystem;

#[test]
fn given_config_file_when_load_then_overrides_defaults() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("cardtree.toml");
    fs::write(
        &path,
        r#"
root_name = "Karteikarten"
seed = "empty"
show_ids = true
"#,
    )
    .unwrap();

    // Act
    let settings = Settings::load(Some(&path)).expect("load settings");

    // Assert
    assert_eq!(settings.root_name, "Karteikarten");
    assert_eq!(settings.seed, SeedMode::Empty);
    assert!(settings.show_ids);
    assert!(settings.seed_file.is_none());
}

#[test]
fn given_partial_config_when_load_then_keeps_remaining_defaults() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("cardtree.toml");
    fs::write(&path, "show_ids = true\n").unwrap();

    let settings = Settings::load(Some(&path)).unwrap();

    assert_eq!(settings.root_name, "root");
    assert_eq!(settings.seed, SeedMode::Sample);
    assert!(settings.show_ids);
}

#[test]
fn given_missing_explicit_config_when_load_then_config_error() {
    let temp = TempDir::new().unwrap();

    let err = Settings::load(Some(&temp.path().join("nope.toml"))).unwrap_err();

    assert!(matches!(err, ApplicationError::Config { .. }));
}

#[test]
fn given_malformed_config_when_load_then_config_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("cardtree.toml");
    fs::write(&path, "seed = \"everything\"\n").unwrap();

    let err = Settings::load(Some(&path)).unwrap_err();

    assert!(matches!(err, ApplicationError::Config { .. }));
}

#[test]
fn given_empty_seed_when_building_container_then_store_has_only_root() {
    let settings = Settings {
        root_name: "Karten".into(),
        seed: SeedMode::Empty,
        ..Settings::default()
    };

    let container = ServiceContainer::new(settings).unwrap();

    let root = container.store.get_all();
    assert_eq!(root.name.as_str(), "Karten");
    assert!(root.children.is_empty());
}

#[test]
fn given_invalid_root_name_when_building_container_then_rejected() {
    let settings = Settings {
        root_name: "root/..".into(),
        seed: SeedMode::Empty,
        ..Settings::default()
    };

    assert!(ServiceContainer::new(settings).is_err());
}

#[test]
fn given_seed_file_in_config_when_building_container_then_tree_is_loaded() {
    // Arrange: export a sample tree, then point the config at it
    let temp = TempDir::new().unwrap();
    let snapshot = temp.path().join("tree.json");
    let seeded = ServiceContainer::new(Settings::default()).unwrap();
    let expected = seeded.store.get_all();
    SnapshotService::new(Arc::new(RealFileSystem))
        .save(&snapshot, &expected)
        .unwrap();

    let config = temp.path().join("cardtree.toml");
    fs::write(&config, format!("seed_file = {:?}\n", snapshot.display().to_string())).unwrap();

    // Act
    let settings = Settings::load(Some(&config)).unwrap();
    let container = ServiceContainer::new(settings).unwrap();

    // Assert: same ids, same structure
    assert_eq!(container.store.get_all(), expected);
    assert_eq!(container.store.root_id(), expected.id);
}
