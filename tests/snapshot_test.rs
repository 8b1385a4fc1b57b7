//! Tests for SnapshotService

use std::fs;
use std::sync::Arc;

use tempfile::TempDir;

use cardtree::application::services::{SnapshotService, TreeStore};
use cardtree::application::ApplicationError;
use cardtree::domain::tree::walk;
use cardtree::domain::{DomainError, FileType, NodeName};
use cardtree::infrastructure::traits::RealFileSystem;

fn service() -> SnapshotService {
    SnapshotService::new(Arc::new(RealFileSystem))
}

#[test]
fn given_edited_tree_when_saving_and_loading_then_tree_is_identical() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("nested/tree.json");
    let store = TreeStore::seeded("root").unwrap();
    store
        .insert(store.root_id(), FileType::Cards, NodeName::parse("Go").unwrap())
        .unwrap();
    let tree = store.get_all();

    // Act
    service().save(&path, &tree).unwrap();
    let loaded = service().load(&path).unwrap();

    // Assert
    assert_eq!(loaded, tree);
    assert!(!path.with_extension("json.tmp").exists(), "temp file left behind");
}

#[test]
fn given_saved_tree_when_reading_json_then_uses_file_type_tags() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("tree.json");
    let store = TreeStore::seeded("root").unwrap();

    service().save(&path, &store.get_all()).unwrap();

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["fileType"], "directory");
    assert_eq!(json["name"], "root");
    assert_eq!(json["children"][1]["fileType"], "cards");
    assert_eq!(json["children"][1]["name"], "Kochen");
    assert!(json["children"][1]["cards"][0]["front"].is_string());
}

#[test]
fn given_deck_at_top_level_when_loading_then_rejected() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("deck.json");
    fs::write(
        &path,
        r#"{"fileType":"cards","id":"6f1c2b9e-2f7a-4d55-9a53-0d5b0c8f0a11","name":"Kochen","cards":[]}"#,
    )
    .unwrap();

    let err = service().load(&path).unwrap_err();

    assert!(matches!(err, ApplicationError::Validation { ref field, .. } if field == "fileType"));
}

#[test]
fn given_duplicate_ids_when_loading_then_rejected() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("dup.json");
    let id = "6f1c2b9e-2f7a-4d55-9a53-0d5b0c8f0a11";
    fs::write(
        &path,
        format!(
            r#"{{"fileType":"directory","id":"{id}","name":"root","children":[
                {{"fileType":"cards","id":"{id}","name":"Kochen","cards":[]}}
            ]}}"#
        ),
    )
    .unwrap();

    let err = service().load(&path).unwrap_err();

    assert!(matches!(err, ApplicationError::Domain(DomainError::DuplicateId(_))));
}

#[test]
fn given_invalid_name_in_file_when_loading_then_fails() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("bad.json");
    fs::write(
        &path,
        r#"{"fileType":"directory","id":"6f1c2b9e-2f7a-4d55-9a53-0d5b0c8f0a11","name":"bad/name!","children":[]}"#,
    )
    .unwrap();

    assert!(service().load(&path).is_err());
}

#[test]
fn given_missing_file_when_loading_then_error_names_path() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("missing.json");

    let err = service().load(&path).unwrap_err();

    assert!(err.to_string().contains("missing.json"), "{err}");
}

#[test]
fn given_deeply_nested_directories_when_saving_and_loading_then_tree_is_identical() {
    // Arrange: 100 directories in a chain, well past 64 levels of nesting
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("deep.json");
    let store = TreeStore::new(NodeName::parse("root").unwrap());
    let mut target = store.root_id();
    for i in 0..100 {
        target = store
            .insert(target, FileType::Directory, NodeName::parse(format!("d{i}")).unwrap())
            .unwrap();
    }
    store
        .insert(target, FileType::Cards, NodeName::parse("Bottom").unwrap())
        .unwrap();
    let tree = store.get_all();

    // Act
    service().save(&path, &tree).unwrap();
    let loaded = service().load(&path).unwrap();

    // Assert
    assert_eq!(loaded, tree);
    let mut max_depth = 0;
    walk(&loaded, &mut |_, _, depth| max_depth = max_depth.max(depth));
    assert_eq!(max_depth, 101);
}

#[test]
fn given_malformed_json_when_loading_then_error_says_why() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("broken.json");
    fs::write(&path, r#"{"fileType":"directory","id":"#).unwrap();

    let err = service().load(&path).unwrap_err();

    let message = err.to_string();
    assert!(message.contains("broken.json"), "{message}");
    assert!(message.contains("line 1"), "{message}");
}

#[test]
fn given_trailing_content_when_loading_then_rejected() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("trailing.json");
    fs::write(
        &path,
        r#"{"fileType":"directory","id":"6f1c2b9e-2f7a-4d55-9a53-0d5b0c8f0a11","name":"root","children":[]} extra"#,
    )
    .unwrap();

    assert!(service().load(&path).is_err());
}
