//! Snapshot service
//!
//! Reads and writes a whole tree as JSON. Used to seed a store from a file and
//! to export the current tree; the store itself never touches the disk.

use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;

use crate::application::error_ext::IoResultExt;
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::tree::validate_tree;
use crate::domain::{Directory, Node, NodeRef};
use crate::infrastructure::traits::FileSystem;

/// Service for loading and saving tree snapshots.
pub struct SnapshotService {
    fs: Arc<dyn FileSystem>,
}

impl SnapshotService {
    /// Create a new snapshot service.
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Load a tree; the top-level node must be a directory with unique ids.
    pub fn load(&self, path: &Path) -> ApplicationResult<Directory> {
        debug!("load: path={}", path.display());
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read snapshot", path)?;
        let node = parse_tree(&content).with_path_context("parse snapshot", path)?;

        let root = match node {
            Node::Directory(dir) => dir,
            Node::Cards(deck) => {
                return Err(ApplicationError::validation(
                    "fileType",
                    format!("snapshot root '{}' is a card deck, not a directory", deck.name),
                ))
            }
        };
        validate_tree(&root)?;
        debug!("load: root={} children={}", root.id, root.children.len());
        Ok(root)
    }

    /// Write a tree as pretty JSON.
    ///
    /// Writes to a sibling temp file first and renames it over `path`.
    pub fn save(&self, path: &Path, root: &Directory) -> ApplicationResult<()> {
        debug!("save: path={}", path.display());
        let content = serde_json::to_string_pretty(&NodeRef::Directory(root))
            .with_path_context("serialize snapshot", path)?;

        self.fs
            .ensure_parent(path)
            .with_path_context("create parent directory", path)?;
        let tmp = path.with_extension("json.tmp");
        self.fs
            .write(&tmp, &content)
            .with_path_context("write snapshot", &tmp)?;
        self.fs
            .rename(&tmp, path)
            .with_path_context("replace snapshot", path)?;
        Ok(())
    }
}

/// Parse a snapshot of any depth: no recursion limit, the stack grows on demand.
/// Every directory level costs two JSON nesting levels (object and `children`).
fn parse_tree(content: &str) -> serde_json::Result<Node> {
    let mut de = serde_json::Deserializer::from_str(content);
    de.disable_recursion_limit();
    let node = Node::deserialize(serde_stacker::Deserializer::new(&mut de))?;
    de.end()?;
    Ok(node)
}
