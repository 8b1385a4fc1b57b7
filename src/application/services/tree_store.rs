//! Tree store service
//!
//! Owns the single directory tree and serializes every access to it through
//! one lock. A mutation holds the write lock across its lookup and its change,
//! so no caller ever observes a half-applied insert or delete.

use parking_lot::RwLock;
use tracing::{debug, info, instrument};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::tree::{self, Found};
use crate::domain::{
    sample_tree, CardFile, Directory, DomainError, FileType, Node, NodeId, NodeName, NodeRef,
};

/// Owned result of a lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located {
    pub node: Node,
    /// `None` for the root directory
    pub parent: Option<NodeId>,
}

/// In-memory store for one directory tree.
#[derive(Debug)]
pub struct TreeStore {
    root_id: NodeId,
    root: RwLock<Directory>,
}

impl TreeStore {
    /// Store holding only an empty root directory.
    pub fn new(root_name: NodeName) -> Self {
        let root = Directory::new(root_name);
        Self {
            root_id: root.id,
            root: RwLock::new(root),
        }
    }

    /// Store seeded with an existing tree, rejected if ids are not unique.
    pub fn with_root(root: Directory) -> ApplicationResult<Self> {
        tree::validate_tree(&root)?;
        Ok(Self {
            root_id: root.id,
            root: RwLock::new(root),
        })
    }

    /// Store seeded with the sample tree.
    pub fn seeded(root_name: &str) -> ApplicationResult<Self> {
        Self::with_root(sample_tree(root_name)?)
    }

    /// Id of the root; fixed for the lifetime of the store.
    pub fn root_id(&self) -> NodeId {
        self.root_id
    }

    /// Deep copy of the whole tree.
    #[instrument(level = "debug", skip(self))]
    pub fn get_all(&self) -> Directory {
        self.root.read().clone()
    }

    /// Look up a node and its parent.
    #[instrument(level = "debug", skip(self))]
    pub fn find_by_id(&self, id: NodeId) -> ApplicationResult<Located> {
        let root = self.root.read();
        let Found { node, parent } =
            tree::find_by_id(&root, id).ok_or(DomainError::NotFound(id))?;
        Ok(Located {
            node: node.to_owned_node(),
            parent: parent.map(|p| p.id),
        })
    }

    /// Copy of the card deck with `id`.
    pub fn deck(&self, id: NodeId) -> ApplicationResult<CardFile> {
        let root = self.root.read();
        match tree::find_by_id(&root, id) {
            Some(Found {
                node: NodeRef::Cards(deck),
                ..
            }) => Ok(deck.clone()),
            Some(_) => Err(DomainError::NotADeck(id).into()),
            None => Err(DomainError::NotFound(id).into()),
        }
    }

    /// Create an empty node and append it under `target`.
    ///
    /// A deck target appends to the deck's parent directory instead.
    /// Returns the id of the new node.
    #[instrument(level = "debug", skip(self))]
    pub fn insert(
        &self,
        target: NodeId,
        file_type: FileType,
        name: NodeName,
    ) -> ApplicationResult<NodeId> {
        let node = Node::create(file_type, name);
        let mut root = self.root.write();
        let id = tree::insert_child(&mut root, target, node)?;
        info!("added {} {} under target {}", file_type, id, target);
        Ok(id)
    }

    /// Remove the subtree rooted at `id`.
    ///
    /// The root is rejected before any traversal. An unknown id is a silent
    /// no-op.
    #[instrument(level = "debug", skip(self))]
    pub fn delete(&self, id: NodeId) -> ApplicationResult<()> {
        if id == self.root_id {
            return Err(ApplicationError::Domain(DomainError::CannotRemoveRoot));
        }
        let mut root = self.root.write();
        match tree::remove_descendant(&mut root, id)? {
            Some(removed) => {
                let count = tree::subtree_ids(&removed).len();
                info!("removed {} ({} nodes)", id, count);
            }
            None => debug!("delete: no node with id {}, nothing removed", id),
        }
        Ok(())
    }

    /// Number of nodes in the tree, root included.
    pub fn node_count(&self) -> usize {
        tree::node_ids(&self.root.read()).len()
    }
}
