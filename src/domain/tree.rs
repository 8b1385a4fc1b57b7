//! Structural operations over a directory tree.
//!
//! All traversals are depth-first preorder: a node is visited before its
//! children, and children in display order. Only directories are descended
//! into; card decks are leaves.

use std::collections::HashSet;

use tracing::instrument;

use crate::domain::entities::{Directory, Node, NodeId, NodeRef};
use crate::domain::error::DomainError;

/// Result of a lookup: the node and its parent (`None` for the root).
#[derive(Debug, Clone, Copy)]
pub struct Found<'a> {
    pub node: NodeRef<'a>,
    pub parent: Option<&'a Directory>,
}

/// Find the node with `id`, starting at (and including) `root`.
#[instrument(level = "trace", skip(root))]
pub fn find_by_id(root: &Directory, id: NodeId) -> Option<Found<'_>> {
    if root.id == id {
        return Some(Found {
            node: NodeRef::Directory(root),
            parent: None,
        });
    }
    find_below(root, id)
}

fn find_below(dir: &Directory, id: NodeId) -> Option<Found<'_>> {
    for child in &dir.children {
        if child.id() == id {
            return Some(Found {
                node: child.view(),
                parent: Some(dir),
            });
        }
        if let Node::Directory(sub) = child {
            if let Some(found) = find_below(sub, id) {
                return Some(found);
            }
        }
    }
    None
}

/// Index path from `root` to the node with `id`. The root itself is `[]`.
pub fn locate(root: &Directory, id: NodeId) -> Option<Vec<usize>> {
    if root.id == id {
        return Some(Vec::new());
    }
    let mut path = Vec::new();
    locate_below(root, id, &mut path).then_some(path)
}

fn locate_below(dir: &Directory, id: NodeId, path: &mut Vec<usize>) -> bool {
    for (idx, child) in dir.children.iter().enumerate() {
        path.push(idx);
        if child.id() == id {
            return true;
        }
        if let Node::Directory(sub) = child {
            if locate_below(sub, id, path) {
                return true;
            }
        }
        path.pop();
    }
    false
}

/// Follow an index path; every step must land on a directory.
pub fn directory_at_mut<'a>(root: &'a mut Directory, path: &[usize]) -> Option<&'a mut Directory> {
    let mut current = root;
    for &idx in path {
        current = match current.children.get_mut(idx)? {
            Node::Directory(sub) => sub,
            Node::Cards(_) => return None,
        };
    }
    Some(current)
}

/// Path of the directory that receives a node added "into" `target`.
///
/// A directory target receives the node itself. A card deck cannot hold
/// children, so its parent directory receives the node instead.
pub fn insertion_path(root: &Directory, target: NodeId) -> Result<Vec<usize>, DomainError> {
    let mut path = locate(root, target).ok_or(DomainError::NotFound(target))?;
    if let Some(NodeRef::Cards(_)) = node_at(root, &path) {
        path.pop();
    }
    Ok(path)
}

/// Follow an index path without searching; `None` if it leads nowhere.
pub fn node_at<'a>(root: &'a Directory, path: &[usize]) -> Option<NodeRef<'a>> {
    let mut current = NodeRef::Directory(root);
    for &idx in path {
        current = match current {
            NodeRef::Directory(dir) => dir.children.get(idx)?.view(),
            NodeRef::Cards(_) => return None,
        };
    }
    Some(current)
}

/// Append `node` as the last child of the directory chosen for `target`.
/// On error the tree is untouched.
#[instrument(level = "debug", skip(root, node), fields(new_id = %node.id()))]
pub fn insert_child(root: &mut Directory, target: NodeId, node: Node) -> Result<NodeId, DomainError> {
    let path = insertion_path(root, target)?;
    let dir = directory_at_mut(root, &path).ok_or(DomainError::NotFound(target))?;
    let id = node.id();
    dir.children.push(node);
    Ok(id)
}

/// Detach the subtree rooted at `id` from its parent and return it.
///
/// The root can never be removed. An id that is nowhere below the root yields
/// `Ok(None)`.
#[instrument(level = "debug", skip(root))]
pub fn remove_descendant(root: &mut Directory, id: NodeId) -> Result<Option<Node>, DomainError> {
    if root.id == id {
        return Err(DomainError::CannotRemoveRoot);
    }
    Ok(excise(root, id))
}

fn excise(dir: &mut Directory, id: NodeId) -> Option<Node> {
    for idx in 0..dir.children.len() {
        if dir.children[idx].id() == id {
            return Some(dir.children.remove(idx));
        }
        if let Node::Directory(sub) = &mut dir.children[idx] {
            if let Some(removed) = excise(sub, id) {
                return Some(removed);
            }
        }
    }
    None
}

/// Visit every node in preorder together with its parent and depth.
pub fn walk<'a, F>(root: &'a Directory, visit: &mut F)
where
    F: FnMut(NodeRef<'a>, Option<&'a Directory>, usize),
{
    visit(NodeRef::Directory(root), None, 0);
    walk_children(root, 1, visit);
}

fn walk_children<'a, F>(dir: &'a Directory, depth: usize, visit: &mut F)
where
    F: FnMut(NodeRef<'a>, Option<&'a Directory>, usize),
{
    for child in &dir.children {
        visit(child.view(), Some(dir), depth);
        match child {
            Node::Directory(sub) => walk_children(sub, depth + 1, visit),
            Node::Cards(_) => {}
        }
    }
}

/// Ids of all nodes in preorder, root first. Card ids are not included.
pub fn node_ids(root: &Directory) -> Vec<NodeId> {
    let mut ids = Vec::new();
    walk(root, &mut |node, _, _| ids.push(node.id()));
    ids
}

/// Ids of the node and all its descendants.
pub fn subtree_ids(node: &Node) -> Vec<NodeId> {
    match node {
        Node::Directory(dir) => node_ids(dir),
        Node::Cards(deck) => vec![deck.id],
    }
}

/// Check that every id (nodes and cards) occurs once.
///
/// Names are already guaranteed by [`NodeName`](crate::domain::NodeName).
pub fn validate_tree(root: &Directory) -> Result<(), DomainError> {
    let mut seen = HashSet::new();
    let mut duplicate = None;
    walk(root, &mut |node, _, _| {
        if duplicate.is_some() {
            return;
        }
        if !seen.insert(node.id()) {
            duplicate = Some(node.id());
            return;
        }
        if let NodeRef::Cards(deck) = node {
            if let Some(card) = deck.cards.iter().find(|card| !seen.insert(card.id)) {
                duplicate = Some(card.id);
            }
        }
    });
    match duplicate {
        Some(id) => Err(DomainError::DuplicateId(id)),
        None => Ok(()),
    }
}
