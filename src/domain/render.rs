//! Terminal rendering of a directory tree via `termtree`.

use termtree::Tree;
use tracing::instrument;

use crate::domain::entities::{Directory, Node, NodeRef};

/// Convert a node into a printable `termtree::Tree`.
pub trait TreeDisplay {
    fn to_tree_string(&self, show_ids: bool) -> Tree<String>;
}

fn label(node: NodeRef<'_>, show_ids: bool) -> String {
    let mut label = match node {
        NodeRef::Directory(dir) => format!("{}/", dir.name),
        NodeRef::Cards(deck) => {
            let count = deck.cards.len();
            let noun = if count == 1 { "card" } else { "cards" };
            format!("{} ({} {})", deck.name, count, noun)
        }
    };
    if show_ids {
        label.push_str(&format!(" [{}]", node.id()));
    }
    label
}

impl TreeDisplay for Directory {
    #[instrument(level = "trace", skip(self))]
    fn to_tree_string(&self, show_ids: bool) -> Tree<String> {
        let leaves: Vec<_> = self
            .children
            .iter()
            .map(|c| c.to_tree_string(show_ids))
            .collect();

        Tree::new(label(NodeRef::Directory(self), show_ids)).with_leaves(leaves)
    }
}

impl TreeDisplay for Node {
    fn to_tree_string(&self, show_ids: bool) -> Tree<String> {
        match self {
            Node::Directory(dir) => dir.to_tree_string(show_ids),
            Node::Cards(_) => Tree::new(label(self.view(), show_ids)),
        }
    }
}
