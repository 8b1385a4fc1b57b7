//! Domain entities: directories, card decks and cards

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::name::NodeName;

/// Globally unique node identifier.
pub type NodeId = Uuid;

/// Generate a fresh identifier. Ids are never reused.
pub fn new_id() -> NodeId {
    Uuid::new_v4()
}

/// Kind of node to create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Directory,
    Cards,
}

impl FileType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::Directory => "directory",
            FileType::Cards => "cards",
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "directory" => Ok(FileType::Directory),
            "cards" => Ok(FileType::Cards),
            other => Err(DomainError::InvalidFileType(other.to_string())),
        }
    }
}

/// A front/back pair shown to the user. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: NodeId,
    pub front: String,
    pub back: String,
}

impl Card {
    pub fn new(front: impl Into<String>, back: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            front: front.into(),
            back: back.into(),
        }
    }
}

/// Leaf node holding an ordered deck of cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardFile {
    pub id: NodeId,
    pub name: NodeName,
    pub cards: Vec<Card>,
}

impl CardFile {
    pub fn new(name: NodeName) -> Self {
        Self {
            id: new_id(),
            name,
            cards: Vec::new(),
        }
    }

    pub fn with_cards(mut self, cards: Vec<Card>) -> Self {
        self.cards = cards;
        self
    }
}

/// Container node; `children` order is display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directory {
    pub id: NodeId,
    pub name: NodeName,
    pub children: Vec<Node>,
}

impl Directory {
    pub fn new(name: NodeName) -> Self {
        Self {
            id: new_id(),
            name,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }
}

/// A node of the tree, discriminated on the wire by `fileType`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "fileType", rename_all = "lowercase")]
pub enum Node {
    Directory(Directory),
    Cards(CardFile),
}

impl Node {
    /// Fresh empty node of the requested kind.
    pub fn create(file_type: FileType, name: NodeName) -> Self {
        match file_type {
            FileType::Directory => Node::Directory(Directory::new(name)),
            FileType::Cards => Node::Cards(CardFile::new(name)),
        }
    }

    pub fn id(&self) -> NodeId {
        self.view().id()
    }

    pub fn name(&self) -> &NodeName {
        self.view().name()
    }

    pub fn file_type(&self) -> FileType {
        self.view().file_type()
    }

    pub fn view(&self) -> NodeRef<'_> {
        match self {
            Node::Directory(dir) => NodeRef::Directory(dir),
            Node::Cards(deck) => NodeRef::Cards(deck),
        }
    }
}

impl From<Directory> for Node {
    fn from(dir: Directory) -> Self {
        Node::Directory(dir)
    }
}

impl From<CardFile> for Node {
    fn from(deck: CardFile) -> Self {
        Node::Cards(deck)
    }
}

/// Borrowed view of a node. Serializes exactly like [`Node`], which lets the
/// root directory go over the wire with its `fileType` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "fileType", rename_all = "lowercase")]
pub enum NodeRef<'a> {
    Directory(&'a Directory),
    Cards(&'a CardFile),
}

impl<'a> NodeRef<'a> {
    pub fn id(&self) -> NodeId {
        match self {
            NodeRef::Directory(dir) => dir.id,
            NodeRef::Cards(deck) => deck.id,
        }
    }

    pub fn name(&self) -> &'a NodeName {
        match self {
            NodeRef::Directory(dir) => &dir.name,
            NodeRef::Cards(deck) => &deck.name,
        }
    }

    pub fn file_type(&self) -> FileType {
        match self {
            NodeRef::Directory(_) => FileType::Directory,
            NodeRef::Cards(_) => FileType::Cards,
        }
    }

    /// Deep copy into an owned node.
    pub fn to_owned_node(&self) -> Node {
        match self {
            NodeRef::Directory(dir) => Node::Directory((*dir).clone()),
            NodeRef::Cards(deck) => Node::Cards((*deck).clone()),
        }
    }
}

impl<'a> From<&'a Directory> for NodeRef<'a> {
    fn from(dir: &'a Directory) -> Self {
        NodeRef::Directory(dir)
    }
}
