//! # Edit Descriptions
//!
//! Serializable forms of the structural operations, so a UI collaborator
//! can ship edits over a boundary and replay them against a
//! [`DocumentEditor`](crate::DocumentEditor).
//!
//! ## Semantics
//!
//! Each variant maps one-to-one onto an editor method; applying an edit
//! behaves exactly like the call, including notifications and failure
//! modes. Paths travel in their string form, positions as a bare index or
//! the keywords `"start"` / `"end"`, and locators as either a path string
//! or a `{ path, offset }` map.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use stanza_dom::{Node, Path};

/// Where to insert within a child sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPosition {
    Start,
    End,
    At(usize),
}

impl InsertPosition {
    /// Concrete index into a sequence of length `len`, clamped.
    pub(crate) fn resolve(self, len: usize) -> usize {
        match self {
            InsertPosition::Start => 0,
            InsertPosition::End => len,
            InsertPosition::At(index) => index.min(len),
        }
    }
}

impl From<usize> for InsertPosition {
    fn from(index: usize) -> Self {
        InsertPosition::At(index)
    }
}

impl Serialize for InsertPosition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            InsertPosition::Start => serializer.serialize_str("start"),
            InsertPosition::End => serializer.serialize_str("end"),
            InsertPosition::At(index) => serializer.serialize_u64(*index as u64),
        }
    }
}

impl<'de> Deserialize<'de> for InsertPosition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Index(usize),
            Keyword(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Index(index) => Ok(InsertPosition::At(index)),
            Raw::Keyword(word) => match word.as_str() {
                "start" => Ok(InsertPosition::Start),
                "end" => Ok(InsertPosition::End),
                other => Err(serde::de::Error::custom(format!(
                    "expected \"start\", \"end\" or an index, found \"{other}\""
                ))),
            },
        }
    }
}

/// A character position inside a text node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextLocation {
    pub path: Path,
    pub offset: usize,
}

/// A node address coming in from the selection layer: a plain path, or a
/// (path, character-offset) position inside a text node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Locator {
    Text(TextLocation),
    Node(Path),
}

impl Locator {
    pub fn path(&self) -> &Path {
        match self {
            Locator::Text(location) => &location.path,
            Locator::Node(path) => path,
        }
    }

    pub fn offset(&self) -> Option<usize> {
        match self {
            Locator::Text(location) => Some(location.offset),
            Locator::Node(_) => None,
        }
    }
}

impl From<Path> for Locator {
    fn from(path: Path) -> Self {
        Locator::Node(path)
    }
}

impl From<TextLocation> for Locator {
    fn from(location: TextLocation) -> Self {
        Locator::Text(location)
    }
}

/// Structural edits (intent-preserving operations)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Edit {
    /// Replace the content of a text node
    SetText { path: Path, value: String },

    /// Set an attribute value on a tag node
    SetProperty {
        path: Path,
        name: String,
        value: Value,
    },

    /// Remove a node from its parent sequence
    RemoveNode { path: Path },

    /// Move a node within its current sequence (index is clamped)
    ChangeNodePosition { path: Path, position: usize },

    /// Insert nodes into the ordinal children of a tag node
    AddChildren {
        path: Path,
        position: InsertPosition,
        nodes: Vec<Node>,
    },

    /// Insert nodes into a named slot, creating the slot if absent
    AddSlotChildren {
        path: Path,
        slot: String,
        position: InsertPosition,
        nodes: Vec<Node>,
    },

    /// Divide a node and `ancestor_levels` of its ancestors into two
    /// adjacent sibling branches
    SplitAt {
        locator: Locator,
        ancestor_levels: usize,
    },

    /// Merge a node backward into its preceding sibling, ascending where
    /// none exists
    FuseBack {
        path: Path,
        ancestor_limit: Option<usize>,
    },

    /// Wrap a whole node, or a character range of a text node, in a copy
    /// of `wrap_node`
    WrapWithNode {
        wrap_node: Node,
        start: Locator,
        end: Option<Locator>,
    },

    /// Replace a tag node with its own children, spliced into its former
    /// position
    UnwrapContent { path: Path },
}
