//! The two-variant node model.
//!
//! A [`Node`] is either a text leaf or a named tag node carrying ordinal
//! children, a string-keyed attribute map, and named slots (independently
//! addressable child sequences). Tag names never start with `#`; that
//! marker is reserved for the text variant's wire name.

use std::collections::BTreeMap;

use serde_json::Value;

/// Reserved wire name of the text variant.
pub const TEXT_MARKER: &str = "#t";

/// Unit of the document tree.
///
/// Deep copy is `Clone`: the derived implementation produces a
/// value-identical, reference-independent tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Text {
        content: String,
    },
    Tag {
        name: String,
        children: Vec<Node>,
        attributes: BTreeMap<String, Value>,
        slots: BTreeMap<String, Vec<Node>>,
    },
}

impl Node {
    pub fn text(content: impl Into<String>) -> Self {
        Node::Text {
            content: content.into(),
        }
    }

    pub fn tag(name: impl Into<String>) -> Self {
        Node::Tag {
            name: name.into(),
            children: Vec::new(),
            attributes: BTreeMap::new(),
            slots: BTreeMap::new(),
        }
    }

    pub fn with_child(mut self, child: Node) -> Self {
        if let Node::Tag { children, .. } = &mut self {
            children.push(child);
        }
        self
    }

    pub fn with_children(mut self, new_children: Vec<Node>) -> Self {
        if let Node::Tag { children, .. } = &mut self {
            children.extend(new_children);
        }
        self
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        if let Node::Tag { attributes, .. } = &mut self {
            attributes.insert(key.into(), value.into());
        }
        self
    }

    pub fn with_slot(mut self, name: impl Into<String>, nodes: Vec<Node>) -> Self {
        if let Node::Tag { slots, .. } = &mut self {
            slots.insert(name.into(), nodes);
        }
        self
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Node::Text { .. })
    }

    pub fn is_tag(&self) -> bool {
        matches!(self, Node::Tag { .. })
    }

    /// The name as it appears on the wire: the tag name, or `#t` for text.
    pub fn wire_name(&self) -> &str {
        match self {
            Node::Text { .. } => TEXT_MARKER,
            Node::Tag { name, .. } => name,
        }
    }

    /// Tag name; `None` for text nodes, whose marker is fixed.
    pub fn name(&self) -> Option<&str> {
        match self {
            Node::Text { .. } => None,
            Node::Tag { name, .. } => Some(name),
        }
    }

    pub fn set_name(&mut self, new_name: impl Into<String>) {
        if let Node::Tag { name, .. } = self {
            *name = new_name.into();
        }
    }

    /// Text content; empty for tag nodes.
    pub fn content(&self) -> &str {
        match self {
            Node::Text { content } => content,
            Node::Tag { .. } => "",
        }
    }

    pub fn set_content(&mut self, new_content: impl Into<String>) {
        if let Node::Text { content } = self {
            *content = new_content.into();
        }
    }

    /// Ordinal children; empty for text nodes.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Text { .. } => &[],
            Node::Tag { children, .. } => children,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Text { .. } => None,
            Node::Tag { children, .. } => Some(children),
        }
    }

    pub fn attribute(&self, key: &str) -> Option<&Value> {
        match self {
            Node::Text { .. } => None,
            Node::Tag { attributes, .. } => attributes.get(key),
        }
    }

    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        if let Node::Tag { attributes, .. } = self {
            attributes.insert(key.into(), value.into());
        }
    }

    pub fn slot(&self, name: &str) -> Option<&[Node]> {
        match self {
            Node::Text { .. } => None,
            Node::Tag { slots, .. } => slots.get(name).map(Vec::as_slice),
        }
    }

    pub fn slot_mut(&mut self, name: &str) -> Option<&mut Vec<Node>> {
        match self {
            Node::Text { .. } => None,
            Node::Tag { slots, .. } => slots.get_mut(name),
        }
    }

    pub fn slots(&self) -> Option<&BTreeMap<String, Vec<Node>>> {
        match self {
            Node::Text { .. } => None,
            Node::Tag { slots, .. } => Some(slots),
        }
    }
}

/// Merges every run of consecutive text nodes into one by concatenation.
///
/// Tag nodes act as barriers and keep their relative order. Total text
/// content is preserved. Fuse and unwrap are the only operations that can
/// introduce adjacent text siblings, and both call this before returning.
pub fn normalize_text_runs(nodes: &mut Vec<Node>) {
    let mut index = 0;
    while index + 1 < nodes.len() {
        let adjacent_text = nodes[index].is_text() && nodes[index + 1].is_text();
        if !adjacent_text {
            index += 1;
            continue;
        }
        if let Node::Text { content: absorbed } = nodes.remove(index + 1) {
            if let Node::Text { content } = &mut nodes[index] {
                content.push_str(&absorbed);
            }
        }
    }
}
