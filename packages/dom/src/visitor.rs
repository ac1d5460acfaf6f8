//! Fold-style visitor over a node tree.
//!
//! [`NodeVisitor`] is a recursive fold producing one derived value per
//! node, primarily for a renderer to consume. The provided walks compute
//! each child's path as it is visited, so the fold can attach "rendered
//! from path P" metadata without a separate bookkeeping pass. There is no
//! memoization; every call re-walks the subtree, and caching is the
//! caller's concern.

use std::collections::BTreeMap;

use crate::node::Node;
use crate::path::Path;

pub trait NodeVisitor {
    type Output;

    /// Dispatches on the node variant. `path` is the node's address
    /// relative to whatever root the fold started from.
    fn visit(&mut self, node: &Node, path: &Path) -> Self::Output {
        match node {
            Node::Text { content } => self.visit_text(content, path),
            Node::Tag { .. } => self.visit_tag(node, path),
        }
    }

    fn visit_text(&mut self, content: &str, path: &Path) -> Self::Output;

    /// Handles a tag node. Implementations typically fold the node's
    /// contents via [`visit_children`](Self::visit_children) and
    /// [`visit_slots`](Self::visit_slots).
    fn visit_tag(&mut self, node: &Node, path: &Path) -> Self::Output;

    fn visit_children(&mut self, node: &Node, path: &Path) -> Vec<Self::Output> {
        node.children()
            .iter()
            .enumerate()
            .map(|(index, child)| self.visit(child, &path.clone().child(index)))
            .collect()
    }

    fn visit_slots(&mut self, node: &Node, path: &Path) -> BTreeMap<String, Vec<Self::Output>> {
        let mut folded = BTreeMap::new();
        if let Node::Tag { slots, .. } = node {
            for (name, nodes) in slots {
                let outputs = nodes
                    .iter()
                    .enumerate()
                    .map(|(index, child)| {
                        self.visit(child, &path.clone().slot_child(name.clone(), index))
                    })
                    .collect();
                folded.insert(name.clone(), outputs);
            }
        }
        folded
    }
}
