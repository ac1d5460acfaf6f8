//! Path resolution and reverse lookup.

use crate::error::DomError;
use crate::node::Node;
use crate::path::{Path, Step};

fn resolve_step<'a>(node: &'a Node, step: &Step) -> Option<&'a Node> {
    match (node, step) {
        (Node::Tag { children, .. }, Step::Ordinal(index)) => children.get(*index),
        (Node::Tag { slots, .. }, Step::Slot(name, index)) => slots.get(name)?.get(*index),
        (Node::Text { .. }, _) => None,
    }
}

/// Walks `path` from `root` and returns the addressed node.
///
/// Stepping past the end of a sequence, into a missing slot, or into a
/// text node yields `None`; a dangling path is a valid, non-exceptional
/// outcome here.
pub fn resolve<'a>(root: &'a Node, path: &Path) -> Option<&'a Node> {
    let mut node = root;
    for step in path.steps() {
        node = resolve_step(node, step)?;
    }
    Some(node)
}

/// Mutable counterpart of [`resolve`].
pub fn resolve_mut<'a>(root: &'a mut Node, path: &Path) -> Option<&'a mut Node> {
    let mut node = root;
    for step in path.steps() {
        node = match (node, step) {
            (Node::Tag { children, .. }, Step::Ordinal(index)) => children.get_mut(*index)?,
            (Node::Tag { slots, .. }, Step::Slot(name, index)) => {
                slots.get_mut(name)?.get_mut(*index)?
            }
            (Node::Text { .. }, _) => return None,
        };
    }
    Some(node)
}

/// The ordered list of (subpath, node) pairs from the root down to the
/// addressed node, the root itself included.
///
/// Fails with [`DomError::StalePath`] naming the first prefix that no
/// longer resolves, which signals the path does not match the tree's
/// current shape.
pub fn ancestor_chain<'a>(root: &'a Node, path: &Path) -> Result<Vec<(Path, &'a Node)>, DomError> {
    let mut chain = Vec::with_capacity(path.depth() + 1);
    let mut prefix = Path::root();
    let mut node = root;
    chain.push((prefix.clone(), node));
    for step in path.steps() {
        prefix.push(step.clone());
        node = resolve_step(node, step).ok_or_else(|| DomError::stale_path(prefix.clone()))?;
        chain.push((prefix.clone(), node));
    }
    Ok(chain)
}

/// Finds where `target` lives inside `container` by scanning its ordinal
/// children, then each slot, for the same node *instance*.
///
/// Comparison is pointer identity, not structural equality, so two
/// structurally equal siblings stay distinguishable. Returns the
/// single-step path of the match, or `None` when `target` is not an
/// immediate child (text containers hold no sequences to scan).
pub fn locate_by_identity(container: &Node, target: &Node) -> Option<Path> {
    let Node::Tag { children, slots, .. } = container else {
        return None;
    };
    if let Some(index) = children.iter().position(|child| std::ptr::eq(child, target)) {
        return Some(Path::root().child(index));
    }
    for (name, nodes) in slots {
        if let Some(index) = nodes.iter().position(|child| std::ptr::eq(child, target)) {
            return Some(Path::root().slot_child(name.clone(), index));
        }
    }
    None
}
