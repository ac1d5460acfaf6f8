//! # Document Editor
//!
//! In-place mutation engine over one document tree.
//!
//! A [`DocumentEditor`] owns a root [`Node`] and implements the
//! structural edit primitives a rich-text editor needs: insert, remove,
//! move, split, fuse, wrap, unwrap. Operations take [`Path`] or
//! (path, offset) locators produced by the selection layer, mutate the
//! tree in place, and raise one [`ChangeEvent`] naming the minimal
//! changed subtree.
//!
//! ## Atomicity
//!
//! Single primitives validate their preconditions before touching the
//! tree, so they fail with no partial effect. Composite operations
//! (multi-level split, wrap, unwrap) issue several internal edits and do
//! not roll back if a later step fails; a split that runs out of
//! ancestors leaves the already-split lower levels in place. Callers that
//! need stronger guarantees must snapshot the root first.
//!
//! ## Ownership
//!
//! Exactly one editor holds a tree at a time. Subtrees passed as
//! arguments (new nodes, wrap templates) are moved into the destination
//! tree; deep-copy with `clone` before the call to reuse a value.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;
use stanza_dom::{
    ancestor_chain, locate_by_identity, normalize_text_runs, resolve, resolve_mut, DomError, Node,
    Path, Step,
};
use tracing::debug;

use crate::edits::{Edit, InsertPosition, Locator, TextLocation};
use crate::errors::EditError;
use crate::notify::{ChangeEvent, Observer, ObserverError};

pub struct DocumentEditor {
    root: Node,
    version: u64,
    observers: Vec<Observer>,
}

impl fmt::Debug for DocumentEditor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentEditor")
            .field("root", &self.root)
            .field("version", &self.version)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl DocumentEditor {
    pub fn new(root: Node) -> Self {
        Self {
            root,
            version: 0,
            observers: Vec::new(),
        }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn into_root(self) -> Node {
        self.root
    }

    /// Version counter; increments once per successful mutating call.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Registers a change observer. Observers run synchronously, in
    /// registration order, inside the mutating call that triggered them.
    pub fn on_change<F>(&mut self, observer: F)
    where
        F: FnMut(&ChangeEvent) -> Result<(), ObserverError> + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    // ---- inspector surface ----

    pub fn node_at(&self, path: &Path) -> Result<&Node, EditError> {
        resolve(&self.root, path).ok_or_else(|| DomError::stale_path(path.clone()).into())
    }

    pub fn name_at(&self, path: &Path) -> Result<&str, EditError> {
        Ok(self.node_at(path)?.wire_name())
    }

    /// The (subpath, node) pairs from the root down to `path`.
    pub fn ancestors(&self, path: &Path) -> Result<Vec<(Path, &Node)>, EditError> {
        Ok(ancestor_chain(&self.root, path)?)
    }

    // ---- primitive operations ----

    /// Replaces the content of the text node at `path`. A write of the
    /// current value is a no-op and emits nothing.
    pub fn set_text(&mut self, path: &Path, value: impl Into<String>) -> Result<(), EditError> {
        let value = value.into();
        match self.node_at_mut(path)? {
            Node::Text { content } => {
                if *content == value {
                    return Ok(());
                }
                *content = value;
            }
            Node::Tag { .. } => return Err(EditError::wrong_variant(path, "text")),
        }
        debug!(path = %path, "replaced text content");
        self.emit(path.clone())
    }

    /// Sets an attribute on the tag node at `path`. A write of the
    /// current value is a no-op and emits nothing.
    pub fn set_property(
        &mut self,
        path: &Path,
        name: impl Into<String>,
        value: Value,
    ) -> Result<(), EditError> {
        let name = name.into();
        match self.node_at_mut(path)? {
            Node::Tag { attributes, .. } => {
                if attributes.get(&name) == Some(&value) {
                    return Ok(());
                }
                debug!(path = %path, attribute = %name, "set attribute");
                attributes.insert(name, value);
            }
            Node::Text { .. } => return Err(EditError::wrong_variant(path, "tag")),
        }
        self.emit(path.clone())
    }

    /// Splices the node at `path` out of its parent's sequence,
    /// discarding it.
    pub fn remove_node(&mut self, path: &Path) -> Result<(), EditError> {
        let Some(parent_path) = path.parent() else {
            return Err(EditError::root_operation("remove"));
        };
        let (sequence, index) = self.sibling_sequence_mut(path)?;
        if index >= sequence.len() {
            return Err(DomError::stale_path(path.clone()).into());
        }
        sequence.remove(index);
        debug!(path = %path, "removed node");
        self.emit(parent_path)
    }

    /// Moves the node at `path` within its current sequence. `new_index`
    /// is clamped into `[0, len - 1]`; a move to the current position is
    /// a no-op and emits nothing.
    pub fn change_node_position(&mut self, path: &Path, new_index: usize) -> Result<(), EditError> {
        let Some(parent_path) = path.parent() else {
            return Err(EditError::root_operation("reposition"));
        };
        let (sequence, index) = self.sibling_sequence_mut(path)?;
        if index >= sequence.len() {
            return Err(DomError::stale_path(path.clone()).into());
        }
        let target = new_index.min(sequence.len() - 1);
        if target == index {
            return Ok(());
        }
        let node = sequence.remove(index);
        sequence.insert(target, node);
        debug!(path = %path, from = index, to = target, "moved node");
        self.emit(parent_path)
    }

    /// Inserts `nodes`, order preserved, into the ordinal children of
    /// the tag node at `path`.
    pub fn add_children(
        &mut self,
        path: &Path,
        position: impl Into<InsertPosition>,
        nodes: Vec<Node>,
    ) -> Result<(), EditError> {
        let position = position.into();
        let count = nodes.len();
        let children = match self.node_at_mut(path)? {
            Node::Tag { children, .. } => children,
            Node::Text { .. } => return Err(EditError::wrong_variant(path, "tag")),
        };
        let at = position.resolve(children.len());
        children.splice(at..at, nodes);
        debug!(path = %path, at, count, "inserted children");
        self.emit(path.clone())
    }

    /// Inserts `nodes` into the named slot of the tag node at `path`,
    /// creating the slot when absent.
    pub fn add_slot_children(
        &mut self,
        path: &Path,
        slot: impl Into<String>,
        position: impl Into<InsertPosition>,
        nodes: Vec<Node>,
    ) -> Result<(), EditError> {
        let slot = slot.into();
        let position = position.into();
        let count = nodes.len();
        match self.node_at_mut(path)? {
            Node::Tag { slots, .. } => {
                let sequence = slots.entry(slot).or_default();
                let at = position.resolve(sequence.len());
                sequence.splice(at..at, nodes);
            }
            Node::Text { .. } => return Err(EditError::wrong_variant(path, "tag")),
        }
        debug!(path = %path, count, "inserted slot children");
        self.emit(path.clone())
    }

    // ---- composite operations ----

    /// Divides a node, and `ancestor_levels` of its ancestors, into two
    /// adjacent sibling branches.
    ///
    /// A text-offset locator first splits the text node's content at the
    /// offset, keeping the head in place and inserting the tail as the
    /// next sibling; the ancestor walk then starts from the tail. A
    /// path locator must address a tag node. Each ancestor level moves
    /// the tail siblings (the node and everything after it) into a
    /// duplicate of the parent that carries only the parent's name and
    /// attributes, inserted immediately after the original.
    ///
    /// Returns the path of the split-off branch. With a node locator and
    /// `ancestor_levels == 0` nothing changes and nothing is emitted.
    pub fn split_at(
        &mut self,
        locator: impl Into<Locator>,
        ancestor_levels: usize,
    ) -> Result<Path, EditError> {
        let locator = locator.into();
        if locator.path().is_root() {
            return Err(EditError::root_operation("split"));
        }
        let start_path = match locator {
            Locator::Text(TextLocation { path, offset }) => {
                let content = match self.node_at_mut(&path)? {
                    Node::Text { content } => content,
                    Node::Tag { .. } => return Err(EditError::wrong_variant(&path, "text")),
                };
                let tail_text = content.split_off(byte_offset(content, offset));
                self.insert_sibling_after(&path, Node::text(tail_text))?
            }
            Locator::Node(path) => {
                if self.node_at(&path)?.is_text() {
                    return Err(EditError::wrong_variant(&path, "tag"));
                }
                if ancestor_levels == 0 {
                    return Ok(path);
                }
                path
            }
        };
        let new_path = self.split_branch(start_path, ancestor_levels)?;
        debug!(path = %new_path, levels = ancestor_levels, "split branch");
        let notify_at = new_path.parent().unwrap_or_else(Path::root);
        self.emit(notify_at)?;
        Ok(new_path)
    }

    fn split_branch(&mut self, mut path: Path, levels: usize) -> Result<Path, EditError> {
        for _ in 0..levels {
            let (parent_path, step) = match (path.parent(), path.last_step()) {
                (Some(parent), Some(step)) => (parent, step.clone()),
                _ => return Err(EditError::root_operation("split")),
            };
            // The duplicate becomes a sibling of the parent, so the
            // parent itself must be a child.
            if parent_path.is_root() {
                return Err(EditError::root_operation("split"));
            }
            // Duplicate the parent's header: name and attributes travel,
            // contents stay behind.
            let (name, attributes) = match resolve(&self.root, &parent_path) {
                Some(Node::Tag {
                    name, attributes, ..
                }) => (name.clone(), attributes.clone()),
                _ => return Err(DomError::stale_path(parent_path).into()),
            };
            let (sequence, index) = self.sibling_sequence_mut(&path)?;
            if index > sequence.len() {
                return Err(DomError::stale_path(path.clone()).into());
            }
            let tail = sequence.split_off(index);
            let duplicate = match &step {
                Step::Ordinal(_) => Node::Tag {
                    name,
                    children: tail,
                    attributes,
                    slots: BTreeMap::new(),
                },
                Step::Slot(slot, _) => Node::Tag {
                    name,
                    children: Vec::new(),
                    attributes,
                    slots: BTreeMap::from([(slot.clone(), tail)]),
                },
            };
            path = self.insert_sibling_after(&parent_path, duplicate)?;
        }
        Ok(path)
    }

    /// Merges the node at `path` backward into its immediately preceding
    /// sibling; when the node is first in its sequence, ascends to the
    /// parent instead, up to `ancestor_limit` levels (`None` for
    /// unlimited).
    ///
    /// Text nodes concatenate; tag nodes require equal names, append
    /// ordinal children, and merge slots key by key, re-normalizing each
    /// touched sequence. Returns the path of the extended sibling, or
    /// `None` when the limit ran out before anything fused.
    pub fn fuse_back(
        &mut self,
        path: &Path,
        ancestor_limit: Option<usize>,
    ) -> Result<Option<Path>, EditError> {
        let mut path = path.clone();
        let mut limit = ancestor_limit;
        loop {
            let step = match path.last_step() {
                Some(step) => step.clone(),
                None => return Err(EditError::root_operation("fuse")),
            };
            if step.index() == 0 {
                // Nothing to merge with at this level.
                match &mut limit {
                    Some(0) => return Ok(None),
                    Some(remaining) => *remaining -= 1,
                    None => {}
                }
                path = match path.parent() {
                    Some(parent) => parent,
                    None => return Err(EditError::root_operation("fuse")),
                };
                continue;
            }

            let previous_path = match path.sibling(step.index() - 1) {
                Some(previous) => previous,
                None => return Err(DomError::stale_path(path.clone()).into()),
            };
            // Validate the merge before touching the tree.
            {
                let target = self.node_at(&path)?;
                let previous = self.node_at(&previous_path)?;
                if previous.wire_name() != target.wire_name() {
                    return Err(EditError::NameMismatch {
                        target: previous.wire_name().to_string(),
                        src: target.wire_name().to_string(),
                    });
                }
            }
            let (sequence, index) = self.sibling_sequence_mut(&path)?;
            let absorbed = sequence.remove(index);
            extend_node(&mut sequence[index - 1], absorbed);
            debug!(path = %previous_path, "fused node into preceding sibling");
            self.emit(previous_path.clone())?;
            return Ok(Some(previous_path));
        }
    }

    /// Wraps a whole node (`end` omitted) or a character range of a text
    /// node (both locators must address the same text node) in
    /// `wrap_node`, which must be a tag node and is moved into the tree.
    ///
    /// In the range case the text splits into prefix, selected and
    /// suffix pieces; the selected piece becomes the sole child of the
    /// wrapper and the original node's position is replaced by the
    /// (prefix, wrapper, suffix) triplet, empty edge pieces included.
    /// Returns the wrapper's path.
    pub fn wrap_with_node(
        &mut self,
        wrap_node: Node,
        start: impl Into<Locator>,
        end: Option<Locator>,
    ) -> Result<Path, EditError> {
        if !wrap_node.is_tag() {
            return Err(EditError::WrongVariant {
                subject: "the wrap template".to_string(),
                expected: "tag",
            });
        }
        match end {
            None => self.wrap_whole_node(wrap_node, start.into()),
            Some(end) => self.wrap_text_range(wrap_node, start.into(), end),
        }
    }

    fn wrap_whole_node(&mut self, wrap_node: Node, start: Locator) -> Result<Path, EditError> {
        let path = match start {
            Locator::Node(path) => path,
            // A half-open text range has no whole-node reading.
            Locator::Text(_) => return Err(EditError::UnsupportedRange),
        };
        let Some(parent_path) = path.parent() else {
            return Err(EditError::root_operation("wrap"));
        };
        let step = self.identity_step(&parent_path, &path)?;
        let child_path = parent_path.clone().join(step.clone());
        let (sequence, index) = self.sibling_sequence_mut(&child_path)?;
        if index >= sequence.len() {
            return Err(DomError::stale_path(path).into());
        }
        let target = sequence.remove(index);
        let mut wrapper = wrap_node;
        if let Some(children) = wrapper.children_mut() {
            children.insert(0, target);
        }
        sequence.insert(index, wrapper);
        debug!(path = %child_path, "wrapped node");
        self.emit(child_path.clone())?;
        Ok(child_path)
    }

    fn wrap_text_range(
        &mut self,
        wrap_node: Node,
        start: Locator,
        end: Locator,
    ) -> Result<Path, EditError> {
        let (start, end) = match (start, end) {
            (Locator::Text(start), Locator::Text(end)) => (start, end),
            _ => return Err(EditError::UnsupportedRange),
        };
        if start.path != end.path {
            return Err(EditError::UnsupportedRange);
        }
        let path = start.path;
        let Some(parent_path) = path.parent() else {
            return Err(EditError::root_operation("wrap"));
        };
        let (prefix, selected, suffix) = {
            let content = match self.node_at(&path)? {
                Node::Text { content } => content,
                Node::Tag { .. } => return Err(EditError::wrong_variant(&path, "text")),
            };
            let (lo, hi) = ordered_byte_range(content, start.offset, end.offset);
            (
                content[..lo].to_string(),
                content[lo..hi].to_string(),
                content[hi..].to_string(),
            )
        };
        let step = self.identity_step(&parent_path, &path)?;
        let child_path = parent_path.clone().join(step.clone());
        let (sequence, index) = self.sibling_sequence_mut(&child_path)?;
        if index >= sequence.len() {
            return Err(DomError::stale_path(path).into());
        }
        sequence.remove(index);
        let mut wrapper = wrap_node;
        if let Some(children) = wrapper.children_mut() {
            children.insert(0, Node::text(selected));
        }
        // Empty edge pieces are inserted all the same; callers rely on
        // the triplet shape.
        sequence.splice(
            index..index,
            [Node::text(prefix), wrapper, Node::text(suffix)],
        );
        let wrapped_path = parent_path.join(step.with_index(index + 1));
        debug!(path = %wrapped_path, "wrapped text range");
        self.emit(wrapped_path.clone())?;
        Ok(wrapped_path)
    }

    /// Replaces the tag node at `path` with its own ordinal children,
    /// spliced into its former position; the node's slots are discarded
    /// with it. The receiving sequence is re-normalized.
    pub fn unwrap_content(&mut self, path: &Path) -> Result<(), EditError> {
        let Some(parent_path) = path.parent() else {
            return Err(EditError::root_operation("unwrap"));
        };
        if self.node_at(path)?.is_text() {
            return Err(EditError::wrong_variant(path, "tag"));
        }
        let step = self.identity_step(&parent_path, path)?;
        let child_path = parent_path.clone().join(step);
        let (sequence, index) = self.sibling_sequence_mut(&child_path)?;
        if index >= sequence.len() {
            return Err(DomError::stale_path(path.clone()).into());
        }
        let target = sequence.remove(index);
        let children = match target {
            Node::Tag { children, .. } => children,
            Node::Text { .. } => Vec::new(),
        };
        sequence.splice(index..index, children);
        normalize_text_runs(sequence);
        debug!(path = %parent_path, "unwrapped node content");
        self.emit(parent_path)
    }

    /// Applies a serialized edit description; behaves exactly like the
    /// corresponding method call.
    pub fn apply(&mut self, edit: Edit) -> Result<(), EditError> {
        match edit {
            Edit::SetText { path, value } => self.set_text(&path, value),
            Edit::SetProperty { path, name, value } => self.set_property(&path, name, value),
            Edit::RemoveNode { path } => self.remove_node(&path),
            Edit::ChangeNodePosition { path, position } => {
                self.change_node_position(&path, position)
            }
            Edit::AddChildren {
                path,
                position,
                nodes,
            } => self.add_children(&path, position, nodes),
            Edit::AddSlotChildren {
                path,
                slot,
                position,
                nodes,
            } => self.add_slot_children(&path, slot, position, nodes),
            Edit::SplitAt {
                locator,
                ancestor_levels,
            } => self.split_at(locator, ancestor_levels).map(|_| ()),
            Edit::FuseBack {
                path,
                ancestor_limit,
            } => self.fuse_back(&path, ancestor_limit).map(|_| ()),
            Edit::WrapWithNode {
                wrap_node,
                start,
                end,
            } => self.wrap_with_node(wrap_node, start, end).map(|_| ()),
            Edit::UnwrapContent { path } => self.unwrap_content(&path),
        }
    }

    // ---- internals ----

    fn node_at_mut(&mut self, path: &Path) -> Result<&mut Node, EditError> {
        resolve_mut(&mut self.root, path).ok_or_else(|| DomError::stale_path(path.clone()).into())
    }

    /// The sequence holding the node addressed by `path`, with the
    /// node's index in it. The index may point one past the end (an
    /// insertion point); callers validate where that matters.
    fn sibling_sequence_mut(&mut self, path: &Path) -> Result<(&mut Vec<Node>, usize), EditError> {
        let (parent_path, step) = match (path.parent(), path.last_step()) {
            (Some(parent), Some(step)) => (parent, step),
            _ => return Err(DomError::stale_path(path.clone()).into()),
        };
        let parent = resolve_mut(&mut self.root, &parent_path)
            .ok_or_else(|| DomError::stale_path(parent_path.clone()))?;
        let sequence = match (parent, step) {
            (Node::Tag { children, .. }, Step::Ordinal(_)) => children,
            (Node::Tag { slots, .. }, Step::Slot(name, _)) => slots
                .get_mut(name)
                .ok_or_else(|| DomError::stale_path(path.clone()))?,
            (Node::Text { .. }, _) => return Err(DomError::stale_path(path.clone()).into()),
        };
        Ok((sequence, step.index()))
    }

    /// Re-derives where the node at `path` sits inside its parent by
    /// instance identity rather than by trusting the path's last step.
    fn identity_step(&self, parent_path: &Path, path: &Path) -> Result<Step, EditError> {
        let target = self.node_at(path)?;
        let parent = self.node_at(parent_path)?;
        let relative = locate_by_identity(parent, target)
            .ok_or_else(|| DomError::stale_path(path.clone()))?;
        match relative.last_step() {
            Some(step) => Ok(step.clone()),
            None => Err(DomError::stale_path(path.clone()).into()),
        }
    }

    fn insert_sibling_after(&mut self, path: &Path, node: Node) -> Result<Path, EditError> {
        let (sequence, index) = self.sibling_sequence_mut(path)?;
        if index >= sequence.len() {
            return Err(DomError::stale_path(path.clone()).into());
        }
        sequence.insert(index + 1, node);
        path.sibling(index + 1)
            .ok_or_else(|| DomError::stale_path(path.clone()).into())
    }

    fn emit(&mut self, path: Path) -> Result<(), EditError> {
        self.version += 1;
        let event = ChangeEvent {
            path,
            version: self.version,
        };
        for observer in &mut self.observers {
            observer(&event).map_err(|source| EditError::Observer {
                path: event.path.clone(),
                source,
            })?;
        }
        Ok(())
    }
}

/// Absorbs `source` into `target`. Callers have already checked the wire
/// names match, which pins both to the same variant.
fn extend_node(target: &mut Node, source: Node) {
    match (target, source) {
        (Node::Text { content }, Node::Text { content: absorbed }) => {
            content.push_str(&absorbed);
        }
        (
            Node::Tag {
                children, slots, ..
            },
            Node::Tag {
                children: source_children,
                slots: source_slots,
                ..
            },
        ) => {
            children.extend(source_children);
            normalize_text_runs(children);
            for (name, nodes) in source_slots {
                let merged = slots.entry(name).or_default();
                merged.extend(nodes);
                normalize_text_runs(merged);
            }
        }
        _ => {}
    }
}

/// Byte index of the given character offset, clamped to the end.
fn byte_offset(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map(|(index, _)| index)
        .unwrap_or(text.len())
}

fn ordered_byte_range(text: &str, a: usize, b: usize) -> (usize, usize) {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    (byte_offset(text, lo), byte_offset(text, hi))
}
