//! # Stanza Editor
//!
//! Core mutation engine for Stanza document trees.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ selection layer: cursor → (path, offset)    │  (external)
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: structural edits over one tree      │
//! │  - insert / remove / move                   │
//! │  - split / fuse / wrap / unwrap             │
//! │  - text-run normalization                   │
//! │  - change notifications per mutation        │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ renderer: re-render subtree at event path   │  (external)
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **The tree is the source of truth**: paths are ephemeral
//!    coordinates into it, recomputed after every structural change
//! 2. **One owner**: a tree belongs to exactly one editor; argument
//!    subtrees are moved in, never shared
//! 3. **Primitives validate first**: single operations fail with no
//!    partial effect; composites are best-effort and documented as such
//! 4. **One notification kind**: "subtree changed at path", emitted
//!    synchronously after each successful mutation
//!
//! ## Usage
//!
//! ```rust
//! use stanza_editor::{DocumentEditor, Node, Path};
//!
//! let tree = Node::tag("article")
//!     .with_child(Node::tag("p").with_child(Node::text("hello world")));
//! let mut editor = DocumentEditor::new(tree);
//!
//! editor.on_change(|event| {
//!     println!("re-render at {}", event.path);
//!     Ok(())
//! });
//!
//! let text_path = Path::root().child(0).child(0);
//! editor.set_text(&text_path, "hello, world")?;
//! # Ok::<(), stanza_editor::EditError>(())
//! ```

mod editor;
mod edits;
mod errors;
mod notify;

pub use editor::DocumentEditor;
pub use edits::{Edit, InsertPosition, Locator, TextLocation};
pub use errors::EditError;
pub use notify::{ChangeEvent, ObserverError};

// Re-export the node model for convenience
pub use stanza_dom::{Node, Path, Step};
