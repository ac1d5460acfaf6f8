//! # Stanza DOM
//!
//! Document-tree model for structural rich-text editing.
//!
//! A document is a tree of [`Node`]s: text leaves and named tag nodes with
//! ordinal children, attributes, and named slots. Nodes are addressed by
//! [`Path`] values, ordered sequences of ordinal/slot steps from a declared
//! root. Paths are ephemeral coordinates, not stable identities: any
//! mutation that changes sequence lengths along a route invalidates the
//! paths through it.
//!
//! This crate holds the passive half of the system: the node model and its
//! wire codec, the path algebra, lookup, and a fold-style visitor for
//! renderers. The mutation engine lives in `stanza-editor`.

pub mod error;
pub mod lookup;
pub mod node;
pub mod path;
pub mod visitor;
mod wire;

pub use error::DomError;
pub use lookup::{ancestor_chain, locate_by_identity, resolve, resolve_mut};
pub use node::{normalize_text_runs, Node, TEXT_MARKER};
pub use path::{Path, Step};
pub use visitor::NodeVisitor;
