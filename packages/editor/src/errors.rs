//! Error types for the editor

use stanza_dom::{DomError, Path};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditError {
    /// Lookup or decode failure from the tree layer; covers stale paths.
    #[error(transparent)]
    Dom(#[from] DomError),

    /// Operation applied to a node of the wrong kind.
    #[error("{subject} is not a {expected} node")]
    WrongVariant {
        subject: String,
        expected: &'static str,
    },

    /// Structural operation attempted on the root path, which has no
    /// parent to operate against.
    #[error("cannot {operation} the root node")]
    RootOperation { operation: &'static str },

    /// Fuse/extend between differently-named nodes.
    #[error("cannot extend a `{target}` node with a `{src}` node")]
    NameMismatch { target: String, src: String },

    /// Wrap requested across two different text nodes, or with a locator
    /// kind the wrap mode cannot use.
    #[error("wrapping a range that spans more than one text node is not supported")]
    UnsupportedRange,

    /// A change observer rejected the update; remaining observers were
    /// not notified.
    #[error("change observer rejected update at `{path}`")]
    Observer {
        path: Path,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl EditError {
    pub(crate) fn wrong_variant(path: &Path, expected: &'static str) -> Self {
        EditError::WrongVariant {
            subject: format!("node at `{path}`"),
            expected,
        }
    }

    pub(crate) fn root_operation(operation: &'static str) -> Self {
        EditError::RootOperation { operation }
    }
}
