use thiserror::Error;

use crate::path::Path;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomError {
    /// A decoded value does not have the name-first tuple shape.
    #[error("malformed node: {reason}")]
    MalformedNode { reason: String },

    /// A path no longer resolves against the current tree shape.
    #[error("no node at path `{path}`")]
    StalePath { path: Path },

    #[error("invalid path syntax `{input}`: {reason}")]
    PathSyntax { input: String, reason: String },
}

impl DomError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedNode {
            reason: reason.into(),
        }
    }

    pub fn stale_path(path: Path) -> Self {
        Self::StalePath { path }
    }

    pub fn path_syntax(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::PathSyntax {
            input: input.into(),
            reason: reason.into(),
        }
    }
}
