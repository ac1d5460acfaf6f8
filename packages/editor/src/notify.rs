//! Change notification channel.
//!
//! One typed notification kind exists: "subtree changed at path P",
//! raised synchronously after each successful mutating call. Observers
//! run inline in registration order; an observer that fails aborts the
//! remaining notifications and the failure propagates to the mutating
//! caller. The rendering collaborator is expected to re-render at least
//! the subtree rooted at the event's path.

use stanza_dom::Path;

/// Payload of a change notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    /// Path of the minimal subtree affected by the mutation.
    pub path: Path,
    /// Editor version after the mutation; increments once per
    /// successful mutating call.
    pub version: u64,
}

/// Error type observers may fail with.
pub type ObserverError = Box<dyn std::error::Error + Send + Sync>;

pub(crate) type Observer = Box<dyn FnMut(&ChangeEvent) -> Result<(), ObserverError>>;
