use serde::{Deserialize, Serialize};

/// Events emitted by the session store and controllers.
/// The host drains these for reactive re-rendering and debounced persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ChatEvent {
    /// The session list, active index, or config changed; a persistence
    /// re-serialization should follow eventually.
    SessionsChanged,

    /// A message's content or flags changed (streaming delta, finalize, error).
    MessageUpdated { session_index: usize, message_id: u64 },

    /// A session's topic was inferred.
    TopicUpdated { session_index: usize },

    /// A session's compressed memory was updated.
    MemoryUpdated { session_index: usize },

    /// A full user turn settled (completed or failed).
    TurnComplete { session_index: usize, message_id: u64 },

    /// A session was deleted; it can be reverted until the deadline passes.
    SessionDeleted { index: usize, revert_deadline: String },

    /// A non-fatal error surfaced to the user.
    Error { message: String },
}
