//! Port traits — the boundary to every external collaborator.
//!
//! The core never performs network or storage I/O itself; hosts inject
//! implementations of these traits. Adapters live in `chat-platform`.

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;
use chat_types::{config::ModelConfig, message::Message, Result};

// ─── Completion Port ─────────────────────────────────────────

/// One event of a streaming completion. Deltas carry the *cumulative* text
/// so far, not just the newly added portion; `Done` is terminal and carries
/// the final text. Events arrive in order per request.
#[derive(Debug, Clone)]
pub enum ChatStreamEvent {
    Delta(String),
    Done(String),
    /// HTTP-style failure; `status` is present when the transport surfaced one.
    Error { status: Option<u16>, message: String },
}

/// Request to the completion service.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub messages: Vec<Message>,
    pub model: ModelConfig,
}

/// Aborts one in-flight streaming request. Idempotent.
pub trait CancelHandle {
    fn cancel(&self);
}

#[async_trait(?Send)]
pub trait CompletionPort {
    /// Non-streaming completion; used for topic inference.
    async fn completion(&self, req: ChatRequest) -> Result<String>;

    /// Streaming completion — returns the cancel handle for the request
    /// together with its ordered event stream.
    fn stream_chat(
        &self,
        req: ChatRequest,
    ) -> (
        Box<dyn CancelHandle>,
        Pin<Box<dyn Stream<Item = ChatStreamEvent>>>,
    );
}

// ─── Storage Port ────────────────────────────────────────────

#[async_trait(?Send)]
pub trait StoragePort {
    /// Get a blob by key
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Set a blob
    async fn set(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Delete a blob
    async fn delete(&self, key: &str) -> Result<()>;

    /// Name of this backend (for logging/debug)
    fn backend_name(&self) -> &str;
}

// ─── Host Port ───────────────────────────────────────────────

/// UI-level capabilities the core must never reach for ambiently.
pub trait HostPort {
    /// Ask the user to confirm a destructive action.
    fn confirm(&self, prompt: &str) -> bool;

    /// Restart/reload the host after all data was cleared.
    fn restart(&self);
}
