use serde::{Deserialize, Serialize};

/// Role in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single turn in a conversation.
///
/// `content` is overwritten in place while a response streams in; `is_error`
/// marks turns that failed and are excluded from future context windows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Monotonic numeric id; doubles as the cancellation key for in-flight streams.
    #[serde(default)]
    pub id: u64,
    pub role: Role,
    pub content: String,
    /// Creation timestamp, display-only.
    #[serde(default)]
    pub date: String,
    /// True while content is still being appended.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub streaming: bool,
    /// True if the turn failed.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

impl Message {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            id: 0,
            role,
            content: text.into(),
            date: chrono::Utc::now().to_rfc3339(),
            streaming: false,
            is_error: false,
        }
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::new(Role::System, text)
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Role::Assistant, text)
    }

    pub fn with_id(mut self, id: u64) -> Self {
        self.id = id;
        self
    }

    /// Character length of the content, as accounted by the window builder.
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }
}
