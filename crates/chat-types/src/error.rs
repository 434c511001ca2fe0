use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ChatError {
    /// Network/HTTP failure from the completion service; carries the
    /// HTTP-style status code when one was surfaced.
    #[error("transport error{}: {message}", .status.map(|s| format!(" ({s})")).unwrap_or_default())]
    Transport { status: Option<u16>, message: String },

    #[error("unauthorized")]
    Unauthorized,

    #[error("storage error: {0}")]
    Storage(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("cancelled")]
    Cancelled,

    #[error("configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for ChatError {
    fn from(e: serde_json::Error) -> Self {
        ChatError::Serialization(e.to_string())
    }
}
