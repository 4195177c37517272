use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChatError {
    /// Unsupported mode or malformed settings. Never reaches the network.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to reach the backend: {0}")]
    Network(String),

    #[error("Backend did not answer within {0}ms")]
    Timeout(u64),

    /// Non-success status. `detail` is the server's own text when it sent one.
    #[error("{detail}")]
    Server { status: u16, detail: String },

    #[error("Invalid response from backend: {0}")]
    Serialization(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Backend unavailable: {0}")]
    Unavailable(String),
}

impl ChatError {
    /// Transport-level failures: the request may never have reached the backend.
    pub fn is_transport(&self) -> bool {
        matches!(self, ChatError::Network(_) | ChatError::Timeout(_))
    }
}

impl From<serde_json::Error> for ChatError {
    fn from(e: serde_json::Error) -> Self {
        ChatError::Serialization(e.to_string())
    }
}
