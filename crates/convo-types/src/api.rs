//! Wire types for the inference backend's HTTP contract.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::message::HistoryTurn;

/// Stateless single-turn request
#[derive(Debug, Clone, Serialize)]
pub struct SimpleRequest<'a> {
    pub message: &'a str,
    pub user_id: &'a str,
}

/// Retrieval request, shared by the primary and the alternate index
#[derive(Debug, Clone, Serialize)]
pub struct RetrievalRequest<'a> {
    pub message: &'a str,
    pub user_id: &'a str,
    pub n_results: u32,
    pub use_rerank: bool,
}

/// Multi-turn request carrying the prior conversation
#[derive(Debug, Clone, Serialize)]
pub struct ConversationRequest<'a> {
    pub message: &'a str,
    pub user_id: &'a str,
    pub chat_history: &'a [HistoryTurn],
    pub use_rag: bool,
    pub n_results: u32,
    pub use_rerank: bool,
}

/// Successful response body, uniform across endpoints
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatResponseBody {
    pub response: String,
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub sources: Option<Vec<String>>,
    #[serde(default)]
    pub metadatas: Option<Vec<Map<String, Value>>>,
    #[serde(default)]
    pub found_documents: Option<bool>,
    #[serde(default)]
    pub reranked: Option<bool>,
}

/// Error body returned alongside non-2xx statuses
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<Value>,
}

impl ErrorBody {
    /// Human-readable detail: strings verbatim, other JSON rendered as text.
    pub fn detail_text(&self) -> Option<String> {
        match self.detail.as_ref()? {
            Value::Null => None,
            Value::String(s) if s.trim().is_empty() => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}
