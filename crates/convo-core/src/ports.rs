//! Seams between the session logic and the host.
//!
//! The session only sees a backend that answers HTTP exchanges and a store
//! for its settings; `convo-platform` supplies the browser versions.

use async_trait::async_trait;
use convo_types::{config::ChatConfig, Result};

// ─── Backend Port ────────────────────────────────────────────

/// Raw outcome of an HTTP exchange that reached the server.
/// Interpreting the status is the dispatcher's job, not the transport's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport to the inference backend.
///
/// Implementations return `Err` only when no response was obtained
/// (network failure, DNS, timeout). Any status code is an `Ok`.
#[async_trait(?Send)]
pub trait BackendPort {
    /// POST a JSON body to `path` with the given query parameters
    async fn post_json(
        &self,
        path: &str,
        query: &[(&str, &str)],
        body: &serde_json::Value,
    ) -> Result<HttpReply>;

    /// GET `path`
    async fn get(&self, path: &str) -> Result<HttpReply>;

    /// Base URL this transport targets (for logging/advisories)
    fn base_url(&self) -> &str;
}

// ─── Settings Port ───────────────────────────────────────────

#[async_trait(?Send)]
pub trait SettingsPort {
    /// Load the saved chat configuration, if any
    async fn load(&self) -> Result<Option<ChatConfig>>;

    /// Persist the chat configuration
    async fn save(&self, config: &ChatConfig) -> Result<()>;

    /// Name of this backend (for logging/debug)
    fn backend_name(&self) -> &str;
}
