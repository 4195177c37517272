use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ChatError;

/// Session-wide request-shaping parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatConfig {
    pub provider: Provider,
    pub mode: ChatMode,
    /// Upper bound on retrieved documents, always within
    /// `MIN_RESULT_COUNT..=MAX_RESULT_COUNT`
    pub result_count: u32,
    pub use_rerank: bool,
}

impl ChatConfig {
    pub const MIN_RESULT_COUNT: u32 = 1;
    pub const MAX_RESULT_COUNT: u32 = 20;

    /// Shallow merge: fields absent from the patch keep their current value.
    pub fn apply(&mut self, patch: ConfigPatch) {
        if let Some(provider) = patch.provider {
            self.provider = provider;
        }
        if let Some(mode) = patch.mode {
            self.mode = mode;
        }
        if let Some(count) = patch.result_count {
            self.result_count = count.clamp(Self::MIN_RESULT_COUNT, Self::MAX_RESULT_COUNT);
        }
        if let Some(rerank) = patch.use_rerank {
            self.use_rerank = rerank;
        }
    }

    pub fn merged(mut self, patch: ConfigPatch) -> Self {
        self.apply(patch);
        self
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            provider: Provider::Llama,
            mode: ChatMode::Retrieval,
            result_count: 5,
            use_rerank: false,
        }
    }
}

/// Partial update for [`ChatConfig`]. Deserializes from partial JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<Provider>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<ChatMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_rerank: Option<bool>,
}

impl ConfigPatch {
    pub fn provider(provider: Provider) -> Self {
        Self { provider: Some(provider), ..Self::default() }
    }

    pub fn mode(mode: ChatMode) -> Self {
        Self { mode: Some(mode), ..Self::default() }
    }

    pub fn result_count(count: u32) -> Self {
        Self { result_count: Some(count), ..Self::default() }
    }

    pub fn use_rerank(rerank: bool) -> Self {
        Self { use_rerank: Some(rerank), ..Self::default() }
    }

    pub fn from_json(json: &str) -> crate::Result<Self> {
        serde_json::from_str(json).map_err(|e| ChatError::Config(e.to_string()))
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl From<ChatConfig> for ConfigPatch {
    fn from(config: ChatConfig) -> Self {
        Self {
            provider: Some(config.provider),
            mode: Some(config.mode),
            result_count: Some(config.result_count),
            use_rerank: Some(config.use_rerank),
        }
    }
}

/// Backend interaction pattern used for a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChatMode {
    /// Stateless single-turn completion
    Simple,
    /// Single-turn completion grounded on the primary index
    Retrieval,
    /// Same contract as `Retrieval`, served by the alternate indexing backend
    RetrievalAltIndex,
    /// Multi-turn completion with prior turns, always retrieval-backed
    Conversational,
}

impl ChatMode {
    pub fn all() -> &'static [ChatMode] {
        &[
            ChatMode::Simple,
            ChatMode::Retrieval,
            ChatMode::RetrievalAltIndex,
            ChatMode::Conversational,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChatMode::Simple => "simple",
            ChatMode::Retrieval => "retrieval",
            ChatMode::RetrievalAltIndex => "retrieval-alt-index",
            ChatMode::Conversational => "conversational",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ChatMode::Simple => "Simple chat",
            ChatMode::Retrieval => "Document search",
            ChatMode::RetrievalAltIndex => "Document search (alternate index)",
            ChatMode::Conversational => "Conversation",
        }
    }

    pub fn uses_retrieval(&self) -> bool {
        !matches!(self, ChatMode::Simple)
    }
}

impl fmt::Display for ChatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChatMode {
    type Err = ChatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChatMode::all()
            .iter()
            .copied()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| ChatError::Config(format!("unsupported chat mode: {}", s)))
    }
}

/// Backend model family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Llama,
    Gemini,
}

impl Provider {
    pub fn all() -> &'static [Provider] {
        &[Provider::Llama, Provider::Gemini]
    }

    /// Value of the `provider` query parameter
    pub fn id(&self) -> &'static str {
        match self {
            Provider::Llama => "llama",
            Provider::Gemini => "gemini",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Provider::Llama => "LLaMA",
            Provider::Gemini => "Gemini",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Provider::Llama => "Meta AI model tuned for conversation",
            Provider::Gemini => "Google AI model with extended capabilities",
        }
    }
}

impl FromStr for Provider {
    type Err = ChatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Provider::all()
            .iter()
            .copied()
            .find(|p| p.id() == s)
            .ok_or_else(|| ChatError::Config(format!("unknown provider: {}", s)))
    }
}

/// Construction-time settings of the transport adapters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub request_timeout_ms: u64,
    pub health_interval_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_ms: 60_000,
            health_interval_ms: 30_000,
        }
    }
}

const DEFAULT_BASE_URL: &str = "http://localhost:8000";
