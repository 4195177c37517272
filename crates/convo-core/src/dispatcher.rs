//! Request dispatcher — one logical "send message" routed to a backend mode.
//!
//! Each [`ChatMode`] is served by a [`ModeStrategy`] that owns its endpoint,
//! payload builder and response mapper. [`ChatService`] picks the strategy,
//! issues exactly one request and folds every outcome into either a
//! [`DispatchResult`] or a [`ChatError`]. It never retries.

use std::collections::HashMap;
use std::rc::Rc;

use log::{debug, info, warn};
use serde_json::{Map, Value};

use convo_types::{
    api::{ChatResponseBody, ConversationRequest, ErrorBody, RetrievalRequest, SimpleRequest},
    config::{ChatConfig, ChatMode},
    message::{new_user_id, HistoryTurn},
    ChatError, Result,
};

use crate::ports::{BackendPort, HttpReply};

pub const SIMPLE_ENDPOINT: &str = "/api/v1/chat/simple";
pub const RETRIEVAL_ENDPOINT: &str = "/api/v1/chat/rag";
pub const ALT_INDEX_ENDPOINT: &str = "/api/v1/chat/rag/with/llamaindex";
pub const CONVERSATION_ENDPOINT: &str = "/api/v1/chat/conversation";

/// Normalized backend answer, independent of the mode that produced it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DispatchResult {
    pub text: String,
    pub sources: Vec<String>,
    pub metadata: Vec<Map<String, Value>>,
    /// The backend grounded the answer on retrieved documents
    pub used_retrieval: bool,
    /// Retrieved documents went through the rerank step
    pub reranked: bool,
}

/// Everything a strategy may need to build its payload.
#[derive(Debug, Clone, Copy)]
pub struct TurnRequest<'a> {
    pub text: &'a str,
    pub user_id: &'a str,
    pub config: &'a ChatConfig,
    /// Conversation before this turn, `system` entries already excluded
    pub history: &'a [HistoryTurn],
}

pub trait ModeStrategy {
    fn mode(&self) -> ChatMode;

    fn endpoint(&self) -> &str;

    fn build_payload(&self, req: &TurnRequest<'_>) -> Result<Value>;

    fn map_response(&self, body: ChatResponseBody) -> DispatchResult;
}

// ─── Built-in strategies ─────────────────────────────────────

/// Stateless completion, no retrieval parameters on the wire.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleStrategy;

impl ModeStrategy for SimpleStrategy {
    fn mode(&self) -> ChatMode {
        ChatMode::Simple
    }

    fn endpoint(&self) -> &str {
        SIMPLE_ENDPOINT
    }

    fn build_payload(&self, req: &TurnRequest<'_>) -> Result<Value> {
        Ok(serde_json::to_value(SimpleRequest {
            message: req.text,
            user_id: req.user_id,
        })?)
    }

    fn map_response(&self, body: ChatResponseBody) -> DispatchResult {
        DispatchResult {
            text: body.response,
            ..DispatchResult::default()
        }
    }
}

/// Retrieval-grounded completion. The primary and the alternate index share
/// this contract and differ only by endpoint.
#[derive(Debug, Clone)]
pub struct RetrievalStrategy {
    mode: ChatMode,
    endpoint: String,
}

impl RetrievalStrategy {
    pub fn primary() -> Self {
        Self {
            mode: ChatMode::Retrieval,
            endpoint: RETRIEVAL_ENDPOINT.to_string(),
        }
    }

    pub fn alternate_index() -> Self {
        Self {
            mode: ChatMode::RetrievalAltIndex,
            endpoint: ALT_INDEX_ENDPOINT.to_string(),
        }
    }
}

impl ModeStrategy for RetrievalStrategy {
    fn mode(&self) -> ChatMode {
        self.mode
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn build_payload(&self, req: &TurnRequest<'_>) -> Result<Value> {
        Ok(serde_json::to_value(RetrievalRequest {
            message: req.text,
            user_id: req.user_id,
            n_results: req.config.result_count,
            use_rerank: req.config.use_rerank,
        })?)
    }

    fn map_response(&self, body: ChatResponseBody) -> DispatchResult {
        grounded_result(body)
    }
}

/// Multi-turn completion. Always asks the backend to retrieve.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConversationalStrategy;

impl ModeStrategy for ConversationalStrategy {
    fn mode(&self) -> ChatMode {
        ChatMode::Conversational
    }

    fn endpoint(&self) -> &str {
        CONVERSATION_ENDPOINT
    }

    fn build_payload(&self, req: &TurnRequest<'_>) -> Result<Value> {
        Ok(serde_json::to_value(ConversationRequest {
            message: req.text,
            user_id: req.user_id,
            chat_history: req.history,
            use_rag: true,
            n_results: req.config.result_count,
            use_rerank: req.config.use_rerank,
        })?)
    }

    fn map_response(&self, body: ChatResponseBody) -> DispatchResult {
        grounded_result(body)
    }
}

fn grounded_result(body: ChatResponseBody) -> DispatchResult {
    let sources = body.sources.unwrap_or_default();
    let used_retrieval = body.found_documents.unwrap_or(!sources.is_empty());
    DispatchResult {
        text: body.response,
        metadata: body.metadatas.unwrap_or_default(),
        sources,
        used_retrieval,
        reranked: body.reranked.unwrap_or(false),
    }
}

// ─── Service ─────────────────────────────────────────────────

/// The session-facing service object: a transport, the user identifier
/// stamped on every request, and the mode strategies.
pub struct ChatService {
    backend: Rc<dyn BackendPort>,
    user_id: String,
    strategies: HashMap<ChatMode, Box<dyn ModeStrategy>>,
}

impl ChatService {
    /// Service with all built-in modes registered.
    pub fn new(backend: Rc<dyn BackendPort>) -> Self {
        let mut service = Self::bare(backend);
        service.register(Box::new(SimpleStrategy));
        service.register(Box::new(RetrievalStrategy::primary()));
        service.register(Box::new(RetrievalStrategy::alternate_index()));
        service.register(Box::new(ConversationalStrategy));
        service
    }

    /// Service with no modes registered.
    pub fn bare(backend: Rc<dyn BackendPort>) -> Self {
        let user_id = new_user_id();
        info!("Chat service created for {} ({})", backend.base_url(), user_id);
        Self {
            backend,
            user_id,
            strategies: HashMap::new(),
        }
    }

    /// Add or replace the strategy for its mode. Returns the replaced one.
    pub fn register(&mut self, strategy: Box<dyn ModeStrategy>) -> Option<Box<dyn ModeStrategy>> {
        self.strategies.insert(strategy.mode(), strategy)
    }

    pub fn supports(&self, mode: ChatMode) -> bool {
        self.strategies.contains_key(&mode)
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn backend(&self) -> &dyn BackendPort {
        self.backend.as_ref()
    }

    /// Send one turn. `history` is the conversation *before* this turn.
    pub async fn dispatch(
        &self,
        text: &str,
        config: &ChatConfig,
        history: &[HistoryTurn],
    ) -> Result<DispatchResult> {
        let strategy = self.strategies.get(&config.mode).ok_or_else(|| {
            ChatError::Config(format!("unsupported chat mode: {}", config.mode))
        })?;

        let req = TurnRequest {
            text,
            user_id: &self.user_id,
            config,
            history,
        };
        let payload = strategy.build_payload(&req)?;

        debug!(
            "Dispatching {} turn to {} (provider={}, history={})",
            config.mode,
            strategy.endpoint(),
            config.provider.id(),
            history.len()
        );

        let reply = self
            .backend
            .post_json(
                strategy.endpoint(),
                &[("provider", config.provider.id())],
                &payload,
            )
            .await
            .map_err(|e| {
                warn!("Transport failure on {}: {}", strategy.endpoint(), e);
                if e.is_transport() {
                    e
                } else {
                    ChatError::Network(e.to_string())
                }
            })?;

        let body = decode_reply(reply)?;
        Ok(strategy.map_response(body))
    }
}

/// Turn a raw reply into a response body or a server-reported failure.
fn decode_reply(reply: HttpReply) -> Result<ChatResponseBody> {
    if !reply.is_success() {
        let detail = serde_json::from_str::<ErrorBody>(&reply.body)
            .ok()
            .and_then(|b| b.detail_text())
            .unwrap_or_else(|| {
                format!("Server error: {} {}", reply.status, reply.status_text)
                    .trim_end()
                    .to_string()
            });
        warn!("Backend answered {}: {}", reply.status, detail);
        return Err(ChatError::Server {
            status: reply.status,
            detail,
        });
    }

    let body: ChatResponseBody = serde_json::from_str(&reply.body)?;
    if body.success == Some(false) {
        let detail = if body.response.trim().is_empty() {
            "Backend reported an unsuccessful response".to_string()
        } else {
            body.response
        };
        return Err(ChatError::Server {
            status: reply.status,
            detail,
        });
    }
    Ok(body)
}
