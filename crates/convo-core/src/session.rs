//! Session controller — owns the observable session state and drives the
//! turn lifecycle:
//!
//! 1. Append the user turn (optimistic write)
//! 2. Enter `sending`: loading on, error cleared
//! 3. Dispatch with the history as it was before this turn
//! 4. Append the assistant turn, or record the error and roll back
//! 5. Leave `sending`: loading off, on every exit path
//!
//! Per-turn failures never escape `send_message`; they land in `last_error`.

use log::{info, warn};

use convo_types::{
    config::{ChatConfig, ConfigPatch},
    event::SessionEvent,
    message::{HistoryTurn, Message},
    ChatError, Result,
};

use crate::dispatcher::{ChatService, DispatchResult};
use crate::event_bus::EventBus;
use crate::message_log::MessageLog;
use crate::ports::SettingsPort;
use crate::probe::HealthProbe;

/// Everything a renderer needs to draw the session.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub messages: MessageLog,
    pub config: ChatConfig,
    pub is_loading: bool,
    pub last_error: Option<String>,
    /// Result of the last health probe; `false` until the first one
    pub is_backend_available: bool,
}

/// What happened to a `send_message` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Input was empty after trimming; nothing changed
    Ignored,
    /// The assistant turn was appended
    Replied,
    /// The user turn was rolled back and `last_error` set
    Failed,
}

pub struct SessionController {
    state: SessionState,
    event_bus: EventBus,
    probe: HealthProbe,
    /// Availability advisory, while it is the displayed `last_error`
    advisory: Option<String>,
}

impl SessionController {
    pub fn new(config: ChatConfig, event_bus: EventBus) -> Self {
        Self {
            state: SessionState {
                messages: MessageLog::new(),
                config,
                is_loading: false,
                last_error: None,
                is_backend_available: false,
            },
            event_bus,
            probe: HealthProbe,
            advisory: None,
        }
    }

    // ─── Lifecycle ───────────────────────────────────────────

    /// Empty the log, then probe the backend. An unreachable backend leaves
    /// the session usable with an advisory in `last_error`.
    pub async fn initialize(&mut self, service: &ChatService) {
        self.state.messages.reset();
        self.event_bus.emit(SessionEvent::Cleared);
        self.advisory = None;
        self.set_error(None);

        let available = self.probe.check(service).await;
        self.record_availability(available, service.backend().base_url());
        info!(
            "Session initialized (backend {})",
            if available { "available" } else { "unavailable" }
        );
    }

    /// Run one turn. Never returns an error; see [`TurnOutcome`].
    pub async fn send_message(&mut self, text: &str, service: &ChatService) -> TurnOutcome {
        let text = text.trim();
        if text.is_empty() {
            return TurnOutcome::Ignored;
        }

        let history: Vec<HistoryTurn> = self.state.messages.history().collect();
        let user_msg = Message::user(text);
        let pending_id = user_msg.id.clone();
        self.append(user_msg);

        let mut turn = TurnGuard::begin(self, pending_id);
        let config = turn.session.state.config.clone();

        let outcome = service.dispatch(text, &config, &history).await;
        match outcome {
            Ok(result) => {
                turn.commit(assistant_message(result, &config));
                TurnOutcome::Replied
            }
            Err(e) => {
                warn!("Turn failed: {}", e);
                turn.fail(&e);
                TurnOutcome::Failed
            }
        }
    }

    /// Probe now and record the result.
    pub async fn refresh_availability(&mut self, service: &ChatService) -> bool {
        let available = self.probe.check(service).await;
        self.record_availability(available, service.backend().base_url());
        available
    }

    /// Record a probe result obtained elsewhere (e.g. a periodic poller).
    ///
    /// An unavailable result shows an advisory in `last_error` when no other
    /// error is on display; a turn error is never replaced. A successful
    /// probe withdraws the advisory.
    pub fn record_availability(&mut self, available: bool, base_url: &str) {
        if self.state.is_backend_available != available {
            self.state.is_backend_available = available;
            self.event_bus
                .emit(SessionEvent::AvailabilityChanged { available });
        }

        if available {
            if self.advisory.take().is_some() {
                self.set_error(None);
            }
        } else if self.state.last_error.is_none() {
            let advisory = ChatError::Unavailable(base_url.to_string()).to_string();
            self.set_error(Some(advisory.clone()));
            self.advisory = Some(advisory);
        }
    }

    /// Shallow-merge into the config. Range checks belong to the caller;
    /// out-of-range result counts are clamped.
    pub fn update_config(&mut self, patch: ConfigPatch) {
        let before = self.state.config.clone();
        self.state.config.apply(patch);
        if self.state.config != before {
            self.event_bus.emit(SessionEvent::ConfigChanged {
                config: self.state.config.clone(),
            });
        }
    }

    /// Empty the log and clear `last_error`. No probe, no greeting.
    pub fn clear(&mut self) {
        self.state.messages.reset();
        self.event_bus.emit(SessionEvent::Cleared);
        self.advisory = None;
        self.set_error(None);
    }

    // ─── Settings ────────────────────────────────────────────

    /// Load a saved config, if the store has one. Returns whether it did.
    pub async fn restore_config(&mut self, store: &dyn SettingsPort) -> Result<bool> {
        match store.load().await? {
            Some(saved) => {
                self.update_config(ConfigPatch::from(saved));
                info!("Config restored from {}", store.backend_name());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub async fn persist_config(&self, store: &dyn SettingsPort) -> Result<()> {
        store.save(&self.state.config).await?;
        info!("Config saved to {}", store.backend_name());
        Ok(())
    }

    // ─── Read views ──────────────────────────────────────────

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn messages(&self) -> &MessageLog {
        &self.state.messages
    }

    pub fn message_count(&self) -> usize {
        self.state.messages.len()
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.state.messages.last()
    }

    pub fn config(&self) -> &ChatConfig {
        &self.state.config
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading
    }

    pub fn last_error(&self) -> Option<&str> {
        self.state.last_error.as_deref()
    }

    pub fn is_backend_available(&self) -> bool {
        self.state.is_backend_available
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    // ─── Internals ───────────────────────────────────────────

    fn append(&mut self, message: Message) {
        self.state.messages.append(message.clone());
        self.event_bus.emit(SessionEvent::MessageAppended { message });
    }

    /// Pop the newest message only if it is the one we expect.
    fn roll_back(&mut self, id: &str) {
        if self.state.messages.last().map(|m| m.id.as_str()) == Some(id) {
            self.state.messages.pop_last();
            self.event_bus
                .emit(SessionEvent::MessageRolledBack { id: id.to_string() });
        }
    }

    fn set_loading(&mut self, is_loading: bool) {
        if self.state.is_loading != is_loading {
            self.state.is_loading = is_loading;
            self.event_bus
                .emit(SessionEvent::LoadingChanged { is_loading });
        }
    }

    /// `advisory` tracks the advisory only while it is the error on display.
    fn set_error(&mut self, error: Option<String>) {
        if self.advisory.is_some() && self.advisory != error {
            self.advisory = None;
        }
        if self.state.last_error != error {
            self.state.last_error = error.clone();
            self.event_bus.emit(SessionEvent::ErrorChanged { error });
        }
    }
}

fn assistant_message(result: DispatchResult, config: &ChatConfig) -> Message {
    Message::assistant(result.text)
        .with_sources(result.sources, result.metadata)
        .with_provider(config.provider)
}

/// Holds the session in `sending`. Dropping it, on any path including a
/// cancelled future, rolls back an uncommitted user turn and clears loading.
struct TurnGuard<'a> {
    session: &'a mut SessionController,
    pending: Option<String>,
}

impl<'a> TurnGuard<'a> {
    fn begin(session: &'a mut SessionController, pending_id: String) -> Self {
        session.set_loading(true);
        session.set_error(None);
        Self {
            session,
            pending: Some(pending_id),
        }
    }

    fn commit(&mut self, reply: Message) {
        self.pending = None;
        self.session.append(reply);
    }

    fn fail(&mut self, error: &ChatError) {
        self.session.set_error(Some(error.to_string()));
        if let Some(id) = self.pending.take() {
            self.session.roll_back(&id);
        }
    }
}

impl Drop for TurnGuard<'_> {
    fn drop(&mut self) {
        if let Some(id) = self.pending.take() {
            self.session.roll_back(&id);
        }
        self.session.set_loading(false);
    }
}
