//! WASM-target tests for convo-platform (Node.js runtime).
//!
//! Tests MemorySettings, URL handling and the health poller under
//! wasm32-unknown-unknown via `wasm-pack test --node`.
//!
//! localStorage and fetch need a browser and are not exercised here.

use wasm_bindgen_test::*;

use convo_core::dispatcher::ChatService;
use convo_core::event_bus::EventBus;
use convo_core::ports::{BackendPort, HttpReply, SettingsPort};
use convo_core::session::SessionController;
use convo_platform::http::{join_url, HttpBackend};
use convo_platform::poller::HealthPoller;
use convo_platform::settings::MemorySettings;
use convo_types::config::*;
use convo_types::ChatError;

use async_trait::async_trait;
use gloo_timers::future::TimeoutFuture;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

// ─── MemorySettings Tests ────────────────────────────────

#[wasm_bindgen_test]
fn memory_settings_backend_name() {
    assert_eq!(MemorySettings::new().backend_name(), "memory");
}

#[wasm_bindgen_test]
async fn memory_settings_empty_load() {
    let store = MemorySettings::new();
    assert!(store.load().await.unwrap().is_none());
}

#[wasm_bindgen_test]
async fn memory_settings_save_and_load() {
    let store = MemorySettings::new();
    let config = ChatConfig::default().merged(ConfigPatch {
        provider: Some(Provider::Gemini),
        mode: Some(ChatMode::Conversational),
        result_count: Some(12),
        use_rerank: Some(true),
    });
    store.save(&config).await.unwrap();
    assert_eq!(store.load().await.unwrap(), Some(config));
}

#[wasm_bindgen_test]
async fn memory_settings_overwrite() {
    let store = MemorySettings::new();
    store.save(&ChatConfig::default()).await.unwrap();
    let updated = ChatConfig::default().merged(ConfigPatch::use_rerank(true));
    store.save(&updated).await.unwrap();
    assert!(store.load().await.unwrap().unwrap().use_rerank);
}

#[wasm_bindgen_test]
async fn session_round_trips_config_through_store() {
    let store = MemorySettings::new();
    let mut first = SessionController::new(ChatConfig::default(), EventBus::new());
    first.update_config(ConfigPatch::provider(Provider::Gemini));
    first.persist_config(&store).await.unwrap();

    let mut second = SessionController::new(ChatConfig::default(), EventBus::new());
    assert!(second.restore_config(&store).await.unwrap());
    assert_eq!(second.config().provider, Provider::Gemini);
}

// ─── HTTP URL Tests ──────────────────────────────────────

#[wasm_bindgen_test]
fn join_url_single_slash() {
    assert_eq!(join_url("http://h:8000", "/health"), "http://h:8000/health");
    assert_eq!(join_url("http://h:8000/", "/health"), "http://h:8000/health");
    assert_eq!(join_url("http://h:8000", "health"), "http://h:8000/health");
    assert_eq!(join_url("http://h:8000/", ""), "http://h:8000");
}

#[wasm_bindgen_test]
fn http_backend_from_config() {
    let backend = HttpBackend::from_config(&ClientConfig {
        base_url: "https://chat.example.org/".to_string(),
        request_timeout_ms: 5_000,
        health_interval_ms: 1_000,
    });
    assert_eq!(backend.base_url(), "https://chat.example.org");
    assert_eq!(backend.timeout_ms(), 5_000);
    assert_eq!(
        backend.url_for("/api/v1/chat/simple"),
        "https://chat.example.org/api/v1/chat/simple"
    );
}

// ─── HealthPoller Tests ──────────────────────────────────

struct FlakyBackend {
    healthy: Cell<bool>,
    probes: Cell<u32>,
}

#[async_trait(?Send)]
impl BackendPort for FlakyBackend {
    async fn post_json(
        &self,
        _path: &str,
        _query: &[(&str, &str)],
        _body: &serde_json::Value,
    ) -> convo_types::Result<HttpReply> {
        Err(ChatError::Network("not scripted".to_string()))
    }

    async fn get(&self, _path: &str) -> convo_types::Result<HttpReply> {
        self.probes.set(self.probes.get() + 1);
        if self.healthy.get() {
            Ok(HttpReply { status: 200, status_text: "OK".to_string(), body: String::new() })
        } else {
            Ok(HttpReply {
                status: 503,
                status_text: "Service Unavailable".to_string(),
                body: String::new(),
            })
        }
    }

    fn base_url(&self) -> &str {
        "http://flaky"
    }
}

fn poller_fixture(healthy: bool) -> (Rc<FlakyBackend>, Rc<ChatService>, Rc<RefCell<SessionController>>) {
    let backend = Rc::new(FlakyBackend {
        healthy: Cell::new(healthy),
        probes: Cell::new(0),
    });
    let service = Rc::new(ChatService::new(backend.clone()));
    let session = Rc::new(RefCell::new(SessionController::new(
        ChatConfig::default(),
        EventBus::new(),
    )));
    (backend, service, session)
}

#[wasm_bindgen_test]
async fn poller_records_recovery() {
    let (backend, service, session) = poller_fixture(false);
    let poller = HealthPoller::spawn(session.clone(), service, 10);

    TimeoutFuture::new(40).await;
    assert!(!session.borrow().is_backend_available());
    assert!(session.borrow().last_error().unwrap().contains("http://flaky"));

    backend.healthy.set(true);
    TimeoutFuture::new(40).await;
    assert!(session.borrow().is_backend_available());
    assert!(session.borrow().last_error().is_none());

    poller.stop();
}

#[wasm_bindgen_test]
async fn poller_stops_when_dropped() {
    let (backend, service, session) = poller_fixture(true);
    let poller = HealthPoller::spawn(session.clone(), service, 10);
    drop(poller);

    TimeoutFuture::new(40).await;
    assert_eq!(backend.probes.get(), 0);
    assert!(!session.borrow().is_backend_available());
}

#[wasm_bindgen_test]
async fn poller_skips_borrowed_session() {
    let (backend, service, session) = poller_fixture(true);
    let poller = HealthPoller::spawn(session.clone(), service, 10);

    {
        let _held = session.borrow_mut();
        TimeoutFuture::new(40).await;
    }
    assert!(backend.probes.get() > 0);
    assert!(!session.borrow().is_backend_available());

    TimeoutFuture::new(40).await;
    assert!(session.borrow().is_backend_available());
    poller.stop();
}

#[wasm_bindgen_test]
async fn poller_from_config_floors_zero_interval() {
    let (backend, service, session) = poller_fixture(true);
    let config = ClientConfig {
        health_interval_ms: 0,
        ..ClientConfig::default()
    };
    let poller = HealthPoller::from_config(session.clone(), service, &config);

    TimeoutFuture::new(40).await;
    assert_eq!(backend.probes.get(), 0);
    poller.stop();
}
