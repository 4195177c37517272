//! Chat configuration persistence.
//!
//! localStorage survives page reloads; the in-memory store is the
//! fallback when no browser storage is reachable.

use std::cell::RefCell;
use std::rc::Rc;

use async_trait::async_trait;
use gloo_utils::errors::JsError;
use log::{info, warn};
use wasm_bindgen::JsValue;

use convo_core::ports::SettingsPort;
use convo_types::{config::ChatConfig, ChatError, Result};

pub const CONFIG_STORAGE_KEY: &str = "convo:config";

// ─── Memory ──────────────────────────────────────────────────

/// Not persistent across page reloads.
#[derive(Default)]
pub struct MemorySettings {
    saved: RefCell<Option<String>>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait(?Send)]
impl SettingsPort for MemorySettings {
    async fn load(&self) -> Result<Option<ChatConfig>> {
        self.saved
            .borrow()
            .as_deref()
            .map(decode_config)
            .transpose()
    }

    async fn save(&self, config: &ChatConfig) -> Result<()> {
        *self.saved.borrow_mut() = Some(serde_json::to_string(config)?);
        Ok(())
    }

    fn backend_name(&self) -> &str {
        "memory"
    }
}

// ─── localStorage ────────────────────────────────────────────

pub struct LocalStorageSettings {
    storage: web_sys::Storage,
    key: String,
}

impl LocalStorageSettings {
    pub fn open() -> Result<Self> {
        Self::open_with_key(CONFIG_STORAGE_KEY)
    }

    pub fn open_with_key(key: &str) -> Result<Self> {
        let window = web_sys::window()
            .ok_or_else(|| ChatError::Storage("No window object".to_string()))?;
        let storage = window
            .local_storage()
            .map_err(storage_error)?
            .ok_or_else(|| ChatError::Storage("localStorage not available".to_string()))?;
        Ok(Self {
            storage,
            key: key.to_string(),
        })
    }
}

#[async_trait(?Send)]
impl SettingsPort for LocalStorageSettings {
    async fn load(&self) -> Result<Option<ChatConfig>> {
        match self.storage.get_item(&self.key).map_err(storage_error)? {
            Some(json) => decode_config(&json).map(Some),
            None => Ok(None),
        }
    }

    async fn save(&self, config: &ChatConfig) -> Result<()> {
        let json = serde_json::to_string(config)?;
        self.storage
            .set_item(&self.key, &json)
            .map_err(storage_error)
    }

    fn backend_name(&self) -> &str {
        "localstorage"
    }
}

/// Best available store: localStorage, else memory.
pub fn open_settings() -> Rc<dyn SettingsPort> {
    match LocalStorageSettings::open() {
        Ok(store) => {
            info!("Settings backend: localStorage");
            Rc::new(store)
        }
        Err(e) => {
            warn!("localStorage unavailable ({}), falling back to memory", e);
            Rc::new(MemorySettings::new())
        }
    }
}

fn decode_config(json: &str) -> Result<ChatConfig> {
    serde_json::from_str(json).map_err(|e| ChatError::Storage(format!("corrupt saved config: {}", e)))
}

fn storage_error(value: JsValue) -> ChatError {
    let message = match JsError::try_from(value) {
        Ok(err) => err.to_string(),
        Err(other) => format!("{}", other),
    };
    ChatError::Storage(message)
}
