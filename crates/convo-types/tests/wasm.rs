//! WASM-target tests for convo-types.
//!
//! Exercises the pieces that touch platform randomness and clocks
//! (uuid, chrono) under wasm32-unknown-unknown via `wasm-pack test --node`.

use wasm_bindgen_test::*;

use convo_types::config::*;
use convo_types::error::*;
use convo_types::message::*;

// ─── Message Tests ───────────────────────────────────────

#[wasm_bindgen_test]
fn message_ids_use_platform_randomness() {
    let a = Message::user("one");
    let b = Message::user("two");
    assert_ne!(a.id, b.id);
    assert_eq!(a.id.len(), 36);
}

#[wasm_bindgen_test]
fn message_timestamps_use_platform_clock() {
    let first = Message::user("a");
    let second = Message::assistant("b");
    assert!(second.timestamp >= first.timestamp);
    assert!(first.timestamp.timestamp() > 1_600_000_000);
}

#[wasm_bindgen_test]
fn user_id_prefix() {
    assert!(new_user_id().starts_with("user-"));
}

#[wasm_bindgen_test]
fn message_roundtrip_keeps_sources() {
    let msg = Message::assistant("grounded")
        .with_sources(vec!["a.md".to_string(), "b.md".to_string()], Vec::new());
    let json = serde_json::to_string(&msg).unwrap();
    let back: Message = serde_json::from_str(&json).unwrap();
    assert_eq!(back.sources.len(), 2);
    assert_eq!(back.id, msg.id);
}

// ─── Config Tests ────────────────────────────────────────

#[wasm_bindgen_test]
fn config_patch_is_shallow_merge() {
    let config = ChatConfig::default().merged(ConfigPatch::mode(ChatMode::Simple));
    assert_eq!(config.mode, ChatMode::Simple);
    assert_eq!(config.result_count, 5);
    assert_eq!(config.provider, Provider::Llama);
}

#[wasm_bindgen_test]
fn unknown_mode_is_config_error() {
    assert!(matches!(
        "does-not-exist".parse::<ChatMode>(),
        Err(ChatError::Config(_))
    ));
}
