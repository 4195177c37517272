//! Browser adapters for the convo-core ports.
//!
//! * [`http::HttpBackend`]: `BackendPort` over `fetch()` via gloo-net
//! * [`settings`]: `SettingsPort` over localStorage, with an in-memory fallback
//! * [`poller::HealthPoller`]: periodic availability probe
//! * [`logging`]: console logger setup
//! * [`timer`]: duration clamping for browser timers

pub mod http;
pub mod logging;
pub mod poller;
pub mod settings;
pub mod timer;
