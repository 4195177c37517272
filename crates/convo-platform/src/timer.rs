//! Millisecond conversions for gloo-timers.
//!
//! `setTimeout` takes a signed 32-bit delay and fires at once when given
//! anything larger, so every configured duration is clamped here first.

/// Largest delay `setTimeout` honors
pub const MAX_TIMER_MS: u32 = i32::MAX as u32;

/// Shortest gap between two health probes built from a [`ClientConfig`]
///
/// [`ClientConfig`]: convo_types::config::ClientConfig
pub const MIN_POLL_INTERVAL_MS: u32 = 1_000;

/// Clamp a configured duration to what a browser timer can wait.
pub fn timer_millis(ms: u64) -> u32 {
    ms.min(u64::from(MAX_TIMER_MS)) as u32
}

/// Health poll interval; zero and other too-short values are floored.
pub fn poll_interval_millis(ms: u64) -> u32 {
    timer_millis(ms).max(MIN_POLL_INTERVAL_MS)
}
