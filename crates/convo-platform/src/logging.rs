//! Route the `log` facade to the browser console.

pub use log::Level;

/// Install the console logger. Later calls are ignored by wasm-logger.
pub fn init(level: Level) {
    wasm_logger::init(wasm_logger::Config::new(level));
    log::info!("Logging initialized at {}", level);
}

/// Console logger limited to records from modules under `prefix`.
pub fn init_scoped(level: Level, prefix: &str) {
    wasm_logger::init(wasm_logger::Config::new(level).module_prefix(prefix));
}
