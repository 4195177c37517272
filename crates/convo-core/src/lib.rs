pub mod ports;
pub mod event_bus;
pub mod message_log;
pub mod dispatcher;
pub mod probe;
pub mod session;
