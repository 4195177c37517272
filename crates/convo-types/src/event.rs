use serde::{Deserialize, Serialize};

use crate::config::ChatConfig;
use crate::message::Message;

/// State-change notifications emitted by the session controller.
/// UI layers drain these and re-render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// A message was appended to the log
    MessageAppended { message: Message },
    /// The optimistic user turn was removed after a failed send
    MessageRolledBack { id: String },
    /// A send started (`true`) or finished (`false`)
    LoadingChanged { is_loading: bool },
    /// `last_error` was set or cleared
    ErrorChanged { error: Option<String> },
    /// A health probe changed the availability flag
    AvailabilityChanged { available: bool },
    ConfigChanged { config: ChatConfig },
    /// The log was emptied by `clear` or `initialize`
    Cleared,
}
