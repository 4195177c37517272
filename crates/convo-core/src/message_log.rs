//! Ordered message log.
//!
//! Insertion order is conversation order. Messages are never edited;
//! the only removals are `pop_last` (rollback) and `reset`.

use std::slice;

use convo_types::message::{HistoryTurn, Message, Role};

#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    messages: Vec<Message>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append to the end. A timestamp older than the current tail is
    /// raised to the tail's so the log stays non-decreasing in time.
    pub fn append(&mut self, mut message: Message) {
        if let Some(last) = self.messages.last() {
            if message.timestamp < last.timestamp {
                message.timestamp = last.timestamp;
            }
        }
        self.messages.push(message);
    }

    /// Remove and return the newest message; `None` on an empty log.
    pub fn pop_last(&mut self) -> Option<Message> {
        self.messages.pop()
    }

    pub fn reset(&mut self) {
        self.messages.clear();
    }

    /// Prior turns in the shape the backend receives, `system` entries excluded.
    /// Cloning the iterator restarts it from the current position.
    pub fn history(&self) -> History<'_> {
        History {
            inner: self.messages.iter(),
        }
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn iter(&self) -> slice::Iter<'_, Message> {
        self.messages.iter()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }
}

impl<'a> IntoIterator for &'a MessageLog {
    type Item = &'a Message;
    type IntoIter = slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

/// Lazy view over the log yielding [`HistoryTurn`]s.
#[derive(Debug, Clone)]
pub struct History<'a> {
    inner: slice::Iter<'a, Message>,
}

impl Iterator for History<'_> {
    type Item = HistoryTurn;

    fn next(&mut self) -> Option<HistoryTurn> {
        self.inner
            .by_ref()
            .find(|m| m.role != Role::System)
            .map(HistoryTurn::from)
    }
}
