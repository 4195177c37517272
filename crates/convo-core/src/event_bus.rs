//! Queue of session state changes.
//!
//! The controller appends a `SessionEvent` for every observable change;
//! observers take the backlog with [`EventBus::drain`] and redraw from
//! `SessionController::state`. Clones share one queue.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use convo_types::event::SessionEvent;

#[derive(Clone, Default)]
pub struct EventBus {
    inner: Rc<RefCell<VecDeque<SessionEvent>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&self, event: SessionEvent) {
        self.inner.borrow_mut().push_back(event);
    }

    /// Take every queued event, oldest first.
    pub fn drain(&self) -> Vec<SessionEvent> {
        self.inner.borrow_mut().drain(..).collect()
    }

    pub fn has_pending(&self) -> bool {
        !self.inner.borrow().is_empty()
    }

    /// Most recent loading transition still in the buffer, if any
    pub fn last_loading(&self) -> Option<bool> {
        self.inner.borrow().iter().rev().find_map(|e| match e {
            SessionEvent::LoadingChanged { is_loading } => Some(*is_loading),
            _ => None,
        })
    }
}
