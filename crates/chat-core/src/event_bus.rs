//! Simple event bus for decoupled communication between the session store
//! and the host UI.
//!
//! The bus is single-threaded and uses interior mutability via RefCell.
//! Events are buffered and drained by the host on each frame/tick; a drain
//! containing `SessionsChanged` is the host's cue to re-persist the store.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use chat_types::event::ChatEvent;

/// Shared event bus — clone-cheap via Rc.
#[derive(Clone)]
pub struct EventBus {
    inner: Rc<RefCell<VecDeque<ChatEvent>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(VecDeque::new())),
        }
    }

    /// Publish an event. Called by the store and controllers.
    pub fn emit(&self, event: ChatEvent) {
        self.inner.borrow_mut().push_back(event);
    }

    /// Drain all pending events. Called by the host each frame.
    pub fn drain(&self) -> Vec<ChatEvent> {
        self.inner.borrow_mut().drain(..).collect()
    }

    /// Check if there are pending events (useful for repaint triggers).
    pub fn has_pending(&self) -> bool {
        !self.inner.borrow().is_empty()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
