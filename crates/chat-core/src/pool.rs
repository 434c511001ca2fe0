//! Cancellation registry for in-flight streaming requests.
//!
//! At most one live handle per `(session_index, message_id)` key. The
//! controller checks membership before applying a delta: a missing entry
//! means the request was stopped and the message is settled.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::ports::CancelHandle;

type Key = (usize, u64);

/// Shared registry — clone-cheap via Rc. Never persisted.
#[derive(Clone, Default)]
pub struct ControllerPool {
    inner: Rc<RefCell<HashMap<Key, Box<dyn CancelHandle>>>>,
}

impl ControllerPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the cancel handle for a freshly issued request. Registering
    /// a second handle for the same key cancels and replaces the first, so a
    /// retry can never leak the previous in-flight request.
    pub fn register(&self, session_index: usize, message_id: u64, handle: Box<dyn CancelHandle>) {
        let key = (session_index, message_id);
        if let Some(old) = self.inner.borrow_mut().insert(key, handle) {
            log::warn!(
                "replacing live stream for session {} message {}",
                session_index,
                message_id
            );
            old.cancel();
        }
    }

    /// Cancel the registered request and drop its entry (stop/retry action).
    pub fn stop(&self, session_index: usize, message_id: u64) {
        if let Some(handle) = self.inner.borrow_mut().remove(&(session_index, message_id)) {
            handle.cancel();
        }
    }

    /// Drop the entry without cancelling (request completed or failed).
    pub fn remove(&self, session_index: usize, message_id: u64) {
        self.inner.borrow_mut().remove(&(session_index, message_id));
    }

    pub fn contains(&self, session_index: usize, message_id: u64) -> bool {
        self.inner.borrow().contains_key(&(session_index, message_id))
    }

    /// Cancel everything; used when all sessions are cleared.
    pub fn stop_all(&self) {
        for (_, handle) in self.inner.borrow_mut().drain() {
            handle.cancel();
        }
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }
}
