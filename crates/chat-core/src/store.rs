//! The session store — single source of truth for sessions, the active
//! index, and config.
//!
//! The store is a clone-cheap handle over `Rc<RefCell<_>>`, constructed once
//! at startup and passed to every collaborator (no ambient globals). All
//! mutation funnels through methods that take one `borrow_mut` scope each;
//! since scheduling is single-threaded and non-preemptible, every mutation
//! commits atomically relative to other synchronous code and readers only
//! ever observe a fully-committed snapshot.

use std::cell::RefCell;
use std::rc::Rc;

use chrono::{DateTime, Duration, Utc};
use chat_types::config::ChatConfig;
use chat_types::event::ChatEvent;
use chat_types::message::Message;
use chat_types::session::{priming_context, ChatSession, ChatStat, DEFAULT_TOPIC};
use chat_types::Result;

use crate::event_bus::EventBus;
use crate::persist;
use crate::ports::{HostPort, StoragePort};

const CONFIRM_DELETE: &str = "Delete this chat?";
const CONFIRM_CLEAR_ALL: &str = "Clear all chats and settings?";

/// How long a deleted session can still be reverted.
const REVERT_WINDOW_SECS: i64 = 5;

/// A deleted session kept around for the revert window.
struct PendingRevert {
    session: ChatSession,
    index: usize,
    /// The deletion replaced the last remaining session with a fresh one;
    /// reverting must drop that fresh session again.
    was_last: bool,
    deadline: DateTime<Utc>,
}

struct StoreState {
    sessions: Vec<ChatSession>,
    current_session_index: usize,
    config: ChatConfig,
    next_message_id: u64,
    pending_revert: Option<PendingRevert>,
}

impl StoreState {
    fn clamp_index(&mut self) {
        if self.current_session_index >= self.sessions.len() {
            self.current_session_index = self.sessions.len().saturating_sub(1);
        }
    }
}

/// Shared session store — clone-cheap via Rc.
#[derive(Clone)]
pub struct ChatStore {
    state: Rc<RefCell<StoreState>>,
    bus: EventBus,
}

impl ChatStore {
    pub fn new(config: ChatConfig) -> Self {
        Self::from_parts(vec![ChatSession::new()], 0, config)
    }

    pub(crate) fn from_parts(
        sessions: Vec<ChatSession>,
        current_session_index: usize,
        config: ChatConfig,
    ) -> Self {
        // Seed the id allocator past anything already in the history.
        let max_id = sessions
            .iter()
            .flat_map(|s| s.messages.iter())
            .map(|m| m.id)
            .max()
            .unwrap_or(0);

        let mut state = StoreState {
            sessions,
            current_session_index,
            config,
            next_message_id: max_id + 1,
            pending_revert: None,
        };
        if state.sessions.is_empty() {
            state.sessions.push(ChatSession::new());
        }
        state.clamp_index();

        Self {
            state: Rc::new(RefCell::new(state)),
            bus: EventBus::new(),
        }
    }

    pub fn events(&self) -> EventBus {
        self.bus.clone()
    }

    // ─── Ids ─────────────────────────────────────────────────

    /// Allocate one monotonic message id.
    pub fn next_message_id(&self) -> u64 {
        let mut st = self.state.borrow_mut();
        let id = st.next_message_id;
        st.next_message_id += 1;
        id
    }

    /// Allocate the (user, assistant) id pair for one turn. The assistant id
    /// is always `user_id + 1` so stop/retry can address it unambiguously.
    pub fn next_message_pair(&self) -> (u64, u64) {
        let mut st = self.state.borrow_mut();
        let user_id = st.next_message_id;
        st.next_message_id += 2;
        (user_id, user_id + 1)
    }

    // ─── Session CRUD ────────────────────────────────────────

    pub fn session_count(&self) -> usize {
        self.state.borrow().sessions.len()
    }

    pub fn current_session_index(&self) -> usize {
        let mut st = self.state.borrow_mut();
        st.clamp_index();
        st.current_session_index
    }

    /// Snapshot of the active session.
    pub fn current_session(&self) -> ChatSession {
        let mut st = self.state.borrow_mut();
        st.clamp_index();
        st.sessions[st.current_session_index].clone()
    }

    /// Snapshot of an arbitrary session, if the index is still in bounds.
    pub fn session_at(&self, index: usize) -> Option<ChatSession> {
        self.state.borrow().sessions.get(index).cloned()
    }

    /// Read the active session and config without cloning.
    pub fn with_current<R>(&self, f: impl FnOnce(&ChatSession, &ChatConfig) -> R) -> R {
        let mut st = self.state.borrow_mut();
        st.clamp_index();
        let index = st.current_session_index;
        f(&st.sessions[index], &st.config)
    }

    /// Insert a fresh session at the front and select it.
    pub fn new_session(&self) {
        {
            let mut st = self.state.borrow_mut();
            st.sessions.insert(0, ChatSession::new());
            st.current_session_index = 0;
        }
        self.bus.emit(ChatEvent::SessionsChanged);
    }

    pub fn select_session(&self, index: usize) {
        {
            let mut st = self.state.borrow_mut();
            st.current_session_index = index;
            st.clamp_index();
        }
        self.bus.emit(ChatEvent::SessionsChanged);
    }

    /// Remove session `index`. The list is never left empty: removing the
    /// last remaining session replaces it with a fresh one.
    pub fn remove_session(&self, index: usize) {
        {
            let mut st = self.state.borrow_mut();
            if index >= st.sessions.len() {
                return;
            }
            if st.sessions.len() == 1 {
                st.sessions = vec![ChatSession::new()];
                st.current_session_index = 0;
            } else {
                st.sessions.remove(index);
                if index < st.current_session_index {
                    st.current_session_index -= 1;
                }
                st.clamp_index();
            }
        }
        self.bus.emit(ChatEvent::SessionsChanged);
    }

    /// Reorder the list; the active index keeps pointing at the same
    /// logical session.
    pub fn move_session(&self, from: usize, to: usize) {
        {
            let mut st = self.state.borrow_mut();
            if from >= st.sessions.len() || to >= st.sessions.len() {
                return;
            }
            let session = st.sessions.remove(from);
            st.sessions.insert(to, session);

            let old_index = st.current_session_index;
            let mut new_index = if old_index == from { to } else { old_index };
            if old_index > from && old_index <= to {
                new_index -= 1;
            } else if old_index < from && old_index >= to {
                new_index += 1;
            }
            st.current_session_index = new_index;
        }
        self.bus.emit(ChatEvent::SessionsChanged);
    }

    /// Delete a session behind a confirmation, keeping it revertible for a
    /// short window.
    pub fn delete_session(&self, index: Option<usize>, host: &dyn HostPort) {
        if !host.confirm(CONFIRM_DELETE) {
            return;
        }
        let (index, deadline) = {
            let mut st = self.state.borrow_mut();
            st.clamp_index();
            let index = index.unwrap_or(st.current_session_index);
            if index >= st.sessions.len() {
                return;
            }
            let deadline = Utc::now() + Duration::seconds(REVERT_WINDOW_SECS);
            st.pending_revert = Some(PendingRevert {
                session: st.sessions[index].clone(),
                index,
                was_last: st.sessions.len() == 1,
                deadline,
            });
            (index, deadline)
        };
        self.remove_session(index);
        self.bus.emit(ChatEvent::SessionDeleted {
            index,
            revert_deadline: deadline.to_rfc3339(),
        });
    }

    /// Undo the last `delete_session` if the revert window has not passed.
    pub fn revert_delete(&self) {
        self.revert_delete_at(Utc::now());
    }

    pub(crate) fn revert_delete_at(&self, now: DateTime<Utc>) {
        let reverted = {
            let mut st = self.state.borrow_mut();
            match st.pending_revert.take() {
                Some(p) if now <= p.deadline => {
                    let at = p.index.min(st.sessions.len());
                    st.sessions.insert(at, p.session);
                    if p.was_last {
                        // Drop the fresh session the deletion created.
                        let fresh = at + 1;
                        if fresh < st.sessions.len() {
                            st.sessions.remove(fresh);
                        }
                    }
                    st.clamp_index();
                    true
                }
                _ => false,
            }
        };
        if reverted {
            self.bus.emit(ChatEvent::SessionsChanged);
        }
    }

    /// Replace everything with a single fresh session.
    pub fn clear_sessions(&self) {
        {
            let mut st = self.state.borrow_mut();
            st.sessions = vec![ChatSession::new()];
            st.current_session_index = 0;
        }
        self.bus.emit(ChatEvent::SessionsChanged);
    }

    // ─── Session mutation ────────────────────────────────────

    /// The single sanctioned way to change the active session's contents.
    pub fn update_current_session(&self, updater: impl FnOnce(&mut ChatSession)) {
        {
            let mut st = self.state.borrow_mut();
            st.clamp_index();
            let index = st.current_session_index;
            updater(&mut st.sessions[index]);
        }
        self.bus.emit(ChatEvent::SessionsChanged);
    }

    /// Mutate a session addressed by index; used by in-flight streams whose
    /// session may no longer be the active one.
    pub fn update_session(&self, index: usize, updater: impl FnOnce(&mut ChatSession)) {
        {
            let mut st = self.state.borrow_mut();
            let Some(session) = st.sessions.get_mut(index) else {
                return;
            };
            updater(session);
        }
        self.bus.emit(ChatEvent::SessionsChanged);
    }

    /// Mutate one message addressed by `(session_index, message_id)`.
    /// Returns false when either no longer exists.
    pub fn update_message(
        &self,
        session_index: usize,
        message_id: u64,
        updater: impl FnOnce(&mut Message),
    ) -> bool {
        let found = {
            let mut st = self.state.borrow_mut();
            st.sessions
                .get_mut(session_index)
                .and_then(|s| s.message_mut(message_id))
                .map(updater)
                .is_some()
        };
        if found {
            self.bus.emit(ChatEvent::MessageUpdated {
                session_index,
                message_id,
            });
        }
        found
    }

    /// Post-turn bookkeeping: bump the session clock and fold the finished
    /// message into the derived counters.
    pub fn on_new_message(&self, session_index: usize, message: &Message) {
        self.update_session(session_index, |session| {
            session.last_update = Utc::now().to_rfc3339();
            session.stat.add_message(message);
        });
    }

    /// Clear the active session back to its just-created shape.
    pub fn reset_session(&self) {
        self.update_current_session(|session| {
            session.messages.clear();
            session.memory_prompt.clear();
            session.context = priming_context();
            session.topic = DEFAULT_TOPIC.to_string();
            session.stat = ChatStat::default();
            session.last_summarize_index = 0;
        });
    }

    // ─── Config ──────────────────────────────────────────────

    pub fn config(&self) -> ChatConfig {
        self.state.borrow().config.clone()
    }

    pub fn update_config(&self, updater: impl FnOnce(&mut ChatConfig)) {
        {
            let mut st = self.state.borrow_mut();
            updater(&mut st.config);
            st.config.model.validate();
        }
        self.bus.emit(ChatEvent::SessionsChanged);
    }

    pub fn reset_config(&self) {
        self.update_config(|config| *config = ChatConfig::default());
    }

    // ─── Persistence hooks ───────────────────────────────────

    pub(crate) fn snapshot_parts(&self) -> (Vec<ChatSession>, usize, ChatConfig) {
        let st = self.state.borrow();
        (
            st.sessions.clone(),
            st.current_session_index,
            st.config.clone(),
        )
    }

    /// Wipe sessions, config, and the persisted snapshot, then ask the host
    /// to restart.
    pub async fn clear_all_data(
        &self,
        storage: &dyn StoragePort,
        host: &dyn HostPort,
    ) -> Result<()> {
        if !host.confirm(CONFIRM_CLEAR_ALL) {
            return Ok(());
        }
        storage.delete(persist::STORE_KEY).await?;
        {
            let mut st = self.state.borrow_mut();
            st.sessions = vec![ChatSession::new()];
            st.current_session_index = 0;
            st.config = ChatConfig::default();
        }
        self.bus.emit(ChatEvent::SessionsChanged);
        host.restart();
        Ok(())
    }
}
