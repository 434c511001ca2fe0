//! Headless host adapter for non-interactive hosts and tests.

use std::cell::Cell;

use chat_core::ports::HostPort;

/// Answers every confirmation with a fixed policy and records restart
/// requests instead of performing them.
pub struct HeadlessHost {
    accept: bool,
    restarted: Cell<bool>,
}

impl HeadlessHost {
    /// Host that confirms every prompt.
    pub fn accepting() -> Self {
        Self {
            accept: true,
            restarted: Cell::new(false),
        }
    }

    /// Host that declines every prompt.
    pub fn declining() -> Self {
        Self {
            accept: false,
            restarted: Cell::new(false),
        }
    }

    pub fn restart_requested(&self) -> bool {
        self.restarted.get()
    }
}

impl HostPort for HeadlessHost {
    fn confirm(&self, prompt: &str) -> bool {
        log::debug!("auto-{} confirmation: {}", if self.accept { "accepting" } else { "declining" }, prompt);
        self.accept
    }

    fn restart(&self) {
        self.restarted.set(true);
    }
}
