//! Transient banner with a single cancellable auto-hide.

use std::time::Duration;

use tokio::task::JoinHandle;

pub const DEFAULT_HIDE_DELAY: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationState {
    pub visible: bool,
    pub message: String,
}

pub fn created_message(name: &str) -> String {
    format!("User {name} has been created successfully!")
}

/// Identifies the `show` a scheduled hide was armed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HideTicket(u64);

/// Holds the banner state and at most one pending hide task. Every `show`
/// or `hide` aborts the pending task and moves to a new ticket, so a hide
/// armed for an older message can neither run nor match.
#[derive(Debug, Default)]
pub struct NotificationTimer {
    state: NotificationState,
    ticket: u64,
    pending: Option<JoinHandle<()>>,
}

impl NotificationTimer {
    pub fn state(&self) -> &NotificationState {
        &self.state
    }

    pub fn has_pending_hide(&self) -> bool {
        self.pending.as_ref().is_some_and(|task| !task.is_finished())
    }

    pub fn show(&mut self, message: impl Into<String>) -> HideTicket {
        self.cancel_pending();
        self.ticket += 1;
        self.state = NotificationState {
            visible: true,
            message: message.into(),
        };
        HideTicket(self.ticket)
    }

    /// Stores the task that will call [`Self::expire`] for `ticket`. A task
    /// armed for a superseded ticket is aborted immediately.
    pub fn arm(&mut self, ticket: HideTicket, task: JoinHandle<()>) {
        if ticket.0 == self.ticket {
            self.cancel_pending();
            self.pending = Some(task);
        } else {
            task.abort();
        }
    }

    /// User-initiated hide. Returns whether the banner was visible.
    pub fn hide(&mut self) -> bool {
        self.cancel_pending();
        self.ticket += 1;
        std::mem::take(&mut self.state.visible)
    }

    /// Scheduled hide. Only the ticket of the latest `show` has any effect.
    pub fn expire(&mut self, ticket: HideTicket) -> bool {
        if ticket.0 != self.ticket || !self.state.visible {
            return false;
        }
        // Called from the pending task itself; detach rather than abort.
        self.pending = None;
        self.state.visible = false;
        true
    }

    fn cancel_pending(&mut self) {
        if let Some(task) = self.pending.take() {
            task.abort();
        }
    }
}

impl Drop for NotificationTimer {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

#[cfg(test)]
#[path = "tests/notification_tests.rs"]
mod tests;
