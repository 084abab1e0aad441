//! Notification display
//!
//! `render` is the display itself: a pure function of a message and a
//! severity, owning no timers. `NotificationSlot` is what callers use to hold
//! the current message and clear it after a delay.

use crate::lock;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tracing::debug;

/// Visual severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
}

impl Severity {
    /// Style class used by web renderers
    pub fn style_class(self) -> &'static str {
        match self {
            Severity::Success => "bg-green-500",
            Severity::Error => "bg-red-500",
        }
    }
}

/// A transient status message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Success,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Error,
        }
    }
}

/// What a renderer draws for a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToastView {
    pub message: String,
    pub severity: Severity,
    pub style_class: &'static str,
}

/// Render a notification. An absent or empty message renders nothing.
pub fn render(message: Option<&str>, severity: Severity) -> Option<ToastView> {
    let message = message.filter(|m| !m.is_empty())?;

    Some(ToastView {
        message: message.to_string(),
        severity,
        style_class: severity.style_class(),
    })
}

#[derive(Debug, Default)]
struct SlotState {
    current: Option<Notification>,
    // Bumped on every change; a pending clear only applies to the
    // notification it was scheduled for.
    generation: u64,
}

#[derive(Debug)]
struct SlotInner {
    state: Mutex<SlotState>,
    changes: watch::Sender<Option<Notification>>,
}

/// Holder for the notification a component is currently showing.
///
/// A new notification replaces the current one. Each `show` schedules its own
/// clear on the tokio runtime; the timer holds a weak reference, so a slot
/// that has been dropped is never written to.
#[derive(Debug, Clone)]
pub struct NotificationSlot {
    inner: Arc<SlotInner>,
}

impl Default for NotificationSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationSlot {
    pub fn new() -> Self {
        let (changes, _) = watch::channel(None);
        Self {
            inner: Arc::new(SlotInner {
                state: Mutex::new(SlotState::default()),
                changes,
            }),
        }
    }

    /// Display `notification` and clear it after `delay`.
    pub fn show(&self, notification: Notification, delay: Duration) {
        let generation = {
            let mut state = lock(&self.inner.state);
            state.generation += 1;
            state.current = Some(notification.clone());
            self.inner.changes.send_replace(Some(notification));
            state.generation
        };

        match Handle::try_current() {
            Ok(handle) => {
                let weak = Arc::downgrade(&self.inner);
                handle.spawn(async move {
                    tokio::time::sleep(delay).await;
                    clear_if_current(&weak, generation);
                });
            }
            Err(_) => debug!("No runtime; notification will stay until cleared"),
        }
    }

    /// Clear the current notification immediately.
    pub fn clear(&self) {
        let mut state = lock(&self.inner.state);
        state.generation += 1;
        state.current = None;
        self.inner.changes.send_replace(None);
    }

    /// The notification on screen, if any.
    pub fn current(&self) -> Option<Notification> {
        lock(&self.inner.state).current.clone()
    }

    /// Render the current notification.
    pub fn view(&self) -> Option<ToastView> {
        let current = self.current()?;
        render(Some(&current.message), current.severity)
    }

    /// Watch notifications as they appear and disappear.
    pub fn subscribe(&self) -> watch::Receiver<Option<Notification>> {
        self.inner.changes.subscribe()
    }
}

fn clear_if_current(weak: &Weak<SlotInner>, generation: u64) {
    let Some(inner) = weak.upgrade() else {
        return;
    };

    let mut state = lock(&inner.state);
    if state.generation == generation {
        state.current = None;
        inner.changes.send_replace(None);
    }
}
