//! User-facing notifications.
//!
//! The store reports every failed operation through a [`NotificationSink`].
//! Sinks are fire-and-forget: nothing they return is consumed.

use std::sync::{Arc, Mutex, PoisonError};

/// How prominently a notification should be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Error,
    Warning,
    Info,
}

/// A message shown to the shopper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
}

/// Destination for transient user-facing messages (toasts).
pub trait NotificationSink: Send + Sync {
    /// Show `message` to the user.
    fn display(&self, message: &str, severity: Severity);
}

impl<T: NotificationSink + ?Sized> NotificationSink for Arc<T> {
    fn display(&self, message: &str, severity: Severity) {
        (**self).display(message, severity);
    }
}

/// Sink that emits notifications as `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl NotificationSink for TracingNotifier {
    fn display(&self, message: &str, severity: Severity) {
        match severity {
            Severity::Error => tracing::error!(target: "rocket_shoes_cart::notify", "{message}"),
            Severity::Warning => tracing::warn!(target: "rocket_shoes_cart::notify", "{message}"),
            Severity::Info => tracing::info!(target: "rocket_shoes_cart::notify", "{message}"),
        }
    }
}

/// Sink that records notifications for later rendering or inspection.
///
/// Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemoryNotifier {
    notifications: Arc<Mutex<Vec<Notification>>>,
}

impl MemoryNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All notifications recorded so far, oldest first.
    #[must_use]
    pub fn notifications(&self) -> Vec<Notification> {
        self.lock().clone()
    }

    /// Messages recorded so far, oldest first.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.lock().iter().map(|n| n.message.clone()).collect()
    }

    /// Remove and return everything recorded so far.
    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.lock())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Notification>> {
        self.notifications
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl NotificationSink for MemoryNotifier {
    fn display(&self, message: &str, severity: Severity) {
        self.lock().push(Notification {
            message: message.to_string(),
            severity,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_notifier_records_in_order() {
        let notifier = MemoryNotifier::new();
        let shared = notifier.clone();

        shared.display("first", Severity::Error);
        shared.display("second", Severity::Info);

        assert_eq!(notifier.messages(), vec!["first", "second"]);
        assert_eq!(notifier.notifications()[1].severity, Severity::Info);
    }

    #[test]
    fn test_memory_notifier_drain() {
        let notifier = MemoryNotifier::new();
        notifier.display("gone", Severity::default());

        let drained = notifier.drain();
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].severity, Severity::Error);
        assert!(notifier.messages().is_empty());
    }
}
