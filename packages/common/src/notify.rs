//! # Notifications
//!
//! Fire-and-forget user notifications (toasts). Never awaited, never retried.

use std::sync::{Mutex, PoisonError};

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

impl Notification {
    pub fn new(title: impl Into<String>, description: impl Into<String>, severity: Severity) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity,
        }
    }

    pub fn error(description: impl Into<String>) -> Self {
        Self::new("Error", description, Severity::Error)
    }

    pub fn success(description: impl Into<String>) -> Self {
        Self::new("Success", description, Severity::Success)
    }
}

/// Notification collaborator
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Emits notifications as tracing events
#[derive(Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.severity {
            Severity::Error => tracing::error!(
                title = %notification.title,
                "{}",
                notification.description
            ),
            Severity::Info | Severity::Success => tracing::info!(
                title = %notification.title,
                "{}",
                notification.description
            ),
        }
    }
}

/// Keeps every notification for later inspection
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notifications: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn errors(&self) -> usize {
        self.notifications()
            .iter()
            .filter(|n| n.severity == Severity::Error)
            .count()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.notifications
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }
}
