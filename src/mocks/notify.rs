// region:    --- Imports
use crate::services::{NotificationSink, Severity};
use std::sync::Mutex;

// endregion: --- Imports

// region:    --- Recording Notifier

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub severity: Severity,
}

/// Keeps every toast in order.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    toasts: Mutex<Vec<Toast>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.lock().expect("notifier poisoned").clone()
    }

    pub fn last(&self) -> Option<Toast> {
        self.toasts().pop()
    }

    pub fn severities(&self) -> Vec<Severity> {
        self.toasts().into_iter().map(|toast| toast.severity).collect()
    }
}

impl NotificationSink for RecordingNotifier {
    fn add_toast(&self, message: &str, severity: Severity) {
        self.toasts.lock().expect("notifier poisoned").push(Toast {
            message: message.to_string(),
            severity,
        });
    }
}

// endregion: --- Recording Notifier
