/// Collaborators the bidder is handed at construction
/// 1. Auth state
/// 2. Toast notifications
// region:    --- Imports
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{error, info};

// endregion: --- Imports

// region:    --- Auth

pub trait AuthProvider: Send + Sync {
    fn is_authenticated(&self) -> bool;
}

/// Auth state fixed at startup, switchable for sign-in / sign-out.
#[derive(Debug, Default)]
pub struct StaticAuth {
    authenticated: AtomicBool,
}

impl StaticAuth {
    pub fn new(authenticated: bool) -> Self {
        Self {
            authenticated: AtomicBool::new(authenticated),
        }
    }

    pub fn set_authenticated(&self, authenticated: bool) {
        self.authenticated.store(authenticated, Ordering::SeqCst);
    }
}

impl AuthProvider for StaticAuth {
    fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::SeqCst)
    }
}

// endregion: --- Auth

// region:    --- Notifications

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

/// User-facing notification sink (toasts).
pub trait NotificationSink: Send + Sync {
    fn add_toast(&self, message: &str, severity: Severity);
}

/// Writes notifications to the log; used by the terminal front end.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl NotificationSink for TracingNotifier {
    fn add_toast(&self, message: &str, severity: Severity) {
        match severity {
            Severity::Success => info!("{:<12} --> {}", "Toast", message),
            Severity::Error => error!("{:<12} --> {}", "Toast", message),
        }
    }
}

// endregion: --- Notifications
