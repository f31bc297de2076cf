//! Native OS notifications for security key transitions.
//!
//! Dispatch runs on the blocking pool so the UI loop never waits on the
//! notification daemon. Errors are logged and discarded.

use std::sync::{Mutex, PoisonError};

use crate::devices::{PresenceEvent, PresenceKind, PresenceSet};
use crate::traits::NotificationSink;

const APP_NAME: &str = "opsdeck";

/// Sends desktop banners through `notify-rust`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DesktopNotifier;

impl DesktopNotifier {
    pub fn new() -> Self {
        Self
    }

    fn dispatch(&self, kind: PresenceKind, identities: &PresenceSet) {
        if identities.is_empty() {
            return;
        }
        let event = PresenceEvent {
            kind,
            identities: identities.clone(),
        };
        let title = event.title();
        let body = event.summary();

        tracing::debug!("Sending OS notification: {}", body);

        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                runtime.spawn_blocking(move || send_notification(title, &body));
            }
            Err(_) => send_notification(title, &body),
        }
    }
}

impl NotificationSink for DesktopNotifier {
    fn notify_added(&self, identities: &PresenceSet) {
        self.dispatch(PresenceKind::Added, identities);
    }

    fn notify_removed(&self, identities: &PresenceSet) {
        self.dispatch(PresenceKind::Removed, identities);
    }
}

fn send_notification(title: &str, body: &str) {
    let result = notify_rust::Notification::new()
        .appname(APP_NAME)
        .summary(title)
        .body(body)
        .show();

    match result {
        Ok(_) => tracing::debug!("OS notification sent"),
        Err(e) => tracing::warn!("Failed to show OS notification: {}", e),
    }
}

/// Keeps every notification in memory instead of showing it.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<PresenceEvent>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<PresenceEvent> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record(&self, kind: PresenceKind, identities: &PresenceSet) {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(PresenceEvent {
                kind,
                identities: identities.clone(),
            });
    }
}

impl NotificationSink for RecordingNotifier {
    fn notify_added(&self, identities: &PresenceSet) {
        self.record(PresenceKind::Added, identities);
    }

    fn notify_removed(&self, identities: &PresenceSet) {
        self.record(PresenceKind::Removed, identities);
    }
}
