//! Cross-task delivery of monitor output to the UI.
//!
//! Producers (the presence monitor and the log tailer) push immutable
//! [`UiEvent`] values into a bounded tokio channel. The UI loop drains it on a
//! fixed tick, so every mutation of UI-visible state happens on one thread.
//!
//! ```text
//! PresenceMonitor ──┐
//!                   ├──▶ DeliverySender ══ bounded mpsc ══▶ DeliveryReceiver::drain_into(ui)
//! LogTailer ────────┘                                         (UI tick, 1s)
//! ```

use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;

use crate::devices::{DeviceIdentity, PresenceEvent, PresenceKind};
use crate::logtail::LogBatch;
use crate::traits::{NotificationSink, UiSink};

/// How long a status notice stays on screen.
pub const NOTICE_TTL: Duration = Duration::from_secs(5);

/// Severity of a status notice; rendered green or red.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A short user-visible status message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusNotice {
    pub message: String,
    pub level: NoticeLevel,
    pub created_at: Instant,
}

impl StatusNotice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NoticeLevel::Info,
            created_at: Instant::now(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NoticeLevel::Error,
            created_at: Instant::now(),
        }
    }

    /// Whether the notice has outlived [`NOTICE_TTL`].
    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() >= NOTICE_TTL
    }
}

/// Everything a producer can hand to the UI.
#[derive(Debug, Clone)]
pub enum UiEvent {
    /// Security keys appeared or disappeared.
    Presence(PresenceEvent),
    /// Full list of attached keys after a change.
    KeyList(Vec<DeviceIdentity>),
    /// Lines tailed from the log file.
    LogLines(LogBatch),
    /// Status message (tail failures, enumeration problems).
    Notice(StatusNotice),
}

/// Create a bounded delivery channel.
pub fn delivery_channel(capacity: usize) -> (DeliverySender, DeliveryReceiver) {
    let capacity = capacity.max(1);
    let (tx, rx) = mpsc::channel(capacity);
    (DeliverySender { tx }, DeliveryReceiver { rx, capacity })
}

/// Producer half. Cheap to clone; one per background loop.
#[derive(Debug, Clone)]
pub struct DeliverySender {
    tx: mpsc::Sender<UiEvent>,
}

impl DeliverySender {
    /// Enqueue an event, waiting for space if the queue is full.
    ///
    /// Returns false once the UI side has gone away.
    pub async fn send(&self, event: UiEvent) -> bool {
        self.tx.send(event).await.is_ok()
    }

    /// Enqueue without waiting. Returns false if the queue is full or closed.
    pub fn try_send(&self, event: UiEvent) -> bool {
        self.tx.try_send(event).is_ok()
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Consumer half, owned by the UI loop.
#[derive(Debug)]
pub struct DeliveryReceiver {
    rx: mpsc::Receiver<UiEvent>,
    capacity: usize,
}

impl DeliveryReceiver {
    /// Take everything currently queued without waiting.
    ///
    /// At most one channel's worth of events is taken per call so a chatty
    /// producer cannot starve the UI loop.
    pub fn drain(&mut self) -> Vec<UiEvent> {
        let mut events = Vec::new();
        while events.len() < self.capacity {
            match self.rx.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        events
    }

    /// Wait for the next event. Used by the headless watcher.
    pub async fn recv(&mut self) -> Option<UiEvent> {
        self.rx.recv().await
    }

    /// Drain queued events and route them to the sinks. Returns the count.
    pub fn drain_into(&mut self, ui: &mut dyn UiSink, notifier: &dyn NotificationSink) -> usize {
        let events = self.drain();
        let count = events.len();
        for event in events {
            dispatch(event, ui, notifier);
        }
        count
    }
}

/// Route a single event to the UI and notification sinks.
pub fn dispatch(event: UiEvent, ui: &mut dyn UiSink, notifier: &dyn NotificationSink) {
    match event {
        UiEvent::Presence(presence) => {
            match presence.kind {
                PresenceKind::Added => notifier.notify_added(&presence.identities),
                PresenceKind::Removed => notifier.notify_removed(&presence.identities),
            }
            ui.show_notice(StatusNotice::info(presence.summary()));
        }
        UiEvent::KeyList(identities) => ui.set_key_list(&identities),
        UiEvent::LogLines(batch) => ui.append_log_lines(batch),
        UiEvent::Notice(notice) => ui.show_notice(notice),
    }
}
