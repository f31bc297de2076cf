//! Security key presence monitoring via polling.
//!
//! There is no portable hotplug API we can rely on for every HID stack, so we
//! poll. Each cycle enumerates attached devices, keeps the ones the classifier
//! accepts, reduces them to identities and diffs that set against the previous
//! one. Transitions go out as [`UiEvent::Presence`] (Added before Removed),
//! followed by the full [`UiEvent::KeyList`].
//!
//! ```text
//! Polling -> Classifying -> Diffing -> Emitting -> Sleeping -> Polling
//!    \___________\____________\___________\__________\____> Stopped
//! ```

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::classifier::KeyClassifier;
use super::enumerator::DeviceEnumerator;
use super::identity::IdentityScheme;
use super::types::{DeviceDescriptor, PresenceDiff, PresenceSet};
use crate::delivery::{DeliverySender, StatusNotice, UiEvent};
use crate::error::{MonitorError, MonitorResult};

/// Default polling interval (1 second).
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Floor for the stop deadline when the poll interval is very short.
const MIN_STOP_DEADLINE: Duration = Duration::from_millis(250);

/// Reduce one enumeration snapshot to the set of security key identities.
pub fn classify_snapshot(
    descriptors: &[DeviceDescriptor],
    classifier: &KeyClassifier,
    scheme: &dyn IdentityScheme,
) -> PresenceSet {
    descriptors
        .iter()
        .filter(|d| classifier.is_security_key(d))
        .map(|d| scheme.identity(d))
        .collect()
}

/// The mutex-protected set of currently observed keys.
///
/// Only the poll loop writes; everyone else reads a snapshot copy.
#[derive(Debug, Default)]
pub struct PresenceTracker {
    current: Mutex<PresenceSet>,
}

impl PresenceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current set with `next` and return what changed.
    ///
    /// The diff and the replacement happen under the same lock.
    pub fn observe(&self, next: PresenceSet) -> PresenceDiff {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        let diff = PresenceDiff::between(&current, &next);
        *current = next;
        diff
    }

    /// Copy of the current set.
    pub fn snapshot(&self) -> PresenceSet {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Handle to a running presence poll loop.
///
/// Must be started from within a tokio runtime.
pub struct PresenceMonitor {
    tracker: Arc<PresenceTracker>,
    stop_tx: watch::Sender<bool>,
    handle: Option<JoinHandle<()>>,
    poll_interval: Duration,
}

impl PresenceMonitor {
    /// Spawn the poll loop.
    ///
    /// The first poll runs immediately; keys already attached at start are
    /// reported as Added.
    pub fn start(
        enumerator: Arc<dyn DeviceEnumerator>,
        classifier: KeyClassifier,
        scheme: Arc<dyn IdentityScheme>,
        sink: DeliverySender,
        poll_interval: Duration,
    ) -> Self {
        let tracker = Arc::new(PresenceTracker::new());
        let (stop_tx, stop_rx) = watch::channel(false);

        let poll_loop = PollLoop {
            enumerator,
            classifier,
            scheme,
            tracker: tracker.clone(),
            sink,
            poll_interval,
        };
        let handle = tokio::spawn(poll_loop.run(stop_rx));

        Self {
            tracker,
            stop_tx,
            handle: Some(handle),
            poll_interval,
        }
    }

    /// Copy of the keys seen on the most recent successful poll.
    pub fn snapshot(&self) -> PresenceSet {
        self.tracker.snapshot()
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Signal the loop and wait for it to exit.
    ///
    /// Idempotent. Once this returns `Ok`, no further presence events will be
    /// sent. If the loop does not exit within one poll interval, or 250ms when
    /// the interval is shorter, it is aborted and `ShutdownTimeout` is returned.
    pub async fn stop(&mut self) -> MonitorResult<()> {
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };

        let _ = self.stop_tx.send(true);
        let deadline = self.poll_interval.max(MIN_STOP_DEADLINE);
        let abort = handle.abort_handle();

        match tokio::time::timeout(deadline, handle).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => {
                tracing::error!("Presence monitor task ended abnormally: {}", e);
                Ok(())
            }
            Err(_) => {
                abort.abort();
                Err(MonitorError::ShutdownTimeout {
                    component: "presence monitor",
                    deadline,
                })
            }
        }
    }
}

impl Drop for PresenceMonitor {
    fn drop(&mut self) {
        let _ = self.stop_tx.send(true);
    }
}

struct PollLoop {
    enumerator: Arc<dyn DeviceEnumerator>,
    classifier: KeyClassifier,
    scheme: Arc<dyn IdentityScheme>,
    tracker: Arc<PresenceTracker>,
    sink: DeliverySender,
    poll_interval: Duration,
}

impl PollLoop {
    async fn run(self, mut stop_rx: watch::Receiver<bool>) {
        tracing::info!(
            "Presence monitor started (interval: {}ms)",
            self.poll_interval.as_millis()
        );

        let mut failing = false;

        loop {
            let enumerator = self.enumerator.clone();
            let polled = tokio::select! {
                biased;
                _ = stop_rx.changed() => break,
                res = tokio::task::spawn_blocking(move || enumerator.enumerate()) => res,
            };

            match polled {
                Ok(Ok(descriptors)) => {
                    if failing {
                        tracing::info!("Device enumeration recovered");
                        failing = false;
                    }
                    if !self.publish(&descriptors, &mut stop_rx).await {
                        break;
                    }
                }
                Ok(Err(e)) => {
                    e.log("Error monitoring security keys");
                    if !failing {
                        failing = true;
                        let notice = UiEvent::Notice(StatusNotice::error(e.user_message()));
                        if !self.emit(notice, &mut stop_rx).await {
                            break;
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!("Device enumeration task failed: {}", e);
                }
            }

            if *stop_rx.borrow() {
                break;
            }

            tokio::select! {
                _ = stop_rx.changed() => break,
                _ = tokio::time::sleep(self.poll_interval) => {}
            }
        }

        tracing::info!("Presence monitor stopped");
    }

    /// Classify, diff and emit. Returns false when the loop should exit.
    async fn publish(
        &self,
        descriptors: &[DeviceDescriptor],
        stop_rx: &mut watch::Receiver<bool>,
    ) -> bool {
        let current = classify_snapshot(descriptors, &self.classifier, self.scheme.as_ref());
        let key_list: Vec<_> = current.iter().cloned().collect();
        let diff = self.tracker.observe(current);

        if diff.is_empty() {
            tracing::trace!("Security keys unchanged");
            return true;
        }

        for key in &diff.added {
            tracing::info!("Detected new security key: {}", key);
        }
        for key in &diff.removed {
            tracing::info!("Detected removed security key: {}", key);
        }

        for event in diff.into_events() {
            if !self.emit(UiEvent::Presence(event), stop_rx).await {
                return false;
            }
        }
        self.emit(UiEvent::KeyList(key_list), stop_rx).await
    }

    /// Send unless a stop arrives first. Returns false when the loop should exit.
    async fn emit(&self, event: UiEvent, stop_rx: &mut watch::Receiver<bool>) -> bool {
        if *stop_rx.borrow() {
            return false;
        }
        tokio::select! {
            biased;
            _ = stop_rx.changed() => false,
            sent = self.sink.send(event) => {
                if !sent {
                    tracing::debug!("Delivery channel closed, stopping presence monitor");
                }
                sent
            }
        }
    }
}
