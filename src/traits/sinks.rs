//! Consumer-side contracts for the delivery channel.

use crate::delivery::StatusNotice;
use crate::devices::{DeviceIdentity, PresenceSet};
use crate::logtail::LogBatch;

/// UI-owned state updated by the drain loop.
///
/// Methods take `&mut self` and are only ever called from the thread that
/// owns the UI; producers never reach an implementation directly.
pub trait UiSink {
    /// Replace the displayed list of attached security keys.
    fn set_key_list(&mut self, identities: &[DeviceIdentity]);

    /// Append a batch of tailed log lines, in order.
    fn append_log_lines(&mut self, batch: LogBatch);

    /// Show a transient status message.
    fn show_notice(&mut self, notice: StatusNotice);
}

/// Fire-and-forget OS notifications.
///
/// Implementations must return quickly; failures are logged, never returned.
pub trait NotificationSink: Send + Sync {
    fn notify_added(&self, identities: &PresenceSet);
    fn notify_removed(&self, identities: &PresenceSet);
}
