//! Device enumeration behind a trait for dependency injection.
//!
//! - Use [`UsbEnumerator`] in production (backed by `nusb`)
//! - Use [`ScriptedEnumerator`] in tests to replay a sequence of snapshots
//!
//! ```rust,ignore
//! let mock = Arc::new(ScriptedEnumerator::new(vec![
//!     vec![DeviceDescriptor::new(0x1050, "Yubico", "YubiKey 5 NFC")],
//!     vec![],
//! ]));
//! let monitor = PresenceMonitor::start(mock, classifier, scheme, tx, interval);
//! ```

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use super::types::DeviceDescriptor;
use crate::error::{MonitorError, MonitorResult};

/// Lists currently attached devices.
///
/// Implementations hold no state between calls and must be safe to call from
/// any thread. A call may block briefly while the OS answers.
pub trait DeviceEnumerator: Send + Sync {
    fn enumerate(&self) -> MonitorResult<Vec<DeviceDescriptor>>;
}

/// Enumerate, logging and swallowing failures.
///
/// For callers that want an empty snapshot rather than an error.
pub fn enumerate_or_empty(enumerator: &dyn DeviceEnumerator) -> Vec<DeviceDescriptor> {
    match enumerator.enumerate() {
        Ok(devices) => devices,
        Err(e) => {
            tracing::warn!("Device enumeration failed: {}", e);
            Vec::new()
        }
    }
}

/// Production enumerator reading the USB bus through `nusb`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UsbEnumerator;

#[cfg(any(target_os = "linux", target_os = "macos", target_os = "windows"))]
impl DeviceEnumerator for UsbEnumerator {
    fn enumerate(&self) -> MonitorResult<Vec<DeviceDescriptor>> {
        let devices = nusb::list_devices().map_err(|e| MonitorError::EnumerationFailure {
            message: e.to_string(),
        })?;

        Ok(devices
            .map(|info| DeviceDescriptor {
                vendor_id: info.vendor_id(),
                product_id: Some(info.product_id()),
                manufacturer: info.manufacturer_string().unwrap_or_default().to_string(),
                product: info.product_string().unwrap_or_default().to_string(),
                serial_number: info.serial_number().map(str::to_string),
            })
            .collect())
    }
}

/// Stub for platforms nusb does not support.
#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
impl DeviceEnumerator for UsbEnumerator {
    fn enumerate(&self) -> MonitorResult<Vec<DeviceDescriptor>> {
        Err(MonitorError::EnumerationFailure {
            message: "USB enumeration is not supported on this platform".to_string(),
        })
    }
}

/// Mock enumerator that replays scripted snapshots.
///
/// Each call pops the next scripted result; once the script is exhausted the
/// last snapshot is repeated, so a monitor settles into a steady state.
pub struct ScriptedEnumerator {
    script: Mutex<VecDeque<MonitorResult<Vec<DeviceDescriptor>>>>,
    last: Mutex<Vec<DeviceDescriptor>>,
    calls: AtomicUsize,
}

impl ScriptedEnumerator {
    /// Script a sequence of successful snapshots.
    pub fn new(snapshots: Vec<Vec<DeviceDescriptor>>) -> Self {
        Self::with_results(snapshots.into_iter().map(Ok).collect())
    }

    /// Script a sequence that may include failures.
    pub fn with_results(results: Vec<MonitorResult<Vec<DeviceDescriptor>>>) -> Self {
        Self {
            script: Mutex::new(results.into()),
            last: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Append a snapshot to the script (simulates plugging or unplugging).
    pub fn push(&self, snapshot: Vec<DeviceDescriptor>) {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(Ok(snapshot));
    }

    /// Number of times `enumerate` has been called.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl DeviceEnumerator for ScriptedEnumerator {
    fn enumerate(&self) -> MonitorResult<Vec<DeviceDescriptor>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self
            .script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
        match next {
            Some(Ok(snapshot)) => {
                *last = snapshot.clone();
                Ok(snapshot)
            }
            Some(Err(e)) => Err(e),
            None => Ok(last.clone()),
        }
    }
}
