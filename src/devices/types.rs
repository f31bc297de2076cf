//! Shared types for security key presence tracking.

use std::collections::BTreeSet;
use std::fmt;

/// One attached USB/HID device, as reported by a single enumeration pass.
///
/// Descriptors are produced fresh on every poll and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceDescriptor {
    pub vendor_id: u16,
    pub product_id: Option<u16>,
    /// Empty when the device does not report a manufacturer string
    pub manufacturer: String,
    /// Empty when the device does not report a product string
    pub product: String,
    pub serial_number: Option<String>,
}

impl DeviceDescriptor {
    /// Create a descriptor with no product ID or serial.
    pub fn new(vendor_id: u16, manufacturer: impl Into<String>, product: impl Into<String>) -> Self {
        Self {
            vendor_id,
            product_id: None,
            manufacturer: manufacturer.into(),
            product: product.into(),
            serial_number: None,
        }
    }

    pub fn with_product_id(mut self, product_id: u16) -> Self {
        self.product_id = Some(product_id);
        self
    }

    pub fn with_serial(mut self, serial: impl Into<String>) -> Self {
        self.serial_number = Some(serial.into());
        self
    }
}

/// The key used to track a device across polls and to display it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DeviceIdentity(String);

impl DeviceIdentity {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DeviceIdentity {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Security keys observed during one poll.
///
/// Ordered so that event payloads and the on-screen list are stable.
pub type PresenceSet = BTreeSet<DeviceIdentity>;

/// Direction of a presence transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceKind {
    Added,
    Removed,
}

impl PresenceKind {
    /// Lowercase verb used in notifications ("has been added").
    pub fn verb(&self) -> &'static str {
        match self {
            PresenceKind::Added => "added",
            PresenceKind::Removed => "removed",
        }
    }
}

/// A batch of identities that appeared or disappeared in one poll.
///
/// Never constructed with an empty identity set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceEvent {
    pub kind: PresenceKind,
    pub identities: PresenceSet,
}

impl PresenceEvent {
    /// Human-readable summary, e.g. `"Yubico YubiKey 5 NFC has been added."`.
    pub fn summary(&self) -> String {
        let names: Vec<&str> = self.identities.iter().map(DeviceIdentity::as_str).collect();
        format!("{} has been {}.", names.join(", "), self.kind.verb())
    }

    /// Notification title, e.g. `"Security Key Added"`.
    pub fn title(&self) -> &'static str {
        match self.kind {
            PresenceKind::Added => "Security Key Added",
            PresenceKind::Removed => "Security Key Removed",
        }
    }
}

/// Result of comparing two consecutive presence sets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresenceDiff {
    pub added: PresenceSet,
    pub removed: PresenceSet,
}

impl PresenceDiff {
    /// Compute `added = current - previous` and `removed = previous - current`.
    pub fn between(previous: &PresenceSet, current: &PresenceSet) -> Self {
        Self {
            added: current.difference(previous).cloned().collect(),
            removed: previous.difference(current).cloned().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    /// The events to emit for this diff, Added before Removed, skipping empty sides.
    pub fn into_events(self) -> Vec<PresenceEvent> {
        let mut events = Vec::with_capacity(2);
        if !self.added.is_empty() {
            events.push(PresenceEvent {
                kind: PresenceKind::Added,
                identities: self.added,
            });
        }
        if !self.removed.is_empty() {
            events.push(PresenceEvent {
                kind: PresenceKind::Removed,
                identities: self.removed,
            });
        }
        events
    }
}
