//! Security key presence detection.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐   ┌───────────────┐   ┌────────────────┐
//! │ DeviceEnumerator │──▶│ KeyClassifier │──▶│ IdentityScheme │
//! │  (nusb / mock)   │   │ (vendor/kw)   │   │ (mfr + product)│
//! └──────────────────┘   └───────────────┘   └───────┬────────┘
//!                                                    ▼
//!                                          ┌───────────────────┐
//!                                          │ PresenceTracker   │
//!                                          │ (diff under lock) │
//!                                          └─────────┬─────────┘
//!                                                    ▼
//!                                            DeliverySender
//! ```

mod classifier;
mod enumerator;
mod identity;
mod monitor;
mod types;

pub use classifier::{KeyCatalog, KeyClassifier, KnownVendor};
pub use enumerator::{enumerate_or_empty, DeviceEnumerator, ScriptedEnumerator, UsbEnumerator};
pub use identity::{IdentityScheme, ManufacturerProduct, PerSerial};
pub use monitor::{
    classify_snapshot, PresenceMonitor, PresenceTracker, DEFAULT_POLL_INTERVAL,
};
pub use types::{
    DeviceDescriptor, DeviceIdentity, PresenceDiff, PresenceEvent, PresenceKind, PresenceSet,
};
