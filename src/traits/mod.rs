//! Trait abstractions for the collaborators at the edge of the core.
//!
//! # Traits
//!
//! - [`UiSink`] - receives key lists, log batches and notices on the UI thread
//! - [`NotificationSink`] - fires OS notifications for presence transitions
//!
//! The device enumeration seam lives next to its implementations in
//! [`crate::devices::DeviceEnumerator`].

pub mod sinks;

pub use sinks::{NotificationSink, UiSink};
