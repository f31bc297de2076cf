//! Shared fixtures for integration tests.
//!
//! ```ignore
//! mod common;
//! use common::{yubikey, recv_within};
//! ```

pub mod mocks;

pub use mocks::*;

use std::time::Duration;

use opsdeck::delivery::{DeliveryReceiver, UiEvent};
use opsdeck::devices::DeviceDescriptor;
use opsdeck::logtail::TailConfig;

/// Upper bound on how long a test waits for an expected event.
pub const EVENT_TIMEOUT: Duration = Duration::from_secs(3);

/// Poll interval used by monitors under test.
pub const FAST_POLL: Duration = Duration::from_millis(20);

pub fn yubikey() -> DeviceDescriptor {
    DeviceDescriptor::new(0x1050, "Yubico", "YubiKey 5 NFC").with_product_id(0x0407)
}

#[allow(dead_code)]
pub fn titan() -> DeviceDescriptor {
    DeviceDescriptor::new(0x18d1, "Google", "Titan Security Key").with_product_id(0x5026)
}

#[allow(dead_code)]
pub fn mouse() -> DeviceDescriptor {
    DeviceDescriptor::new(0x046d, "Logitech", "USB Receiver").with_product_id(0xc52b)
}

/// Tail settings fast enough for tests.
#[allow(dead_code)]
pub fn fast_tail() -> TailConfig {
    TailConfig::default()
        .with_poll_interval(Duration::from_millis(20))
        .with_flush_interval(Duration::from_millis(50))
}

/// Next event, or `None` if nothing arrives within `timeout`.
#[allow(dead_code)]
pub async fn recv_within(rx: &mut DeliveryReceiver, timeout: Duration) -> Option<UiEvent> {
    tokio::time::timeout(timeout, rx.recv()).await.ok().flatten()
}

/// Collect tailed lines until `count` have arrived or the timeout passes.
#[allow(dead_code)]
pub async fn collect_log_lines(rx: &mut DeliveryReceiver, count: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let deadline = tokio::time::Instant::now() + EVENT_TIMEOUT;
    while lines.len() < count {
        let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
        match recv_within(rx, remaining).await {
            Some(UiEvent::LogLines(batch)) => lines.extend(batch.into_lines()),
            Some(_) => {}
            None => break,
        }
    }
    lines
}
