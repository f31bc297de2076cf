//! `--list-devices`: one-shot enumeration report.

use std::fmt::Write;

use crate::devices::{enumerate_or_empty, DeviceDescriptor, DeviceEnumerator, KeyClassifier};

const LINE_WIDTH: usize = 72;

/// Render the device table.
///
/// ```text
/// USB DEVICES
/// ════════════════════════════════════════════════════════════════════════
///   KEY  1050:0407  Yubico      Yubico YubiKey OTP+FIDO+CCID
///        046d:c52b  -           Logitech USB Receiver
/// ```
pub fn format_device_table(descriptors: &[DeviceDescriptor], classifier: &KeyClassifier) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "USB DEVICES");
    let _ = writeln!(out, "{}", "═".repeat(LINE_WIDTH));

    if descriptors.is_empty() {
        let _ = writeln!(out, "  (none found)");
        return out;
    }

    let mut keys = 0;
    for d in descriptors {
        let is_key = classifier.is_security_key(d);
        if is_key {
            keys += 1;
        }
        let product_id = d
            .product_id
            .map(|p| format!("{p:04x}"))
            .unwrap_or_else(|| "????".to_string());
        let _ = writeln!(
            out,
            "  {:<4} {:04x}:{}  {:<10}  {} {}",
            if is_key { "KEY" } else { "" },
            d.vendor_id,
            product_id,
            classifier.vendor_label(d.vendor_id).unwrap_or("-"),
            d.manufacturer,
            d.product
        );
    }

    let _ = writeln!(out, "{}", "─".repeat(LINE_WIDTH));
    let _ = writeln!(out, "  {} devices, {} security keys", descriptors.len(), keys);
    out
}

/// Enumerate once and print the table to stdout.
pub fn handle_list_devices(enumerator: &dyn DeviceEnumerator, classifier: &KeyClassifier) {
    let descriptors = enumerate_or_empty(enumerator);
    print!("{}", format_device_table(&descriptors, classifier));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_marks_keys_and_labels_vendors() {
        let descriptors = vec![
            DeviceDescriptor::new(0x1050, "Yubico", "YubiKey 5 NFC").with_product_id(0x0407),
            DeviceDescriptor::new(0x046d, "Logitech", "USB Receiver"),
        ];
        let table = format_device_table(&descriptors, &KeyClassifier::default());

        assert!(table.contains("KEY  1050:0407  Yubico"));
        assert!(table.contains("046d:????"));
        assert!(table.contains("2 devices, 1 security keys"));
    }

    #[test]
    fn test_empty_table() {
        let table = format_device_table(&[], &KeyClassifier::default());
        assert!(table.contains("(none found)"));
    }
}
