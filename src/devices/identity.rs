//! Identity derivation for presence tracking.
//!
//! The diff algorithm only ever sees [`DeviceIdentity`] values, so a stricter
//! scheme can be substituted here without touching the monitor.

use super::types::{DeviceDescriptor, DeviceIdentity};

/// Derives the tracking key for a descriptor.
pub trait IdentityScheme: Send + Sync {
    fn identity(&self, descriptor: &DeviceDescriptor) -> DeviceIdentity;
}

/// `"{manufacturer} {product}"`.
///
/// Two physical keys of the same model collapse into one identity. A missing
/// manufacturer string yields a leading space, e.g. `" YubiKey 5 NFC"`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManufacturerProduct;

impl IdentityScheme for ManufacturerProduct {
    fn identity(&self, descriptor: &DeviceDescriptor) -> DeviceIdentity {
        DeviceIdentity::new(format!("{} {}", descriptor.manufacturer, descriptor.product))
    }
}

/// Like [`ManufacturerProduct`], but keeps keys with distinct serials apart.
#[derive(Debug, Clone, Copy, Default)]
pub struct PerSerial;

impl IdentityScheme for PerSerial {
    fn identity(&self, descriptor: &DeviceDescriptor) -> DeviceIdentity {
        let base = ManufacturerProduct.identity(descriptor);
        match descriptor.serial_number.as_deref() {
            Some(serial) if !serial.is_empty() => DeviceIdentity::new(format!("{base} #{serial}")),
            _ => base,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manufacturer_product_format() {
        let d = DeviceDescriptor::new(0x1050, "Yubico", "YubiKey 5 NFC");
        assert_eq!(ManufacturerProduct.identity(&d).as_str(), "Yubico YubiKey 5 NFC");
    }

    #[test]
    fn test_empty_manufacturer_keeps_leading_space() {
        let d = DeviceDescriptor::new(0x1050, "", "YubiKey 5 NFC");
        assert_eq!(ManufacturerProduct.identity(&d).as_str(), " YubiKey 5 NFC");
    }

    #[test]
    fn test_same_model_collapses() {
        let a = DeviceDescriptor::new(0x1050, "Yubico", "YubiKey").with_serial("111");
        let b = DeviceDescriptor::new(0x1050, "Yubico", "YubiKey").with_serial("222");
        assert_eq!(ManufacturerProduct.identity(&a), ManufacturerProduct.identity(&b));
    }

    #[test]
    fn test_per_serial_separates_same_model() {
        let a = DeviceDescriptor::new(0x1050, "Yubico", "YubiKey").with_serial("111");
        let b = DeviceDescriptor::new(0x1050, "Yubico", "YubiKey").with_serial("222");
        assert_ne!(PerSerial.identity(&a), PerSerial.identity(&b));
        assert_eq!(PerSerial.identity(&a).as_str(), "Yubico YubiKey #111");
    }

    #[test]
    fn test_per_serial_without_serial_falls_back() {
        let d = DeviceDescriptor::new(0x18d1, "Google", "Titan");
        assert_eq!(PerSerial.identity(&d), ManufacturerProduct.identity(&d));
    }
}
