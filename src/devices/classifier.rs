//! Security key classification heuristic.
//!
//! A device counts as a security key if its vendor ID is in the catalog's
//! known-vendor table, or if its product string contains one of the catalog
//! keywords (case-insensitive). This is a heuristic, not an attestation.

use serde::{Deserialize, Serialize};

use super::types::DeviceDescriptor;

/// A vendor whose devices are always treated as security keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnownVendor {
    pub vendor_id: u16,
    pub label: String,
}

impl KnownVendor {
    pub fn new(vendor_id: u16, label: impl Into<String>) -> Self {
        Self {
            vendor_id,
            label: label.into(),
        }
    }
}

/// Classification data, supplied through configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyCatalog {
    pub vendors: Vec<KnownVendor>,
    pub keywords: Vec<String>,
}

impl Default for KeyCatalog {
    fn default() -> Self {
        Self {
            vendors: vec![
                KnownVendor::new(0x1050, "Yubico"),
                KnownVendor::new(0x096e, "Feitian"),
                KnownVendor::new(0x1949, "Lab126"),
            ],
            keywords: ["yubikey", "titan", "authenticator", "zukey"]
                .iter()
                .map(|k| k.to_string())
                .collect(),
        }
    }
}

/// Pure classifier built from a [`KeyCatalog`].
#[derive(Debug, Clone)]
pub struct KeyClassifier {
    vendors: Vec<KnownVendor>,
    /// Lowercased at construction
    keywords: Vec<String>,
}

impl KeyClassifier {
    pub fn new(catalog: &KeyCatalog) -> Self {
        Self {
            vendors: catalog.vendors.clone(),
            keywords: catalog
                .keywords
                .iter()
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    /// Returns true if the descriptor looks like a security key.
    pub fn is_security_key(&self, descriptor: &DeviceDescriptor) -> bool {
        if self.vendor_label(descriptor.vendor_id).is_some() {
            return true;
        }
        let product = descriptor.product.to_lowercase();
        self.keywords.iter().any(|k| product.contains(k.as_str()))
    }

    /// Display label for a known vendor.
    pub fn vendor_label(&self, vendor_id: u16) -> Option<&str> {
        self.vendors
            .iter()
            .find(|v| v.vendor_id == vendor_id)
            .map(|v| v.label.as_str())
    }
}

impl Default for KeyClassifier {
    fn default() -> Self {
        Self::new(&KeyCatalog::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_vendor_matches_regardless_of_product() {
        let c = KeyClassifier::default();
        let d = DeviceDescriptor::new(0x1050, "", "Some Gadget");
        assert!(c.is_security_key(&d));
    }

    #[test]
    fn test_keyword_match_is_case_insensitive() {
        let c = KeyClassifier::default();
        let d = DeviceDescriptor::new(0x18d1, "Google", "Google TITAN Security Key");
        assert!(c.is_security_key(&d));
    }

    #[test]
    fn test_zukey_keyword() {
        let c = KeyClassifier::default();
        assert!(c.is_security_key(&DeviceDescriptor::new(0x18d1, "", "ZUKEY 2 HID")));
    }

    #[test]
    fn test_unrelated_device_is_rejected() {
        let c = KeyClassifier::default();
        let d = DeviceDescriptor::new(0x046d, "Logitech", "USB Receiver");
        assert!(!c.is_security_key(&d));
    }

    #[test]
    fn test_keyword_only_checks_product_string() {
        let c = KeyClassifier::default();
        let d = DeviceDescriptor::new(0x0001, "YubiKey Reseller Inc", "Keyboard");
        assert!(!c.is_security_key(&d));
    }

    #[test]
    fn test_classification_is_deterministic() {
        let c = KeyClassifier::default();
        let d = DeviceDescriptor::new(0x096e, "Feitian", "ePass FIDO");
        let first = c.is_security_key(&d);
        for _ in 0..10 {
            assert_eq!(c.is_security_key(&d), first);
        }
    }

    #[test]
    fn test_custom_catalog_extends_without_code_change() {
        let catalog = KeyCatalog {
            vendors: vec![KnownVendor::new(0x20a0, "Nitrokey")],
            keywords: vec!["  OnlyKey ".to_string()],
        };
        let c = KeyClassifier::new(&catalog);

        assert!(c.is_security_key(&DeviceDescriptor::new(0x20a0, "", "Nitrokey 3")));
        assert!(c.is_security_key(&DeviceDescriptor::new(0x1d50, "", "onlykey duo")));
        assert!(!c.is_security_key(&DeviceDescriptor::new(0x1050, "Yubico", "YubiKey")));
        assert_eq!(c.vendor_label(0x20a0), Some("Nitrokey"));
    }

    #[test]
    fn test_blank_keywords_are_ignored() {
        let catalog = KeyCatalog {
            vendors: vec![],
            keywords: vec!["".to_string(), "   ".to_string()],
        };
        let c = KeyClassifier::new(&catalog);
        assert!(!c.is_security_key(&DeviceDescriptor::new(0x1, "", "anything")));
    }
}
