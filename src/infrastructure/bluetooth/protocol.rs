//! Wii Remote Sync Protocol
//!
//! Constants and pure helpers describing how a Wii Remote (and Balance Board)
//! is recognised and paired over classic Bluetooth.

use crate::domain::models::{BluetoothAddress, PinMode};

/// Substrings of the advertised name that identify a Wii Remote ("Nintendo RVL-CNT-01")
/// or a Wii Balance Board ("Nintendo RVL-WBC-01")
pub const NAME_PATTERNS: &[&str] = &["RVL-CNT", "RVL-WBC"];

/// Human Interface Device service class (0x1124 on the Bluetooth base UUID)
pub const HID_SERVICE_CLASS_UUID: u128 = 0x00001124_0000_1000_8000_00805f9b34fb;

/// Discovery passes per invocation
pub const MAX_DISCOVERY_PASSES: u32 = 3;

/// Pause between passes, giving the remote's sync window another chance
pub const PASS_DELAY_MS: u64 = 500;

/// Inquiry length in units of 1.28 seconds
pub const INQUIRY_TIMEOUT_MULTIPLIER: u8 = 3;

/// Legacy PIN offered during authentication
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pin([u8; 6]);

impl Pin {
    #[cfg(test)]
    pub fn as_bytes(&self) -> &[u8; 6] {
        &self.0
    }

    /// The PIN as six UTF-16 code units, one per address byte
    pub fn to_wide(&self) -> [u16; 6] {
        self.0.map(u16::from)
    }
}

/// Derive the PIN the remote expects.
///
/// The remote compares the PIN against an address in OS byte order
/// (least significant byte first), so the bytes are taken as is.
pub fn derive_pin(mode: PinMode, radio: &BluetoothAddress, device: &BluetoothAddress) -> Pin {
    let source = match mode {
        PinMode::Host => radio,
        PinMode::Device => device,
    };
    Pin(*source.bytes())
}

/// True if `name` contains any non-empty pattern
pub fn matches_name<S: AsRef<str>>(name: &str, patterns: &[S]) -> bool {
    patterns.iter().any(|pattern| {
        let pattern: &str = pattern.as_ref();
        !pattern.is_empty() && name.contains(pattern)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const RADIO: BluetoothAddress = BluetoothAddress::new([0x11, 0x22, 0x33, 0x44, 0x55, 0x66]);
    const REMOTE: BluetoothAddress = BluetoothAddress::new([0xA1, 0xB2, 0xC3, 0xD4, 0xE5, 0xF6]);

    fn is_wiimote_name(name: &str) -> bool {
        matches_name(name, NAME_PATTERNS)
    }

    #[test]
    fn test_wiimote_names() {
        assert!(is_wiimote_name("Nintendo RVL-CNT-01"));
        assert!(is_wiimote_name("Nintendo RVL-CNT-01-TR"));
        assert!(is_wiimote_name("Nintendo RVL-WBC-01"));
        assert!(!is_wiimote_name("Xbox Wireless Controller"));
        assert!(!is_wiimote_name(""));
        assert!(!is_wiimote_name("rvl-cnt-01"));
    }

    #[test]
    fn test_empty_pattern_never_matches() {
        assert!(!matches_name("anything", &[""]));
        assert!(matches_name("Pro RVL-CNT", &["", "RVL-CNT"]));
    }

    #[test]
    fn test_host_pin_uses_radio_bytes_unchanged() {
        let pin = derive_pin(PinMode::Host, &RADIO, &REMOTE);
        assert_eq!(pin.as_bytes(), &[0x11, 0x22, 0x33, 0x44, 0x55, 0x66]);
        assert_eq!(pin, derive_pin(PinMode::Host, &RADIO, &REMOTE));
    }

    #[test]
    fn test_device_pin_uses_remote_bytes_unchanged() {
        let pin = derive_pin(PinMode::Device, &RADIO, &REMOTE);
        assert_eq!(pin.as_bytes(), REMOTE.bytes());
        assert_eq!(pin.to_wide(), [0xA1, 0xB2, 0xC3, 0xD4, 0xE5, 0xF6]);
    }
}
