//! OS Bluetooth Stack Abstraction
//!
//! The sync procedure talks to the operating system only through these
//! traits, so it runs unchanged against the Win32 backend or an in-memory
//! test double. All calls block the calling thread.

use crate::domain::models::{BluetoothAddress, DeviceRecord, ErrorCode, RadioInfo};
use crate::infrastructure::bluetooth::protocol::Pin;

/// Entry point into the OS Bluetooth stack
pub trait BluetoothStack {
    /// Open handle to a local radio. Dropping it releases the handle.
    type Radio: BluetoothRadio;

    /// Open the first local radio
    fn find_local_radio(&self) -> Result<Self::Radio, ErrorCode>;
}

/// Operations against an open local radio
pub trait BluetoothRadio {
    fn info(&self) -> Result<RadioInfo, ErrorCode>;

    /// Every device the OS already knows about, without an inquiry
    fn list_known_devices(&self) -> Result<Vec<DeviceRecord>, ErrorCode>;

    /// Issue an inquiry and return every device it (and the OS cache) reports.
    /// `timeout_multiplier` is in units of 1.28 seconds.
    fn discover_devices(&self, timeout_multiplier: u8) -> Result<Vec<DeviceRecord>, ErrorCode>;

    fn authenticate(&self, device: &DeviceRecord, pin: &Pin) -> Result<(), ErrorCode>;

    /// Number of services the OS has installed for the device
    fn enumerate_services(&self, device: &DeviceRecord) -> Result<u32, ErrorCode>;

    fn set_hid_service_state(&self, device: &DeviceRecord, enable: bool) -> Result<(), ErrorCode>;

    fn remove_device(&self, address: &BluetoothAddress) -> Result<(), ErrorCode>;

    /// Fresh snapshot of a single device
    fn device_info(&self, address: &BluetoothAddress) -> Result<DeviceRecord, ErrorCode>;
}
