//! Wii Remote Authentication
//!
//! Offers the address-derived PIN to the OS and, once accepted, asks the OS
//! to enumerate the remote's services.

use crate::domain::errors::SyncError;
use crate::domain::models::{BluetoothAddress, DeviceRecord, PinMode, SyncEvent};
use crate::infrastructure::bluetooth::protocol;
use crate::infrastructure::bluetooth::stack::BluetoothRadio;
use crate::infrastructure::events::EventSink;
use tracing::{debug, info, warn};

pub struct Authenticator<'a> {
    mode: PinMode,
    radio_address: BluetoothAddress,
    events: &'a EventSink,
}

impl<'a> Authenticator<'a> {
    pub fn new(mode: PinMode, radio_address: BluetoothAddress, events: &'a EventSink) -> Self {
        Self {
            mode,
            radio_address,
            events,
        }
    }

    /// Authenticate a candidate that is not connected.
    ///
    /// Service enumeration afterwards is informational only; its result never fails the call.
    pub fn authenticate<R: BluetoothRadio>(
        &self,
        radio: &R,
        device: &DeviceRecord,
    ) -> Result<(), SyncError> {
        let pin = protocol::derive_pin(self.mode, &self.radio_address, &device.address);
        info!(address = %device.address, mode = %self.mode, "Authenticating");

        let result = radio.authenticate(device, &pin);
        self.events.emit(SyncEvent::Authenticated {
            address: device.address,
            result,
        });
        if let Err(code) = result {
            warn!(address = %device.address, %code, "Authentication failed");
            return Err(SyncError::AuthenticationFailed { code });
        }

        match radio.enumerate_services(device) {
            Ok(count) => debug!(address = %device.address, count, "Installed services"),
            Err(code) => debug!(address = %device.address, %code, "Service enumeration failed"),
        }

        Ok(())
    }
}
