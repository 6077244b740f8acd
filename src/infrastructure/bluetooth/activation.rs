//! HID Service Activation
//!
//! Enables the Human Interface Device service on an authenticated remote.

use crate::domain::errors::SyncError;
use crate::domain::models::{DeviceRecord, ErrorCode, SyncEvent};
use crate::infrastructure::bluetooth::stack::BluetoothRadio;
use crate::infrastructure::events::EventSink;
use tracing::{debug, info, warn};

pub struct ServiceActivator<'a> {
    events: &'a EventSink,
}

impl<'a> ServiceActivator<'a> {
    pub fn new(events: &'a EventSink) -> Self {
        Self { events }
    }

    /// Enable the HID service.
    ///
    /// `ERROR_INVALID_PARAMETER` means the OS holds an inconsistent pairing for
    /// the address; the device is removed so a later inquiry starts from scratch.
    pub fn activate<R: BluetoothRadio>(
        &self,
        radio: &R,
        device: &DeviceRecord,
    ) -> Result<(), SyncError> {
        info!(address = %device.address, "Enabling HID service");
        let result = radio.set_hid_service_state(device, true);
        self.events.emit(SyncEvent::ServiceActivated {
            address: device.address,
            result,
        });

        match result {
            Ok(()) => info!(address = %device.address, "HID service enabled"),
            Err(ErrorCode::INVALID_PARAMETER) => {
                warn!(address = %device.address, "HID enable failed with invalid parameter, removing device");
                let error = radio.remove_device(&device.address).err();
                if let Some(code) = error {
                    warn!(address = %device.address, %code, "Remove failed");
                }
                self.events.emit(SyncEvent::RemovedForRetry {
                    address: device.address,
                    error,
                });
            }
            Err(code) => warn!(address = %device.address, %code, "HID enable failed"),
        }

        self.refresh(radio, device);

        result.map_err(|code| SyncError::ServiceActivationFailed { code })
    }

    /// Re-read the device after the state change, for diagnostics only
    fn refresh<R: BluetoothRadio>(&self, radio: &R, device: &DeviceRecord) {
        let result = radio.device_info(&device.address);
        match &result {
            Ok(fresh) => debug!(
                address = %fresh.address,
                remembered = fresh.remembered,
                authenticated = fresh.authenticated,
                connected = fresh.connected,
                "Flags after service"
            ),
            Err(code) => debug!(address = %device.address, %code, "Device info unavailable"),
        }
        self.events.emit(SyncEvent::SnapshotRefreshed { result });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::bluetooth::mock::{wiimote, Call, MockBluetoothStack};

    #[test]
    fn test_success_refreshes_snapshot() {
        let device = wiimote(1);
        let stack = MockBluetoothStack::new();
        let events = EventSink::disabled();

        ServiceActivator::new(&events)
            .activate(&stack.radio(), &device)
            .unwrap();

        assert_eq!(
            stack.calls(),
            vec![
                Call::SetHidService(device.address, true),
                Call::DeviceInfo(device.address),
                Call::ReleaseRadio,
            ]
        );
    }

    #[test]
    fn test_invalid_parameter_removes_device() {
        let device = wiimote(1);
        let stack =
            MockBluetoothStack::new().fail_activation(device.address, ErrorCode::INVALID_PARAMETER);
        let events = EventSink::disabled();

        let err = ServiceActivator::new(&events)
            .activate(&stack.radio(), &device)
            .unwrap_err();

        assert_eq!(
            err,
            SyncError::ServiceActivationFailed {
                code: ErrorCode::INVALID_PARAMETER
            }
        );
        assert_eq!(
            stack.calls(),
            vec![
                Call::SetHidService(device.address, true),
                Call::Remove(device.address),
                Call::DeviceInfo(device.address),
                Call::ReleaseRadio,
            ]
        );
    }

    #[test]
    fn test_other_failure_keeps_device() {
        let device = wiimote(1);
        let stack = MockBluetoothStack::new().fail_activation(device.address, ErrorCode(1167));
        let events = EventSink::disabled();

        let err = ServiceActivator::new(&events)
            .activate(&stack.radio(), &device)
            .unwrap_err();

        assert_eq!(
            err,
            SyncError::ServiceActivationFailed {
                code: ErrorCode(1167)
            }
        );
        assert_eq!(stack.count(|c| matches!(c, Call::Remove(_))), 0);
        assert_eq!(stack.count(|c| matches!(c, Call::DeviceInfo(_))), 1);
    }
}
