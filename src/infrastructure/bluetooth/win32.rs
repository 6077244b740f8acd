//! Win32 Bluetooth Backend
//!
//! [`BluetoothStack`] over the classic `BluetoothAPIs` (Bthprops). Radio and
//! device-search handles are owned by guards that close them on drop.

use crate::domain::models::{BluetoothAddress, DeviceRecord, ErrorCode, RadioInfo};
use crate::infrastructure::bluetooth::protocol::{self, Pin};
use crate::infrastructure::bluetooth::stack::{BluetoothRadio, BluetoothStack};
use tracing::{debug, trace};
use windows::core::GUID;
use windows::Win32::Devices::Bluetooth::{
    BluetoothAuthenticateDevice, BluetoothEnumerateInstalledServices, BluetoothFindDeviceClose,
    BluetoothFindFirstDevice, BluetoothFindFirstRadio, BluetoothFindNextDevice,
    BluetoothFindRadioClose, BluetoothGetDeviceInfo, BluetoothGetRadioInfo, BluetoothRemoveDevice,
    BluetoothSetServiceState, BLUETOOTH_ADDRESS, BLUETOOTH_ADDRESS_0, BLUETOOTH_DEVICE_INFO,
    BLUETOOTH_DEVICE_SEARCH_PARAMS, BLUETOOTH_FIND_RADIO_PARAMS, BLUETOOTH_RADIO_INFO,
    BLUETOOTH_SERVICE_DISABLE, BLUETOOTH_SERVICE_ENABLE, HBLUETOOTH_DEVICE_FIND,
};
use windows::Win32::Foundation::{CloseHandle, HANDLE};

const HID_SERVICE_CLASS: GUID = GUID::from_u128(protocol::HID_SERVICE_CLASS_UUID);

/// Recover the Win32 code from an HRESULT built with `HRESULT_FROM_WIN32`
fn win32_code(err: &windows::core::Error) -> ErrorCode {
    ErrorCode((err.code().0 as u32) & 0xFFFF)
}

fn check(status: u32) -> Result<(), ErrorCode> {
    if status == ErrorCode::SUCCESS.0 {
        Ok(())
    } else {
        Err(ErrorCode(status))
    }
}

fn wide_to_string(buf: &[u16]) -> String {
    let len = buf.iter().position(|&c| c == 0).unwrap_or(buf.len());
    String::from_utf16_lossy(&buf[..len])
}

fn to_os_address(address: &BluetoothAddress) -> BLUETOOTH_ADDRESS {
    BLUETOOTH_ADDRESS {
        Anonymous: BLUETOOTH_ADDRESS_0 {
            ullLong: address.to_u64(),
        },
    }
}

fn from_os_address(address: &BLUETOOTH_ADDRESS) -> BluetoothAddress {
    // Both union members alias the same 8 bytes
    let raw = unsafe { address.Anonymous.ullLong }.to_le_bytes();
    BluetoothAddress::new([raw[0], raw[1], raw[2], raw[3], raw[4], raw[5]])
}

fn empty_device_info() -> BLUETOOTH_DEVICE_INFO {
    BLUETOOTH_DEVICE_INFO {
        dwSize: std::mem::size_of::<BLUETOOTH_DEVICE_INFO>() as u32,
        ..Default::default()
    }
}

fn to_record(info: &BLUETOOTH_DEVICE_INFO) -> DeviceRecord {
    DeviceRecord {
        address: from_os_address(&info.Address),
        name: wide_to_string(&info.szName),
        remembered: info.fRemembered.as_bool(),
        authenticated: info.fAuthenticated.as_bool(),
        connected: info.fConnected.as_bool(),
    }
}

fn to_device_info(device: &DeviceRecord) -> BLUETOOTH_DEVICE_INFO {
    let mut info = empty_device_info();
    info.Address = to_os_address(&device.address);
    info.fRemembered = device.remembered.into();
    info.fAuthenticated = device.authenticated.into();
    info.fConnected = device.connected.into();
    let capacity = info.szName.len() - 1;
    for (slot, unit) in info
        .szName
        .iter_mut()
        .zip(device.name.encode_utf16().take(capacity))
    {
        *slot = unit;
    }
    info
}

/// Closes a device search on drop
struct DeviceFind(HBLUETOOTH_DEVICE_FIND);

impl Drop for DeviceFind {
    fn drop(&mut self) {
        let _ = unsafe { BluetoothFindDeviceClose(self.0) };
    }
}

/// Stack backed by the Windows Bluetooth APIs
#[derive(Debug, Clone, Copy, Default)]
pub struct Win32BluetoothStack;

impl BluetoothStack for Win32BluetoothStack {
    type Radio = Win32Radio;

    fn find_local_radio(&self) -> Result<Win32Radio, ErrorCode> {
        let params = BLUETOOTH_FIND_RADIO_PARAMS {
            dwSize: std::mem::size_of::<BLUETOOTH_FIND_RADIO_PARAMS>() as u32,
        };
        let mut handle = HANDLE::default();
        let find = unsafe { BluetoothFindFirstRadio(&params, &mut handle) }
            .map_err(|e| win32_code(&e))?;
        // Only the first radio is used; the search itself is not needed any more
        let _ = unsafe { BluetoothFindRadioClose(find) };
        trace!("Radio handle opened");
        Ok(Win32Radio { handle })
    }
}

/// Open radio handle, closed on drop
#[derive(Debug)]
pub struct Win32Radio {
    handle: HANDLE,
}

impl Win32Radio {
    fn search(
        &self,
        issue_inquiry: bool,
        timeout_multiplier: u8,
    ) -> Result<Vec<DeviceRecord>, ErrorCode> {
        let params = BLUETOOTH_DEVICE_SEARCH_PARAMS {
            dwSize: std::mem::size_of::<BLUETOOTH_DEVICE_SEARCH_PARAMS>() as u32,
            fReturnAuthenticated: true.into(),
            fReturnRemembered: true.into(),
            fReturnUnknown: true.into(),
            fReturnConnected: true.into(),
            fIssueInquiry: issue_inquiry.into(),
            cTimeoutMultiplier: if issue_inquiry { timeout_multiplier } else { 0 },
            hRadio: self.handle,
        };

        let mut info = empty_device_info();
        let find = unsafe { BluetoothFindFirstDevice(&params, &mut info) }
            .map(DeviceFind)
            .map_err(|e| win32_code(&e))?;

        let mut devices = vec![to_record(&info)];
        loop {
            let mut next = empty_device_info();
            if unsafe { BluetoothFindNextDevice(find.0, &mut next) }.is_err() {
                break;
            }
            devices.push(to_record(&next));
        }
        debug!(count = devices.len(), issue_inquiry, "Device search finished");
        Ok(devices)
    }
}

impl BluetoothRadio for Win32Radio {
    fn info(&self) -> Result<RadioInfo, ErrorCode> {
        let mut info = BLUETOOTH_RADIO_INFO {
            dwSize: std::mem::size_of::<BLUETOOTH_RADIO_INFO>() as u32,
            ..Default::default()
        };
        check(unsafe { BluetoothGetRadioInfo(self.handle, &mut info) })?;
        Ok(RadioInfo {
            address: from_os_address(&info.address),
            name: wide_to_string(&info.szName),
        })
    }

    fn list_known_devices(&self) -> Result<Vec<DeviceRecord>, ErrorCode> {
        self.search(false, 0)
    }

    fn discover_devices(&self, timeout_multiplier: u8) -> Result<Vec<DeviceRecord>, ErrorCode> {
        self.search(true, timeout_multiplier)
    }

    fn authenticate(&self, device: &DeviceRecord, pin: &Pin) -> Result<(), ErrorCode> {
        let mut info = to_device_info(device);
        let passkey = pin.to_wide();
        let status = unsafe {
            BluetoothAuthenticateDevice(
                None,
                Some(self.handle),
                &mut info,
                Some(passkey.as_slice()),
            )
        };
        debug!(status, "BluetoothAuthenticateDevice");
        check(status)
    }

    fn enumerate_services(&self, device: &DeviceRecord) -> Result<u32, ErrorCode> {
        let info = to_device_info(device);
        let mut count = 0u32;
        let status = unsafe {
            BluetoothEnumerateInstalledServices(Some(self.handle), &info, &mut count, None)
        };
        debug!(status, count, "BluetoothEnumerateInstalledServices");
        // Without a buffer the API reports the count through ERROR_MORE_DATA
        if status == ErrorCode::MORE_DATA.0 {
            return Ok(count);
        }
        check(status).map(|()| count)
    }

    fn set_hid_service_state(&self, device: &DeviceRecord, enable: bool) -> Result<(), ErrorCode> {
        let info = to_device_info(device);
        let flags = if enable {
            BLUETOOTH_SERVICE_ENABLE
        } else {
            BLUETOOTH_SERVICE_DISABLE
        };
        let status = unsafe {
            BluetoothSetServiceState(Some(self.handle), &info, &HID_SERVICE_CLASS, flags)
        };
        debug!(status, enable, "BluetoothSetServiceState");
        check(status)
    }

    fn remove_device(&self, address: &BluetoothAddress) -> Result<(), ErrorCode> {
        let os_address = to_os_address(address);
        let status = unsafe { BluetoothRemoveDevice(&os_address) };
        debug!(status, %address, "BluetoothRemoveDevice");
        check(status)
    }

    fn device_info(&self, address: &BluetoothAddress) -> Result<DeviceRecord, ErrorCode> {
        let mut info = empty_device_info();
        info.Address = to_os_address(address);
        check(unsafe { BluetoothGetDeviceInfo(Some(self.handle), &mut info) })?;
        Ok(to_record(&info))
    }
}

impl Drop for Win32Radio {
    fn drop(&mut self) {
        let _ = unsafe { CloseHandle(self.handle) };
        trace!("Radio handle closed");
    }
}
