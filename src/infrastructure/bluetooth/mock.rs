//! Mock Bluetooth stack for testing.
//!
//! Scripts radio lookup, discovery passes and per-device failures, and records
//! every call in order so tests can assert on sequencing.

use crate::domain::models::{BluetoothAddress, DeviceRecord, ErrorCode, RadioInfo};
use crate::infrastructure::bluetooth::protocol::Pin;
use crate::infrastructure::bluetooth::stack::{BluetoothRadio, BluetoothStack};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

/// A call observed by the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    FindRadio,
    RadioInfo,
    ListKnown,
    Discover,
    Authenticate(BluetoothAddress, Pin),
    EnumerateServices(BluetoothAddress),
    SetHidService(BluetoothAddress, bool),
    Remove(BluetoothAddress),
    DeviceInfo(BluetoothAddress),
    ReleaseRadio,
}

#[derive(Debug)]
struct MockState {
    radio_error: Option<ErrorCode>,
    radio_info: Result<RadioInfo, ErrorCode>,
    known: Result<Vec<DeviceRecord>, ErrorCode>,
    passes: VecDeque<Result<Vec<DeviceRecord>, ErrorCode>>,
    auth_failures: HashMap<BluetoothAddress, ErrorCode>,
    activation_failures: HashMap<BluetoothAddress, ErrorCode>,
    remove_failures: HashMap<BluetoothAddress, ErrorCode>,
    calls: Vec<Call>,
}

#[derive(Debug, Clone)]
pub struct MockBluetoothStack {
    state: Arc<Mutex<MockState>>,
}

pub fn radio_address() -> BluetoothAddress {
    BluetoothAddress::new([0x10, 0x20, 0x30, 0x40, 0x50, 0x60])
}

/// A Wii Remote snapshot with the given last address byte
pub fn wiimote(last: u8) -> DeviceRecord {
    DeviceRecord {
        address: BluetoothAddress::new([last, 0x01, 0x02, 0x03, 0x04, 0x05]),
        name: "Nintendo RVL-CNT-01".to_string(),
        remembered: false,
        authenticated: false,
        connected: false,
    }
}

pub fn other_device(last: u8) -> DeviceRecord {
    DeviceRecord {
        address: BluetoothAddress::new([last, 0xAA, 0xBB, 0xCC, 0xDD, 0xEE]),
        name: "Keyboard K380".to_string(),
        remembered: true,
        authenticated: true,
        connected: false,
    }
}

impl MockBluetoothStack {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                radio_error: None,
                radio_info: Ok(RadioInfo {
                    address: radio_address(),
                    name: "Mock Radio".to_string(),
                }),
                known: Ok(Vec::new()),
                passes: VecDeque::new(),
                auth_failures: HashMap::new(),
                activation_failures: HashMap::new(),
                remove_failures: HashMap::new(),
                calls: Vec::new(),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }

    pub fn without_radio(self, code: ErrorCode) -> Self {
        self.lock().radio_error = Some(code);
        self
    }

    pub fn with_radio_info_error(self, code: ErrorCode) -> Self {
        self.lock().radio_info = Err(code);
        self
    }

    pub fn with_known_devices(self, devices: Vec<DeviceRecord>) -> Self {
        self.lock().known = Ok(devices);
        self
    }

    pub fn with_known_devices_error(self, code: ErrorCode) -> Self {
        self.lock().known = Err(code);
        self
    }

    /// Queue the result of the next discovery call. Unscripted passes find nothing.
    pub fn with_pass(self, devices: Vec<DeviceRecord>) -> Self {
        self.lock().passes.push_back(Ok(devices));
        self
    }

    pub fn with_failed_pass(self, code: ErrorCode) -> Self {
        self.lock().passes.push_back(Err(code));
        self
    }

    pub fn fail_authentication(self, address: BluetoothAddress, code: ErrorCode) -> Self {
        self.lock().auth_failures.insert(address, code);
        self
    }

    pub fn fail_activation(self, address: BluetoothAddress, code: ErrorCode) -> Self {
        self.lock().activation_failures.insert(address, code);
        self
    }

    pub fn fail_removal(self, address: BluetoothAddress, code: ErrorCode) -> Self {
        self.lock().remove_failures.insert(address, code);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.lock().calls.iter().filter(|c| predicate(c)).count()
    }

    /// Open a radio directly, bypassing the scripted radio error
    pub fn radio(&self) -> MockRadio {
        MockRadio {
            stack: self.clone(),
        }
    }

    fn record(&self, call: Call) {
        self.lock().calls.push(call);
    }
}

impl Default for MockBluetoothStack {
    fn default() -> Self {
        Self::new()
    }
}

impl BluetoothStack for MockBluetoothStack {
    type Radio = MockRadio;

    fn find_local_radio(&self) -> Result<MockRadio, ErrorCode> {
        self.record(Call::FindRadio);
        match self.lock().radio_error {
            Some(code) => Err(code),
            None => Ok(self.radio()),
        }
    }
}

#[derive(Debug)]
pub struct MockRadio {
    stack: MockBluetoothStack,
}

impl MockRadio {
    fn respond<T>(&self, call: Call, f: impl FnOnce(&mut MockState) -> T) -> T {
        let mut state = self.stack.lock();
        state.calls.push(call);
        f(&mut state)
    }
}

impl BluetoothRadio for MockRadio {
    fn info(&self) -> Result<RadioInfo, ErrorCode> {
        self.respond(Call::RadioInfo, |s| s.radio_info.clone())
    }

    fn list_known_devices(&self) -> Result<Vec<DeviceRecord>, ErrorCode> {
        self.respond(Call::ListKnown, |s| s.known.clone())
    }

    fn discover_devices(&self, _timeout_multiplier: u8) -> Result<Vec<DeviceRecord>, ErrorCode> {
        self.respond(Call::Discover, |s| {
            s.passes.pop_front().unwrap_or_else(|| Ok(Vec::new()))
        })
    }

    fn authenticate(&self, device: &DeviceRecord, pin: &Pin) -> Result<(), ErrorCode> {
        self.respond(Call::Authenticate(device.address, *pin), |s| {
            match s.auth_failures.get(&device.address) {
                Some(code) => Err(*code),
                None => Ok(()),
            }
        })
    }

    fn enumerate_services(&self, device: &DeviceRecord) -> Result<u32, ErrorCode> {
        self.respond(Call::EnumerateServices(device.address), |_| Ok(1))
    }

    fn set_hid_service_state(&self, device: &DeviceRecord, enable: bool) -> Result<(), ErrorCode> {
        self.respond(Call::SetHidService(device.address, enable), |s| {
            match s.activation_failures.get(&device.address) {
                Some(code) => Err(*code),
                None => Ok(()),
            }
        })
    }

    fn remove_device(&self, address: &BluetoothAddress) -> Result<(), ErrorCode> {
        self.respond(Call::Remove(*address), |s| {
            match s.remove_failures.get(address) {
                Some(code) => Err(*code),
                None => Ok(()),
            }
        })
    }

    fn device_info(&self, address: &BluetoothAddress) -> Result<DeviceRecord, ErrorCode> {
        let address = *address;
        self.respond(Call::DeviceInfo(address), |s| {
            let activated = !s.activation_failures.contains_key(&address);
            Ok(DeviceRecord {
                address,
                name: "Nintendo RVL-CNT-01".to_string(),
                remembered: activated,
                authenticated: activated,
                connected: activated,
            })
        })
    }
}

impl Drop for MockRadio {
    fn drop(&mut self) {
        // Never panic here, a failing test may already be unwinding
        if let Ok(mut state) = self.stack.state.lock() {
            state.calls.push(Call::ReleaseRadio);
        }
    }
}
