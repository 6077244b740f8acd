use std::fmt;

/// 6-byte Bluetooth hardware address, stored in OS order (least significant byte first)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BluetoothAddress([u8; 6]);

impl BluetoothAddress {
    pub const fn new(bytes: [u8; 6]) -> Self {
        Self(bytes)
    }

    /// Raw bytes in OS order
    pub fn bytes(&self) -> &[u8; 6] {
        &self.0
    }

    /// Packs the address into the low 48 bits of a u64, as the OS does
    pub fn to_u64(&self) -> u64 {
        let mut raw = [0u8; 8];
        raw[..6].copy_from_slice(&self.0);
        u64::from_le_bytes(raw)
    }
}

impl fmt::Display for BluetoothAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = &self.0;
        write!(
            f,
            "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
            b[5], b[4], b[3], b[2], b[1], b[0]
        )
    }
}

/// Which address the pairing PIN is derived from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PinMode {
    /// PIN is the host radio's address. The remote reconnects to this host on its own.
    #[default]
    Host,
    /// PIN is the remote's own address. Pairing is temporary.
    Device,
}

impl PinMode {
    /// Maps the command line selector. Anything other than "guest" means bond.
    pub fn from_arg(arg: Option<&str>) -> Self {
        match arg {
            Some("guest") => PinMode::Device,
            _ => PinMode::Host,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PinMode::Host => "bond",
            PinMode::Device => "guest",
        }
    }
}

impl fmt::Display for PinMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Win32 status code returned by the Bluetooth APIs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ErrorCode(pub u32);

impl ErrorCode {
    pub const SUCCESS: ErrorCode = ErrorCode(0);
    pub const GEN_FAILURE: ErrorCode = ErrorCode(31);
    pub const INVALID_PARAMETER: ErrorCode = ErrorCode(87);
    pub const MORE_DATA: ErrorCode = ErrorCode(234);
    pub const NO_MORE_ITEMS: ErrorCode = ErrorCode(259);
    pub const NOT_FOUND: ErrorCode = ErrorCode(1168);

    fn name(&self) -> Option<&'static str> {
        match *self {
            Self::SUCCESS => Some("ERROR_SUCCESS"),
            Self::GEN_FAILURE => Some("ERROR_GEN_FAILURE"),
            Self::INVALID_PARAMETER => Some("ERROR_INVALID_PARAMETER"),
            Self::MORE_DATA => Some("ERROR_MORE_DATA"),
            Self::NO_MORE_ITEMS => Some("ERROR_NO_MORE_ITEMS"),
            Self::NOT_FOUND => Some("ERROR_NOT_FOUND"),
            _ => None,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{} ({})", self.0, name),
            None => write!(f, "{}", self.0),
        }
    }
}

/// Local radio metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RadioInfo {
    pub address: BluetoothAddress,
    pub name: String,
}

/// Point-in-time snapshot of a device as reported by the OS.
///
/// The flags go stale after any authenticate, activate or remove call; fetch a
/// new snapshot instead of reusing these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceRecord {
    pub address: BluetoothAddress,
    pub name: String,
    pub remembered: bool,
    pub authenticated: bool,
    pub connected: bool,
}

/// Progress notifications emitted while syncing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    Started {
        mode: PinMode,
    },
    RadioFound {
        address: BluetoothAddress,
        name: String,
    },
    StaleDeviceRemoved {
        device: DeviceRecord,
        error: Option<ErrorCode>,
    },
    PassStarted {
        pass: u32,
        max_passes: u32,
    },
    DiscoveryEmpty {
        pass: u32,
        error: Option<ErrorCode>,
    },
    DeviceIgnored {
        name: String,
    },
    CandidateFound {
        device: DeviceRecord,
    },
    CandidateSkipped {
        device: DeviceRecord,
    },
    Authenticated {
        address: BluetoothAddress,
        result: Result<(), ErrorCode>,
    },
    ServiceActivated {
        address: BluetoothAddress,
        result: Result<(), ErrorCode>,
    },
    RemovedForRetry {
        address: BluetoothAddress,
        error: Option<ErrorCode>,
    },
    SnapshotRefreshed {
        result: Result<DeviceRecord, ErrorCode>,
    },
    Finished {
        devices_seen: usize,
        success: bool,
    },
}

impl SyncEvent {
    /// Human readable rendering for console output
    pub fn status(&self) -> StatusMessage {
        let (message, severity) = match self {
            SyncEvent::Started { mode } => (format!("Sync mode: {}", mode), MessageSeverity::Info),
            SyncEvent::RadioFound { address, name } => (
                format!("Host radio found: {} ({})", address, name),
                MessageSeverity::Info,
            ),
            SyncEvent::StaleDeviceRemoved { device, error } => match error {
                None => (
                    format!("Removed stale pairing {} ({})", device.name, device.address),
                    MessageSeverity::Info,
                ),
                Some(code) => (
                    format!(
                        "Could not remove stale pairing {} ({}): {}",
                        device.name, device.address, code
                    ),
                    MessageSeverity::Warning,
                ),
            },
            SyncEvent::PassStarted { pass, max_passes } => (
                format!("Discovery pass {}/{}", pass, max_passes),
                MessageSeverity::Info,
            ),
            SyncEvent::DiscoveryEmpty { pass, error } => (
                match error {
                    Some(code) => format!("No devices found in pass {}: {}", pass, code),
                    None => format!("No devices found in pass {}", pass),
                },
                MessageSeverity::Warning,
            ),
            SyncEvent::DeviceIgnored { name } => {
                (format!("Ignored device: {}", name), MessageSeverity::Info)
            }
            SyncEvent::CandidateFound { device } => (
                format!(
                    "Found Wiimote: {} ({}) remembered={} authenticated={} connected={}",
                    device.name,
                    device.address,
                    device.remembered,
                    device.authenticated,
                    device.connected
                ),
                MessageSeverity::Info,
            ),
            SyncEvent::CandidateSkipped { device } => (
                format!("{} already connected, skipping", device.address),
                MessageSeverity::Info,
            ),
            SyncEvent::Authenticated { address, result } => match result {
                Ok(()) => (format!("Authenticated {}", address), MessageSeverity::Info),
                Err(code) => (
                    format!("Authentication of {} failed: {}", address, code),
                    MessageSeverity::Error,
                ),
            },
            SyncEvent::ServiceActivated { address, result } => match result {
                Ok(()) => (
                    format!("HID service enabled on {}", address),
                    MessageSeverity::Success,
                ),
                Err(code) => (
                    format!("Enabling HID service on {} failed: {}", address, code),
                    MessageSeverity::Error,
                ),
            },
            SyncEvent::RemovedForRetry { address, error } => match error {
                None => (
                    format!("Removed {} so the next pass starts clean", address),
                    MessageSeverity::Warning,
                ),
                Some(code) => (
                    format!("Could not remove {}: {}", address, code),
                    MessageSeverity::Warning,
                ),
            },
            SyncEvent::SnapshotRefreshed { result } => match result {
                Ok(device) => (
                    format!(
                        "Flags after service - remembered={} authenticated={} connected={}",
                        device.remembered, device.authenticated, device.connected
                    ),
                    MessageSeverity::Info,
                ),
                Err(code) => (
                    format!("Could not refresh device info: {}", code),
                    MessageSeverity::Warning,
                ),
            },
            SyncEvent::Finished {
                devices_seen,
                success,
            } => (
                format!("Discovery complete. Devices seen: {}", devices_seen),
                if *success {
                    MessageSeverity::Success
                } else {
                    MessageSeverity::Error
                },
            ),
        };
        StatusMessage { message, severity }
    }
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub message: String,
    pub severity: MessageSeverity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageSeverity {
    Info,
    Success,
    Warning,
    Error,
}
