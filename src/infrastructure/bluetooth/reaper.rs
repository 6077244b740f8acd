//! Stale Device Reaper
//!
//! Forgets remembered Wii Remotes that are not connected, so an old pairing
//! cannot shadow the new one. Best effort: every failure is logged and skipped.

use crate::domain::models::SyncEvent;
use crate::infrastructure::bluetooth::protocol;
use crate::infrastructure::bluetooth::stack::BluetoothRadio;
use crate::infrastructure::events::EventSink;
use tracing::{debug, info, warn};

/// What a reap pass did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReapReport {
    pub examined: usize,
    pub removed: usize,
    pub failed: usize,
}

pub fn reap_stale_devices<R: BluetoothRadio>(
    radio: &R,
    name_patterns: &[String],
    events: &EventSink,
) -> ReapReport {
    let mut report = ReapReport::default();

    let devices = match radio.list_known_devices() {
        Ok(devices) => devices,
        Err(code) => {
            warn!(%code, "Could not enumerate known devices, skipping cleanup");
            return report;
        }
    };

    for device in devices {
        report.examined += 1;
        if !protocol::matches_name(&device.name, name_patterns) {
            continue;
        }
        if !device.remembered || device.connected {
            debug!(address = %device.address, connected = device.connected, "Keeping pairing");
            continue;
        }

        info!(address = %device.address, name = %device.name, "Removing remembered Wiimote (not connected)");
        let error = match radio.remove_device(&device.address) {
            Ok(()) => {
                report.removed += 1;
                None
            }
            Err(code) => {
                warn!(address = %device.address, %code, "Remove failed");
                report.failed += 1;
                Some(code)
            }
        };
        events.emit(SyncEvent::StaleDeviceRemoved { device, error });
    }

    report
}
