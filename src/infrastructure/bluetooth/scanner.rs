//! Device Scanner
//!
//! Runs a bounded number of inquiry passes and hands every Wii Remote that is
//! not already connected to a caller-supplied handler.

use crate::domain::models::{DeviceRecord, SyncEvent};
use crate::infrastructure::bluetooth::protocol;
use crate::infrastructure::bluetooth::stack::BluetoothRadio;
use crate::infrastructure::events::EventSink;
use std::ops::ControlFlow;
use std::time::Duration;
use tracing::{debug, info, info_span, warn};

/// Configuration for discovery passes
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub max_passes: u32,
    /// Pause between passes when nothing has succeeded yet
    pub pass_delay: Duration,
    /// Inquiry length in units of 1.28 seconds
    pub inquiry_timeout_multiplier: u8,
    pub name_patterns: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_passes: protocol::MAX_DISCOVERY_PASSES,
            pass_delay: Duration::from_millis(protocol::PASS_DELAY_MS),
            inquiry_timeout_multiplier: protocol::INQUIRY_TIMEOUT_MULTIPLIER,
            name_patterns: protocol::NAME_PATTERNS
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }
}

/// Totals for a whole scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub passes: u32,
    pub devices_seen: usize,
    pub candidates: usize,
    /// The handler asked to stop
    pub stopped: bool,
}

pub struct DeviceScanner<'a> {
    config: &'a ScanConfig,
    events: &'a EventSink,
}

impl<'a> DeviceScanner<'a> {
    pub fn new(config: &'a ScanConfig, events: &'a EventSink) -> Self {
        Self { config, events }
    }

    /// Scan until `on_candidate` breaks or the passes run out
    pub fn run<R, F>(&self, radio: &R, mut on_candidate: F) -> ScanSummary
    where
        R: BluetoothRadio,
        F: FnMut(&DeviceRecord) -> ControlFlow<()>,
    {
        let mut summary = ScanSummary::default();

        for pass in 1..=self.config.max_passes {
            let _span = info_span!("discovery_pass", pass).entered();
            summary.passes = pass;
            info!("Discovery pass {}/{}", pass, self.config.max_passes);
            self.events.emit(SyncEvent::PassStarted {
                pass,
                max_passes: self.config.max_passes,
            });

            if self.scan_pass(radio, pass, &mut summary, &mut on_candidate) {
                summary.stopped = true;
                break;
            }

            if pass < self.config.max_passes && !self.config.pass_delay.is_zero() {
                debug!(delay_ms = self.config.pass_delay.as_millis() as u64, "Waiting before next pass");
                std::thread::sleep(self.config.pass_delay);
            }
        }

        info!(
            devices_seen = summary.devices_seen,
            candidates = summary.candidates,
            "Discovery complete"
        );
        summary
    }

    /// One inquiry. Returns true if the handler asked to stop.
    fn scan_pass<R, F>(
        &self,
        radio: &R,
        pass: u32,
        summary: &mut ScanSummary,
        on_candidate: &mut F,
    ) -> bool
    where
        R: BluetoothRadio,
        F: FnMut(&DeviceRecord) -> ControlFlow<()>,
    {
        let devices = match radio.discover_devices(self.config.inquiry_timeout_multiplier) {
            Ok(devices) if !devices.is_empty() => devices,
            Ok(_) => {
                warn!("No Bluetooth devices found");
                self.events.emit(SyncEvent::DiscoveryEmpty { pass, error: None });
                return false;
            }
            Err(code) => {
                warn!(%code, "No Bluetooth devices found");
                self.events.emit(SyncEvent::DiscoveryEmpty {
                    pass,
                    error: Some(code),
                });
                return false;
            }
        };

        for device in &devices {
            summary.devices_seen += 1;

            if !protocol::matches_name(&device.name, &self.config.name_patterns) {
                debug!(name = %device.name, "Ignored device");
                self.events.emit(SyncEvent::DeviceIgnored {
                    name: device.name.clone(),
                });
                continue;
            }

            summary.candidates += 1;
            info!(
                address = %device.address,
                name = %device.name,
                remembered = device.remembered,
                authenticated = device.authenticated,
                connected = device.connected,
                "Found Wiimote"
            );
            self.events.emit(SyncEvent::CandidateFound {
                device: device.clone(),
            });

            if device.connected {
                info!(address = %device.address, "Wiimote already connected, skipping");
                self.events.emit(SyncEvent::CandidateSkipped {
                    device: device.clone(),
                });
                continue;
            }

            if on_candidate(device).is_break() {
                return true;
            }
        }

        false
    }
}
