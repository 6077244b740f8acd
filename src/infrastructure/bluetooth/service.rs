//! Sync Service Module
//!
//! Main coordinator: opens the radio, clears stale pairings, then scans,
//! authenticates and activates until one Wii Remote is usable.

use crate::domain::errors::{SyncError, SyncOutcome};
use crate::domain::models::{DeviceRecord, PinMode, SyncEvent};
use crate::domain::settings::SyncSettings;
use crate::infrastructure::bluetooth::{
    activation::ServiceActivator,
    pairing::Authenticator,
    radio, reaper,
    scanner::{DeviceScanner, ScanConfig},
    stack::BluetoothStack,
};
use crate::infrastructure::events::EventSink;
use std::ops::ControlFlow;
use std::time::Duration;
use tracing::{error, info, info_span, warn};

/// Configuration for one sync run
#[derive(Debug, Clone, Default)]
pub struct SyncConfig {
    pub pin_mode: PinMode,
    pub scan: ScanConfig,
}

impl SyncConfig {
    pub fn from_settings(settings: &SyncSettings, pin_mode: PinMode) -> Self {
        Self {
            pin_mode,
            scan: ScanConfig {
                max_passes: settings.max_passes,
                pass_delay: Duration::from_millis(settings.pass_delay_ms),
                inquiry_timeout_multiplier: settings.inquiry_timeout_multiplier,
                name_patterns: settings.name_patterns.clone(),
            },
        }
    }
}

/// Pairs a single Wii Remote through a [`BluetoothStack`]
pub struct SyncService<S: BluetoothStack> {
    stack: S,
    config: SyncConfig,
    events: EventSink,
}

impl<S: BluetoothStack> SyncService<S> {
    pub fn new(stack: S, config: SyncConfig, events: EventSink) -> Self {
        Self {
            stack,
            config,
            events,
        }
    }

    /// Run the whole procedure once. Blocks for the length of every inquiry.
    pub fn run(&self) -> SyncOutcome {
        let _span = info_span!("sync", mode = %self.config.pin_mode).entered();
        info!("Sync mode: {}", self.config.pin_mode);
        self.events.emit(SyncEvent::Started {
            mode: self.config.pin_mode,
        });

        // The radio is released when it goes out of scope, on every path below
        let (radio, radio_info) = match radio::locate_radio(&self.stack, &self.events) {
            Ok(located) => located,
            Err(err) => {
                error!(%err, terminal = err.is_terminal(), "Sync aborted");
                return SyncOutcome::Failed(err);
            }
        };

        {
            let _span = info_span!("reap_stale").entered();
            let report = reaper::reap_stale_devices(
                &radio,
                &self.config.scan.name_patterns,
                &self.events,
            );
            info!(
                examined = report.examined,
                removed = report.removed,
                failed = report.failed,
                "Stale pairing cleanup done"
            );
        }

        let authenticator =
            Authenticator::new(self.config.pin_mode, radio_info.address, &self.events);
        let activator = ServiceActivator::new(&self.events);
        let scanner = DeviceScanner::new(&self.config.scan, &self.events);

        let mut activated: Option<DeviceRecord> = None;
        let mut last_failure: Option<SyncError> = None;

        let summary = scanner.run(&radio, |candidate| {
            if let Err(err) = authenticator.authenticate(&radio, candidate) {
                last_failure = Some(err);
                return ControlFlow::Continue(());
            }
            match activator.activate(&radio, candidate) {
                Ok(()) => {
                    activated = Some(candidate.clone());
                    ControlFlow::Break(())
                }
                Err(err) => {
                    last_failure = Some(err);
                    ControlFlow::Continue(())
                }
            }
        });

        drop(radio);

        let outcome = match (activated, last_failure) {
            (Some(device), _) => SyncOutcome::Success(device),
            (None, Some(err)) => SyncOutcome::Failed(err),
            (None, None) => SyncOutcome::Failed(SyncError::DeviceNotFound),
        };

        match &outcome {
            SyncOutcome::Success(device) => {
                info!(address = %device.address, passes = summary.passes, "Wiimote synced")
            }
            SyncOutcome::Failed(err) => warn!(%err, passes = summary.passes, "Sync failed"),
        }
        self.events.emit(SyncEvent::Finished {
            devices_seen: summary.devices_seen,
            success: outcome.is_success(),
        });

        outcome
    }
}
