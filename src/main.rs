#![cfg_attr(not(windows), allow(dead_code))]

mod cli;
mod domain;
mod infrastructure;

use anyhow::Context;
use clap::Parser;
use cli::Cli;
use domain::errors::SyncOutcome;
use domain::models::{MessageSeverity, SyncEvent};
use domain::settings::SettingsService;
use infrastructure::bluetooth::stack::BluetoothStack;
use infrastructure::bluetooth::{SyncConfig, SyncService};
use infrastructure::events::EventSink;
use infrastructure::logging;
use tokio::sync::mpsc;
use tracing::{info, warn};

fn print_event(event: &SyncEvent) {
    let status = event.status();
    match status.severity {
        MessageSeverity::Warning | MessageSeverity::Error => eprintln!("{}", status.message),
        MessageSeverity::Info | MessageSeverity::Success => println!("{}", status.message),
    }
}

/// Run the blocking sync on a worker thread while printing its progress
async fn run_sync<S>(stack: S, config: SyncConfig) -> anyhow::Result<SyncOutcome>
where
    S: BluetoothStack + Send + 'static,
{
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let task = tokio::task::spawn_blocking(move || {
        SyncService::new(stack, config, EventSink::new(event_tx)).run()
    });

    while let Some(event) = event_rx.recv().await {
        print_event(&event);
    }

    task.await.context("Sync task failed")
}

#[cfg(not(windows))]
fn unsupported_platform(_config: SyncConfig) -> anyhow::Result<SyncOutcome> {
    anyhow::bail!("Wiimote sync requires the Windows Bluetooth stack")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings_service = match &cli.config {
        Some(path) => SettingsService::from_path(path.clone()),
        None => SettingsService::new()?,
    };
    if let Some(level) = &cli.log_level {
        settings_service.get_mut().log_settings.level = level.clone();
    }
    if cli.write_default_config {
        settings_service.save().with_context(|| {
            format!(
                "Failed to write settings to {}",
                settings_service.path().display()
            )
        })?;
    }
    let settings = settings_service.get().clone();

    let log_guard = logging::init_logger(&settings.log_settings)?;
    info!("Starting Wiimote sync");
    if let Some(mode) = cli.unrecognized_mode() {
        warn!(mode, "Unrecognized mode, using bond");
    }

    let config = SyncConfig::from_settings(&settings, cli.pin_mode());

    #[cfg(windows)]
    let outcome = run_sync(
        infrastructure::bluetooth::win32::Win32BluetoothStack,
        config,
    )
    .await?;
    #[cfg(not(windows))]
    let outcome = unsupported_platform(config)?;

    match &outcome {
        SyncOutcome::Success(device) => {
            println!("Wiimote {} ({}) is ready", device.name, device.address)
        }
        SyncOutcome::Failed(err) => eprintln!("Sync failed: {}", err),
    }

    let exit_code = outcome.exit_code();
    info!(exit_code, "Exiting");
    // process::exit skips destructors, flush the log files first
    drop(log_guard);
    std::process::exit(exit_code as i32)
}
