//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::Parser;

use crate::domain::models::PinMode;

/// Pair a Wii Remote in sync mode with this PC's Bluetooth radio.
///
/// Press the red SYNC button on the remote before running.
#[derive(Debug, Parser)]
#[command(name = "wiimote_sync", version)]
pub struct Cli {
    /// "bond" pairs permanently using the PC's address as PIN (default);
    /// "guest" pairs temporarily using the remote's own address
    pub mode: Option<String>,

    /// Settings file to use instead of the one in the user config directory
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level override (trace, debug, info, warn, error)
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Write the effective settings to the settings file and continue
    #[arg(long)]
    pub write_default_config: bool,
}

impl Cli {
    pub fn pin_mode(&self) -> PinMode {
        PinMode::from_arg(self.mode.as_deref())
    }

    /// A mode argument that is neither "bond" nor "guest"
    pub fn unrecognized_mode(&self) -> Option<&str> {
        self.mode
            .as_deref()
            .filter(|mode| !matches!(*mode, "bond" | "guest"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mode_is_bond() {
        let cli = Cli::parse_from(["wiimote_sync"]);
        assert_eq!(cli.pin_mode(), PinMode::Host);
        assert_eq!(cli.unrecognized_mode(), None);
    }

    #[test]
    fn test_guest_mode() {
        let cli = Cli::parse_from(["wiimote_sync", "guest"]);
        assert_eq!(cli.pin_mode(), PinMode::Device);
    }

    #[test]
    fn test_unknown_mode_falls_back_to_bond() {
        let cli = Cli::parse_from(["wiimote_sync", "pair", "--log-level", "debug"]);
        assert_eq!(cli.pin_mode(), PinMode::Host);
        assert_eq!(cli.unrecognized_mode(), Some("pair"));
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
    }
}
