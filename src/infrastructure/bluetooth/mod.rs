//! Bluetooth Module
//!
//! Pairs a Wii Remote over classic Bluetooth.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                      SyncService                         │
//! │   (locate radio -> reap stale -> scan/auth/activate)     │
//! └─────────────────────┬───────────────────────────────────┘
//!                       │
//!     ┌─────────┬───────┼─────────┬──────────────┐
//!     ▼         ▼       ▼         ▼              ▼
//! ┌───────┐ ┌────────┐ ┌───────┐ ┌────────────┐ ┌────────────┐
//! │ radio │ │ reaper │ │scanner│ │  pairing   │ │ activation │
//! └───────┘ └────────┘ └───────┘ └────────────┘ └────────────┘
//!                       │
//!                       ▼
//!            BluetoothStack / BluetoothRadio
//!            (win32 backend, mock in tests)
//! ```
//!
//! ## Modules
//!
//! - [`protocol`] - Name patterns, HID service class, PIN derivation
//! - [`stack`] - Traits the sync procedure calls the OS through
//! - [`radio`] - Local radio lookup
//! - [`reaper`] - Removal of stale remembered pairings
//! - [`scanner`] - Bounded inquiry passes
//! - [`pairing`] - PIN authentication
//! - [`activation`] - HID service enable with remove-on-invalid-parameter
//! - [`service`] - Main coordinator

pub mod activation;
#[cfg(test)]
pub mod mock;
pub mod pairing;
pub mod protocol;
pub mod radio;
pub mod reaper;
pub mod scanner;
pub mod service;
pub mod stack;
#[cfg(windows)]
pub mod win32;

// Re-export main service for convenience
pub use service::{SyncConfig, SyncService};
