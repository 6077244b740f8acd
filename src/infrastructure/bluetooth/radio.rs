//! Radio Locator
//!
//! Opens the local Bluetooth radio and reads its address.

use crate::domain::errors::SyncError;
use crate::domain::models::{RadioInfo, SyncEvent};
use crate::infrastructure::bluetooth::stack::{BluetoothRadio, BluetoothStack};
use crate::infrastructure::events::EventSink;
use tracing::{error, info};

/// Open the radio and read its info.
///
/// If the info cannot be read the handle is dropped (and so released) before returning.
pub fn locate_radio<S: BluetoothStack>(
    stack: &S,
    events: &EventSink,
) -> Result<(S::Radio, RadioInfo), SyncError> {
    let radio = stack.find_local_radio().map_err(|code| {
        error!(%code, "No Bluetooth radio found");
        SyncError::RadioNotFound { code }
    })?;

    let radio_info = match radio.info() {
        Ok(radio_info) => radio_info,
        Err(code) => {
            error!(%code, "Failed to get radio info");
            drop(radio);
            return Err(SyncError::RadioInfoUnavailable { code });
        }
    };

    info!(address = %radio_info.address, name = %radio_info.name, "Host radio found");
    events.emit(SyncEvent::RadioFound {
        address: radio_info.address,
        name: radio_info.name.clone(),
    });

    Ok((radio, radio_info))
}
