use crate::domain::models::{DeviceRecord, ErrorCode};
use thiserror::Error;

/// Failures of a sync run
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    #[error("no Bluetooth radio found: {code}")]
    RadioNotFound { code: ErrorCode },

    #[error("failed to read radio info: {code}")]
    RadioInfoUnavailable { code: ErrorCode },

    #[error("authentication failed: {code}")]
    AuthenticationFailed { code: ErrorCode },

    #[error("enabling the HID service failed: {code}")]
    ServiceActivationFailed { code: ErrorCode },

    #[error("no Wiimote found")]
    DeviceNotFound,
}

impl SyncError {
    /// Only radio failures stop a run before discovery
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SyncError::RadioNotFound { .. } | SyncError::RadioInfoUnavailable { .. }
        )
    }

    /// Numeric status reported to the calling process
    pub fn exit_code(&self) -> u32 {
        match self {
            SyncError::RadioNotFound { code }
            | SyncError::RadioInfoUnavailable { code }
            | SyncError::ServiceActivationFailed { code } => nonzero(*code).0,
            SyncError::AuthenticationFailed { .. } => ErrorCode::GEN_FAILURE.0,
            SyncError::DeviceNotFound => ErrorCode::NOT_FOUND.0,
        }
    }
}

/// A failed call can still leave the thread's last error at zero
fn nonzero(code: ErrorCode) -> ErrorCode {
    if code == ErrorCode::SUCCESS {
        ErrorCode::NOT_FOUND
    } else {
        code
    }
}

/// Final result of one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The remote whose HID service was enabled
    Success(DeviceRecord),
    Failed(SyncError),
}

impl SyncOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SyncOutcome::Success(_))
    }

    pub fn exit_code(&self) -> u32 {
        match self {
            SyncOutcome::Success(_) => ErrorCode::SUCCESS.0,
            SyncOutcome::Failed(err) => err.exit_code(),
        }
    }
}
