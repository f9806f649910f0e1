//! Connection, login, calibration, QA and upload state constants
//!
//! These mirror the values arriving over the service callback contract. The
//! bridge never writes any of them; it only relays transitions.

use crate::error::{SynapseError, SynapseResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sensor connection states, delivered via connection-changed events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum ConnectionState {
    Unknown = 0,
    Connecting = 1,
    Connected = 2,
    ConnectionFailed = 3,
    Disconnected = 4,
    DisconnectedUponRequest = 5,
}

impl ConnectionState {
    /// Raw wire value
    pub fn code(self) -> i32 {
        self as i32
    }
}

impl TryFrom<i32> for ConnectionState {
    type Error = SynapseError;

    fn try_from(value: i32) -> SynapseResult<Self> {
        match value {
            0 => Ok(ConnectionState::Unknown),
            1 => Ok(ConnectionState::Connecting),
            2 => Ok(ConnectionState::Connected),
            3 => Ok(ConnectionState::ConnectionFailed),
            4 => Ok(ConnectionState::Disconnected),
            5 => Ok(ConnectionState::DisconnectedUponRequest),
            _ => Err(SynapseError::InvalidCode { kind: "connection state", value }),
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionState::Unknown => write!(f, "Unknown"),
            ConnectionState::Connecting => write!(f, "Connecting"),
            ConnectionState::Connected => write!(f, "Connected"),
            ConnectionState::ConnectionFailed => write!(f, "ConnectionFailed"),
            ConnectionState::Disconnected => write!(f, "Disconnected"),
            ConnectionState::DisconnectedUponRequest => write!(f, "DisconnectedUponRequest"),
        }
    }
}

/// User login status, returned by the login-status query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i32)]
pub enum LoginStatus {
    NotLoggedIn = 0,
    LoggedIn = 1,
}

impl LoginStatus {
    pub fn code(self) -> i32 {
        self as i32
    }
}

impl TryFrom<i32> for LoginStatus {
    type Error = SynapseError;

    fn try_from(value: i32) -> SynapseResult<Self> {
        match value {
            0 => Ok(LoginStatus::NotLoggedIn),
            1 => Ok(LoginStatus::LoggedIn),
            _ => Err(SynapseError::InvalidCode { kind: "login status", value }),
        }
    }
}

/// User calibration status, returned by the calibration-status query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i32)]
pub enum CalibrationStatus {
    NeedsCalibration = 0,
    CalibrationDone = 1,
    ModelsAvailable = 2,
    Blocked = 4,
}

impl CalibrationStatus {
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Whether prediction sessions can be started in this state
    pub fn models_ready(self) -> bool {
        matches!(self, CalibrationStatus::ModelsAvailable)
    }
}

impl TryFrom<i32> for CalibrationStatus {
    type Error = SynapseError;

    fn try_from(value: i32) -> SynapseResult<Self> {
        match value {
            0 => Ok(CalibrationStatus::NeedsCalibration),
            1 => Ok(CalibrationStatus::CalibrationDone),
            2 => Ok(CalibrationStatus::ModelsAvailable),
            4 => Ok(CalibrationStatus::Blocked),
            _ => Err(SynapseError::InvalidCode { kind: "calibration status", value }),
        }
    }
}

/// Reasons a QA check can fail, delivered via qa-status events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i32)]
pub enum QaFailureType {
    HeadbandOffHead = 1,
    MotionTooHigh = 2,
    EegFailure = 3,
}

impl QaFailureType {
    pub fn code(self) -> i32 {
        self as i32
    }
}

impl TryFrom<i32> for QaFailureType {
    type Error = SynapseError;

    fn try_from(value: i32) -> SynapseResult<Self> {
        match value {
            1 => Ok(QaFailureType::HeadbandOffHead),
            2 => Ok(QaFailureType::MotionTooHigh),
            3 => Ok(QaFailureType::EegFailure),
            _ => Err(SynapseError::InvalidCode { kind: "qa failure type", value }),
        }
    }
}

/// Session upload phases reported while a finished session is transferred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i32)]
pub enum UploadStatus {
    Starting = 1,
    Compressing = 2,
    Uploading = 3,
    Success = 4,
    Failed = 5,
}

impl UploadStatus {
    pub fn code(self) -> i32 {
        self as i32
    }
}

impl TryFrom<i32> for UploadStatus {
    type Error = SynapseError;

    fn try_from(value: i32) -> SynapseResult<Self> {
        match value {
            1 => Ok(UploadStatus::Starting),
            2 => Ok(UploadStatus::Compressing),
            3 => Ok(UploadStatus::Uploading),
            4 => Ok(UploadStatus::Success),
            5 => Ok(UploadStatus::Failed),
            _ => Err(SynapseError::InvalidCode { kind: "upload status", value }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_state_round_trip() {
        for code in 0..=5 {
            let state = ConnectionState::try_from(code).unwrap();
            assert_eq!(state.code(), code);
        }
        assert!(ConnectionState::try_from(6).is_err());
    }

    #[test]
    fn test_calibration_status_skips_three() {
        // The wire contract has no value 3; Blocked is 4.
        assert!(CalibrationStatus::try_from(3).is_err());
        assert_eq!(CalibrationStatus::try_from(4).unwrap(), CalibrationStatus::Blocked);
        assert_eq!(CalibrationStatus::Blocked.code(), 4);
    }

    #[test]
    fn test_models_ready() {
        assert!(CalibrationStatus::ModelsAvailable.models_ready());
        assert!(!CalibrationStatus::NeedsCalibration.models_ready());
        assert!(!CalibrationStatus::Blocked.models_ready());
    }

    #[test]
    fn test_invalid_code_error() {
        let err = LoginStatus::try_from(7).unwrap_err();
        assert_eq!(err, SynapseError::InvalidCode { kind: "login status", value: 7 });
    }
}
