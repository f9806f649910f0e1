//! Legacy SDK constant taxonomy
//!
//! The predecessor SDK shipped the same named constants with a different
//! numeric layout: error codes are dense and non-negative, and the blocked
//! calibration state sits below zero instead of above. Clients talking to a
//! legacy service must use these values; they are not interchangeable with
//! the current ones.

use crate::error::{SynapseError, SynapseResult};
use crate::response::ResponseCode;
use crate::states;
use serde::{Deserialize, Serialize};

/// Error codes as emitted by the legacy service variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i32)]
pub enum ErrorCode {
    NotInitialized = 0,
    ApiKeyError = 1,
    ModelDownloadError = 2,
    SessionUpdateFailure = 3,
    SessionUploadFailure = 4,
    UserNotLoggedIn = 5,
    CheckCalibrationFailed = 6,
    SessionCreateFailure = 7,
    ServerConnectionError = 8,
    ModelsNotAvailable = 9,
    PredictionNotAvailable = 10,
}

impl ErrorCode {
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Name-for-name mapping into the current response taxonomy
    pub fn into_response_code(self) -> ResponseCode {
        match self {
            ErrorCode::NotInitialized => ResponseCode::NotInitialized,
            ErrorCode::ApiKeyError => ResponseCode::ApiKeyError,
            ErrorCode::ModelDownloadError => ResponseCode::ModelDownloadError,
            ErrorCode::SessionUpdateFailure => ResponseCode::SessionUpdateFailure,
            ErrorCode::SessionUploadFailure => ResponseCode::SessionUploadFailure,
            ErrorCode::UserNotLoggedIn => ResponseCode::UserNotLoggedIn,
            ErrorCode::CheckCalibrationFailed => ResponseCode::CheckCalibrationFailed,
            ErrorCode::SessionCreateFailure => ResponseCode::SessionCreateFailure,
            ErrorCode::ServerConnectionError => ResponseCode::ServerConnectionError,
            ErrorCode::ModelsNotAvailable => ResponseCode::ModelsNotAvailable,
            ErrorCode::PredictionNotAvailable => ResponseCode::PredictionNotAvailable,
        }
    }
}

impl TryFrom<i32> for ErrorCode {
    type Error = SynapseError;

    fn try_from(value: i32) -> SynapseResult<Self> {
        match value {
            0 => Ok(ErrorCode::NotInitialized),
            1 => Ok(ErrorCode::ApiKeyError),
            2 => Ok(ErrorCode::ModelDownloadError),
            3 => Ok(ErrorCode::SessionUpdateFailure),
            4 => Ok(ErrorCode::SessionUploadFailure),
            5 => Ok(ErrorCode::UserNotLoggedIn),
            6 => Ok(ErrorCode::CheckCalibrationFailed),
            7 => Ok(ErrorCode::SessionCreateFailure),
            8 => Ok(ErrorCode::ServerConnectionError),
            9 => Ok(ErrorCode::ModelsNotAvailable),
            10 => Ok(ErrorCode::PredictionNotAvailable),
            _ => Err(SynapseError::InvalidCode { kind: "legacy error code", value }),
        }
    }
}

/// Calibration states as emitted by the legacy service variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i32)]
pub enum CalibrationStatus {
    Blocked = -1,
    NeedsCalibration = 0,
    CalibrationDone = 1,
    ModelsAvailable = 2,
}

impl CalibrationStatus {
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn into_current(self) -> states::CalibrationStatus {
        match self {
            CalibrationStatus::Blocked => states::CalibrationStatus::Blocked,
            CalibrationStatus::NeedsCalibration => states::CalibrationStatus::NeedsCalibration,
            CalibrationStatus::CalibrationDone => states::CalibrationStatus::CalibrationDone,
            CalibrationStatus::ModelsAvailable => states::CalibrationStatus::ModelsAvailable,
        }
    }
}

impl TryFrom<i32> for CalibrationStatus {
    type Error = SynapseError;

    fn try_from(value: i32) -> SynapseResult<Self> {
        match value {
            -1 => Ok(CalibrationStatus::Blocked),
            0 => Ok(CalibrationStatus::NeedsCalibration),
            1 => Ok(CalibrationStatus::CalibrationDone),
            2 => Ok(CalibrationStatus::ModelsAvailable),
            _ => Err(SynapseError::InvalidCode { kind: "legacy calibration status", value }),
        }
    }
}
