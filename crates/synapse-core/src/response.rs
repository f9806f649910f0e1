//! Synchronous response codes returned from every forwarded call
//!
//! These are application-level results reported by the remote service. They
//! are distinct from transport failures, which surface as
//! [`SynapseError::Transport`](crate::error::SynapseError) instead.

use crate::error::{SynapseError, SynapseResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Success/failure taxonomy returned by the remote service
///
/// The legacy SDK variant uses a different numeric layout for the same
/// names; see [`crate::legacy::ErrorCode`]. The two are not interchangeable
/// on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum ResponseCode {
    UnknownError = -200,
    NotAllowed = -100,
    Success = 0,
    NotInitialized = -1,
    AlreadyInitialized = -2,
    ApiKeyError = -3,
    ModelDownloadError = -4,
    SessionUpdateFailure = -5,
    SessionUploadFailure = -6,
    UserNotLoggedIn = -7,
    CheckCalibrationFailed = -8,
    SessionCreateFailure = -9,
    ServerConnectionError = -10,
    ModelsNotAvailable = -11,
    PredictionNotAvailable = -12,
}

impl ResponseCode {
    /// Raw wire value
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn is_success(self) -> bool {
        self == ResponseCode::Success
    }
}

impl TryFrom<i32> for ResponseCode {
    type Error = SynapseError;

    fn try_from(value: i32) -> SynapseResult<Self> {
        match value {
            -200 => Ok(ResponseCode::UnknownError),
            -100 => Ok(ResponseCode::NotAllowed),
            0 => Ok(ResponseCode::Success),
            -1 => Ok(ResponseCode::NotInitialized),
            -2 => Ok(ResponseCode::AlreadyInitialized),
            -3 => Ok(ResponseCode::ApiKeyError),
            -4 => Ok(ResponseCode::ModelDownloadError),
            -5 => Ok(ResponseCode::SessionUpdateFailure),
            -6 => Ok(ResponseCode::SessionUploadFailure),
            -7 => Ok(ResponseCode::UserNotLoggedIn),
            -8 => Ok(ResponseCode::CheckCalibrationFailed),
            -9 => Ok(ResponseCode::SessionCreateFailure),
            -10 => Ok(ResponseCode::ServerConnectionError),
            -11 => Ok(ResponseCode::ModelsNotAvailable),
            -12 => Ok(ResponseCode::PredictionNotAvailable),
            _ => Err(SynapseError::InvalidCode { kind: "response code", value }),
        }
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResponseCode::UnknownError => "UnknownError",
            ResponseCode::NotAllowed => "NotAllowed",
            ResponseCode::Success => "Success",
            ResponseCode::NotInitialized => "NotInitialized",
            ResponseCode::AlreadyInitialized => "AlreadyInitialized",
            ResponseCode::ApiKeyError => "ApiKeyError",
            ResponseCode::ModelDownloadError => "ModelDownloadError",
            ResponseCode::SessionUpdateFailure => "SessionUpdateFailure",
            ResponseCode::SessionUploadFailure => "SessionUploadFailure",
            ResponseCode::UserNotLoggedIn => "UserNotLoggedIn",
            ResponseCode::CheckCalibrationFailed => "CheckCalibrationFailed",
            ResponseCode::SessionCreateFailure => "SessionCreateFailure",
            ResponseCode::ServerConnectionError => "ServerConnectionError",
            ResponseCode::ModelsNotAvailable => "ModelsNotAvailable",
            ResponseCode::PredictionNotAvailable => "PredictionNotAvailable",
        };
        write!(f, "{} ({})", name, self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_is_zero() {
        assert_eq!(ResponseCode::Success.code(), 0);
        assert!(ResponseCode::Success.is_success());
        assert!(!ResponseCode::NotInitialized.is_success());
    }

    #[test]
    fn test_sentinel_values() {
        assert_eq!(ResponseCode::UnknownError.code(), -200);
        assert_eq!(ResponseCode::NotAllowed.code(), -100);
        assert_eq!(ResponseCode::PredictionNotAvailable.code(), -12);
    }

    #[test]
    fn test_round_trip() {
        for code in [-200, -100, 0, -1, -2, -3, -4, -5, -6, -7, -8, -9, -10, -11, -12] {
            let response = ResponseCode::try_from(code).unwrap();
            assert_eq!(response.code(), code);
        }
        assert!(ResponseCode::try_from(-13).is_err());
        assert!(ResponseCode::try_from(1).is_err());
    }
}
