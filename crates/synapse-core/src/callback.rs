//! Host-facing callback interfaces
//!
//! The bridge republishes service events to exactly one registered
//! [`SdkCallback`]. Bind outcomes and one-shot operations report through the
//! dedicated callbacks below.

use crate::response::ResponseCode;
use crate::states::ConnectionState;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a bind attempt failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BindError {
    /// No installed component implements the service interface
    ServiceNotFound,
    /// More than one component matched; treated as a configuration error
    MultipleServicesFound,
    /// The connection request itself was rejected
    PermissionDenied,
    UnknownError,
}

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindError::ServiceNotFound => write!(f, "ServiceNotFound"),
            BindError::MultipleServicesFound => write!(f, "MultipleServicesFound"),
            BindError::PermissionDenied => write!(f, "PermissionDenied"),
            BindError::UnknownError => write!(f, "UnknownError"),
        }
    }
}

/// Outcome of a bind attempt
pub trait BindCallback: Send + Sync {
    fn on_success(&self);
    fn on_failure(&self, error: BindError);
}

/// Outcome of a one-shot operation such as launching the login flow
pub trait SuccessOrFailureCallback: Send + Sync {
    fn on_success(&self);
    fn on_failure(&self, response: ResponseCode);
}

/// The single host listener the bridge fans events out to
///
/// There is intentionally no error method here: service error reports are
/// logged by the bridge and not relayed (see DESIGN.md).
pub trait SdkCallback: Send + Sync {
    fn scan_result(&self, device_id: &str);
    fn connection_status(&self, previous: ConnectionState, current: ConnectionState);
    fn value_changed(&self, key: &str, value: f32);
    fn qa_status(&self, passed: bool, failure_type: i32);
    fn session_complete(&self);
    fn signal_quality(&self, quality: &str);
}
