//! Error handling for the Synapse bridge crates
//!
//! Transport-level failures are kept strictly separate from application-level
//! response codes: a remote call that cannot complete is an error, a remote
//! call that completes with a failure code is a value.

use std::fmt;

/// Result type alias for bridge operations
pub type SynapseResult<T> = Result<T, SynapseError>;

/// Error type shared by all bridge operations
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum SynapseError {
    /// No proxy handle is held; the bridge is not bound to a service
    NotBound,

    /// The remote call itself could not complete
    Transport {
        /// Description of the transport failure
        reason: String,
    },

    /// Requested device id is not present in the current device map
    DeviceNotFound {
        /// The device id that was requested
        device_id: String,
    },

    /// A numeric value from the service does not map to a known constant
    InvalidCode {
        /// Constant family that was being decoded
        kind: &'static str,
        /// Value that failed to decode
        value: i32,
    },

    /// Failure inside a simulated service backend
    Simulation {
        /// Description of the simulation failure
        reason: String,
    },
}

impl fmt::Display for SynapseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SynapseError::NotBound => {
                write!(f, "Not bound to a service")
            }
            SynapseError::Transport { reason } => {
                write!(f, "Transport failure: {}", reason)
            }
            SynapseError::DeviceNotFound { device_id } => {
                write!(f, "Device not found in device map: {}", device_id)
            }
            SynapseError::InvalidCode { kind, value } => {
                write!(f, "Invalid {} code: {}", kind, value)
            }
            SynapseError::Simulation { reason } => {
                write!(f, "Simulation failure: {}", reason)
            }
        }
    }
}

impl std::error::Error for SynapseError {}

impl SynapseError {
    /// Transport failure with a formatted reason
    pub fn transport(reason: impl Into<String>) -> Self {
        SynapseError::Transport { reason: reason.into() }
    }
}
