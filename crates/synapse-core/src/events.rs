//! Asynchronous notifications pushed by the service

use crate::states::ConnectionState;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One unsolicited notification from the service
///
/// Serde support exists so simulated services can load playback scripts and
/// hosts can log events as structured records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ServiceEvent {
    /// Sensor connection transition
    ConnectionChanged {
        previous: ConnectionState,
        current: ConnectionState,
    },
    /// Realtime prediction value update; the key set is open
    ValueChanged { key: String, value: f32 },
    /// QA check outcome; `failure_type` is meaningful when `passed` is false
    QaStatus { passed: bool, failure_type: i32 },
    /// The active prediction session finished
    SessionComplete,
    /// Full scan result: device id mapped to transport address
    DeviceList(HashMap<String, String>),
    /// Opaque signal quality report
    SignalQuality(String),
    /// Service-side error report
    Error { code: i32, message: String },
}

impl ServiceEvent {
    /// Short name used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceEvent::ConnectionChanged { .. } => "connection-changed",
            ServiceEvent::ValueChanged { .. } => "value-changed",
            ServiceEvent::QaStatus { .. } => "qa-status",
            ServiceEvent::SessionComplete => "session-complete",
            ServiceEvent::DeviceList(_) => "device-list",
            ServiceEvent::SignalQuality(_) => "signal-quality",
            ServiceEvent::Error { .. } => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kind_names() {
        let event = ServiceEvent::ValueChanged {
            key: "focus".to_string(),
            value: 0.7,
        };
        assert_eq!(event.kind(), "value-changed");
        assert_eq!(ServiceEvent::SessionComplete.kind(), "session-complete");
    }

    #[test]
    fn test_event_serde_round_trip() {
        let event = ServiceEvent::ConnectionChanged {
            previous: ConnectionState::Connecting,
            current: ConnectionState::Connected,
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: ServiceEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
