//! JSON wire vocabulary for republishing events over a socket stream
//!
//! A service host can broadcast its event stream to clients on the local
//! network; these are the message shapes and key names used on that wire.
//! Auth messages carry the challenge handshake that precedes event delivery.

use crate::events::ServiceEvent;
use crate::session::current_time_ms;
use serde::{Deserialize, Serialize};

/// Name the streaming service advertises on the local network
pub const SERVICE_NAME: &str = "SynapseService";

/// Discovery protocol for the streaming service
pub const SERVICE_TYPE: &str = "_http._tcp";

/// One message on the stream socket, tagged by its `command` key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command")]
pub enum StreamMessage {
    #[serde(rename = "connection")]
    Connection {
        timestamp: u64,
        previous: i32,
        current: i32,
    },
    #[serde(rename = "valueChange")]
    ValueChanged {
        timestamp: u64,
        key: String,
        value: f32,
    },
    #[serde(rename = "qa")]
    Qa {
        timestamp: u64,
        passed: bool,
        #[serde(rename = "type")]
        failure_type: i32,
    },
    #[serde(rename = "sessionComplete")]
    SessionComplete { timestamp: u64 },
    #[serde(rename = "error")]
    Error {
        timestamp: u64,
        #[serde(rename = "errorCode")]
        error_code: i32,
        message: String,
    },
    #[serde(rename = "auth")]
    Auth {
        #[serde(rename = "apiKey")]
        api_key: String,
    },
    #[serde(rename = "challenge")]
    Challenge {
        #[serde(rename = "challenge_data")]
        challenge_data: String,
    },
    #[serde(rename = "auth-success")]
    AuthSuccess,
    #[serde(rename = "auth-failed")]
    AuthFailed,
}

impl StreamMessage {
    /// Wire form of a service event, stamped with the current time
    ///
    /// Device-list and signal-quality events have no stream representation;
    /// those stay on the binder contract only.
    pub fn from_event(event: &ServiceEvent) -> Option<StreamMessage> {
        let timestamp = current_time_ms();
        match event {
            ServiceEvent::ConnectionChanged { previous, current } => {
                Some(StreamMessage::Connection {
                    timestamp,
                    previous: previous.code(),
                    current: current.code(),
                })
            }
            ServiceEvent::ValueChanged { key, value } => Some(StreamMessage::ValueChanged {
                timestamp,
                key: key.clone(),
                value: *value,
            }),
            ServiceEvent::QaStatus { passed, failure_type } => Some(StreamMessage::Qa {
                timestamp,
                passed: *passed,
                failure_type: *failure_type,
            }),
            ServiceEvent::SessionComplete => Some(StreamMessage::SessionComplete { timestamp }),
            ServiceEvent::Error { code, message } => Some(StreamMessage::Error {
                timestamp,
                error_code: *code,
                message: message.clone(),
            }),
            ServiceEvent::DeviceList(_) | ServiceEvent::SignalQuality(_) => None,
        }
    }
}
