//! Host-side callback: logs events and feeds them to the main loop

use std::sync::Mutex;

use synapse_core::stream::StreamMessage;
use synapse_core::{BindCallback, BindError, ConnectionState, SdkCallback, ServiceEvent};
use tokio::sync::mpsc;

/// Events as the main loop consumes them
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    ScanResult(String),
    Connection(ConnectionState, ConnectionState),
    Value(String, f32),
    Qa { passed: bool, failure_type: i32 },
    SessionComplete,
    SignalQuality(String),
}

/// The one callback registered with the bridge
///
/// Every event is logged, republished as a stream-vocabulary JSON line, and
/// forwarded into the main loop's channel.
pub struct HostCallback {
    sender: mpsc::UnboundedSender<HostEvent>,
}

impl HostCallback {
    pub fn new(sender: mpsc::UnboundedSender<HostEvent>) -> Self {
        HostCallback { sender }
    }

    fn forward(&self, event: HostEvent) {
        // The main loop may have exited already; late events just drop.
        let _ = self.sender.send(event);
    }

    fn publish_stream(&self, event: &ServiceEvent) {
        if let Some(message) = StreamMessage::from_event(event) {
            if let Ok(json) = serde_json::to_string(&message) {
                println!("{}", json);
            }
        }
    }
}

impl SdkCallback for HostCallback {
    fn scan_result(&self, device_id: &str) {
        tracing::info!(device_id, "scan result");
        self.forward(HostEvent::ScanResult(device_id.to_string()));
    }

    fn connection_status(&self, previous: ConnectionState, current: ConnectionState) {
        tracing::info!(%previous, %current, "connection status");
        self.publish_stream(&ServiceEvent::ConnectionChanged { previous, current });
        self.forward(HostEvent::Connection(previous, current));
    }

    fn value_changed(&self, key: &str, value: f32) {
        tracing::info!(key, value, "value changed");
        self.publish_stream(&ServiceEvent::ValueChanged {
            key: key.to_string(),
            value,
        });
        self.forward(HostEvent::Value(key.to_string(), value));
    }

    fn qa_status(&self, passed: bool, failure_type: i32) {
        tracing::info!(passed, failure_type, "qa status");
        self.publish_stream(&ServiceEvent::QaStatus { passed, failure_type });
        self.forward(HostEvent::Qa { passed, failure_type });
    }

    fn session_complete(&self) {
        tracing::info!("session complete");
        self.publish_stream(&ServiceEvent::SessionComplete);
        self.forward(HostEvent::SessionComplete);
    }

    fn signal_quality(&self, quality: &str) {
        tracing::debug!(quality, "signal quality");
        self.forward(HostEvent::SignalQuality(quality.to_string()));
    }
}

/// Captures the bind outcome for the main flow
#[derive(Default)]
pub struct LatchBindCallback {
    outcome: Mutex<Option<Result<(), BindError>>>,
}

impl LatchBindCallback {
    pub fn outcome(&self) -> Option<Result<(), BindError>> {
        self.outcome.lock().unwrap().clone()
    }
}

impl BindCallback for LatchBindCallback {
    fn on_success(&self) {
        *self.outcome.lock().unwrap() = Some(Ok(()));
    }

    fn on_failure(&self, error: BindError) {
        *self.outcome.lock().unwrap() = Some(Err(error));
    }
}
