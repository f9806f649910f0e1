//! Service contract: the remote proxy interface and its discovery seam
//!
//! The service implementation lives out of process; these traits are the
//! full surface the bridge consumes. Every proxy method can fail at the
//! transport level, which surfaces as `SynapseError::Transport` and is never
//! folded into application response codes.

use crate::callback::BindError;
use crate::error::SynapseResult;
use crate::events::ServiceEvent;
use crate::response::ResponseCode;
use crate::states::{CalibrationStatus, ConnectionState, LoginStatus};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Interface name used to resolve service providers
pub const SDK_SERVICE_INTERFACE: &str = "synapse.sdk.IBiosignalService";

/// Permission a host must hold before binding to the service
pub const SDK_DATA_PERMISSION: &str = "synapse.permission.BIOSIGNAL_DATA";

/// Receiver for notifications pushed by the service
///
/// The service invokes these on a transport-owned thread, concurrently with
/// any forwarding calls the host is making.
pub trait SdkListener: Send + Sync {
    fn on_connection_changed(&self, previous: ConnectionState, current: ConnectionState);
    fn on_value_changed(&self, key: &str, value: f32);
    fn on_qa_status(&self, passed: bool, failure_type: i32);
    fn on_session_complete(&self);
    fn on_device_list(&self, devices: HashMap<String, String>);
    fn on_signal_quality(&self, quality: &str);
    fn on_error(&self, code: i32, message: &str);

    /// Dispatch a whole [`ServiceEvent`] to the per-type methods
    fn on_event(&self, event: ServiceEvent) {
        match event {
            ServiceEvent::ConnectionChanged { previous, current } => {
                self.on_connection_changed(previous, current)
            }
            ServiceEvent::ValueChanged { key, value } => self.on_value_changed(&key, value),
            ServiceEvent::QaStatus { passed, failure_type } => {
                self.on_qa_status(passed, failure_type)
            }
            ServiceEvent::SessionComplete => self.on_session_complete(),
            ServiceEvent::DeviceList(devices) => self.on_device_list(devices),
            ServiceEvent::SignalQuality(quality) => self.on_signal_quality(&quality),
            ServiceEvent::Error { code, message } => self.on_error(code, &message),
        }
    }
}

/// Proxy interface to the remote biosignal service
///
/// Calls block the invoking thread until the remote side replies or the
/// transport fails. The bridge applies no timeout and no retry.
pub trait SdkService: Send + Sync {
    fn initialize_sdk(&self, api_key: &str) -> SynapseResult<ResponseCode>;
    fn shutdown_sdk(&self) -> SynapseResult<()>;
    fn get_user_login_status(&self) -> SynapseResult<LoginStatus>;
    fn check_user_calibration_status(&self) -> SynapseResult<CalibrationStatus>;
    fn scan_for_devices(&self) -> SynapseResult<()>;
    fn connect_sensor_device(&self, address: &str) -> SynapseResult<()>;
    fn disconnect_sensor_device(&self) -> SynapseResult<()>;
    fn start_prediction_session(&self, prediction: &str) -> SynapseResult<ResponseCode>;
    fn finish_session(&self) -> SynapseResult<ResponseCode>;
    fn write_user_marker(&self, marker: &str) -> SynapseResult<()>;
    fn register_sdk_callback(&self, listener: Arc<dyn SdkListener>) -> SynapseResult<()>;
    fn unregister_sdk_callback(&self) -> SynapseResult<()>;
}

/// One resolved provider of the service interface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceEndpoint {
    /// Package that hosts the service component
    pub package: String,
    /// Component name inside the package
    pub component: String,
}

impl ServiceEndpoint {
    pub fn new(package: impl Into<String>, component: impl Into<String>) -> Self {
        ServiceEndpoint {
            package: package.into(),
            component: component.into(),
        }
    }
}

/// Hook the directory fires when an established connection drops
pub type DisconnectHook = Box<dyn Fn() + Send + Sync>;

/// Host execution context capable of resolving installed service components
/// and establishing persistent connections to them
pub trait ServiceDirectory: Send + Sync {
    /// All installed providers of the given interface
    fn resolve(&self, interface: &str) -> Vec<ServiceEndpoint>;

    /// Connect to one endpoint, auto-creating the remote component if needed
    ///
    /// `on_disconnect` fires if the established connection later drops
    /// spontaneously (remote process death). A refused connection reports a
    /// [`BindError`] instead.
    fn connect(
        &self,
        endpoint: &ServiceEndpoint,
        on_disconnect: DisconnectHook,
    ) -> Result<Arc<dyn SdkService>, BindError>;
}
