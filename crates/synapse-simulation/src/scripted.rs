//! Scripted service and directory for deterministic bridge testing
//!
//! [`ScriptedService`] implements the full remote proxy contract in-process:
//! responses are configurable, every dispatched call is recorded, and queued
//! events play back through whatever listener the bridge registered.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use synapse_core::{
    BindError, CalibrationStatus, DisconnectHook, LoginStatus, ResponseCode, SdkListener,
    SdkService, ServiceEndpoint, ServiceDirectory, ServiceEvent, SynapseError, SynapseResult,
    SDK_SERVICE_INTERFACE,
};

/// Remote operations, used to address transport-failure switches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteOp {
    InitializeSdk,
    ShutdownSdk,
    GetUserLoginStatus,
    CheckUserCalibrationStatus,
    ScanForDevices,
    ConnectSensorDevice,
    DisconnectSensorDevice,
    StartPredictionSession,
    FinishSession,
    WriteUserMarker,
    RegisterSdkCallback,
    UnregisterSdkCallback,
}

/// One remote call as the service saw it
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteCall {
    InitializeSdk { api_key: String },
    ShutdownSdk,
    GetUserLoginStatus,
    CheckUserCalibrationStatus,
    ScanForDevices,
    ConnectSensorDevice { address: String },
    DisconnectSensorDevice,
    StartPredictionSession { prediction: String },
    FinishSession,
    WriteUserMarker { marker: String },
    RegisterSdkCallback,
    UnregisterSdkCallback,
}

impl RemoteCall {
    pub fn op(&self) -> RemoteOp {
        match self {
            RemoteCall::InitializeSdk { .. } => RemoteOp::InitializeSdk,
            RemoteCall::ShutdownSdk => RemoteOp::ShutdownSdk,
            RemoteCall::GetUserLoginStatus => RemoteOp::GetUserLoginStatus,
            RemoteCall::CheckUserCalibrationStatus => RemoteOp::CheckUserCalibrationStatus,
            RemoteCall::ScanForDevices => RemoteOp::ScanForDevices,
            RemoteCall::ConnectSensorDevice { .. } => RemoteOp::ConnectSensorDevice,
            RemoteCall::DisconnectSensorDevice => RemoteOp::DisconnectSensorDevice,
            RemoteCall::StartPredictionSession { .. } => RemoteOp::StartPredictionSession,
            RemoteCall::FinishSession => RemoteOp::FinishSession,
            RemoteCall::WriteUserMarker { .. } => RemoteOp::WriteUserMarker,
            RemoteCall::RegisterSdkCallback => RemoteOp::RegisterSdkCallback,
            RemoteCall::UnregisterSdkCallback => RemoteOp::UnregisterSdkCallback,
        }
    }
}

struct ScriptedState {
    listener: Option<Arc<dyn SdkListener>>,
    calls: Vec<RemoteCall>,
    transport_failures: HashSet<RemoteOp>,
    initialize_response: ResponseCode,
    start_response: ResponseCode,
    finish_response: ResponseCode,
    login_status: LoginStatus,
    calibration_status: CalibrationStatus,
}

/// In-process stand-in for the remote biosignal service
pub struct ScriptedService {
    state: Mutex<ScriptedState>,
}

impl ScriptedService {
    pub fn new() -> Self {
        ScriptedService {
            state: Mutex::new(ScriptedState {
                listener: None,
                calls: Vec::new(),
                transport_failures: HashSet::new(),
                initialize_response: ResponseCode::Success,
                start_response: ResponseCode::Success,
                finish_response: ResponseCode::Success,
                login_status: LoginStatus::NotLoggedIn,
                calibration_status: CalibrationStatus::ModelsAvailable,
            }),
        }
    }

    pub fn set_initialize_response(&self, response: ResponseCode) {
        self.state.lock().unwrap().initialize_response = response;
    }

    pub fn set_start_response(&self, response: ResponseCode) {
        self.state.lock().unwrap().start_response = response;
    }

    pub fn set_finish_response(&self, response: ResponseCode) {
        self.state.lock().unwrap().finish_response = response;
    }

    pub fn set_login_status(&self, status: LoginStatus) {
        self.state.lock().unwrap().login_status = status;
    }

    pub fn set_calibration_status(&self, status: CalibrationStatus) {
        self.state.lock().unwrap().calibration_status = status;
    }

    /// Make one operation fail at the transport level from now on
    pub fn fail_transport(&self, op: RemoteOp) {
        self.state.lock().unwrap().transport_failures.insert(op);
    }

    /// Calls dispatched so far, oldest first
    pub fn calls(&self) -> Vec<RemoteCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    pub fn has_listener(&self) -> bool {
        self.state.lock().unwrap().listener.is_some()
    }

    /// The listener the bridge registered, if any
    pub fn listener(&self) -> Option<Arc<dyn SdkListener>> {
        self.state.lock().unwrap().listener.clone()
    }

    /// Play one event back through the registered listener
    ///
    /// Delivered synchronously on the caller's thread, outside the internal
    /// lock so listeners may call back into the service. Returns whether a
    /// listener was registered to receive it.
    pub fn emit(&self, event: ServiceEvent) -> bool {
        let listener = self.state.lock().unwrap().listener.clone();
        match listener {
            Some(listener) => {
                listener.on_event(event);
                true
            }
            None => {
                tracing::debug!(kind = event.kind(), "no listener registered; event dropped");
                false
            }
        }
    }

    /// Record the call unless its op is switched to fail
    fn dispatch(&self, call: RemoteCall) -> SynapseResult<()> {
        let mut state = self.state.lock().unwrap();
        if state.transport_failures.contains(&call.op()) {
            return Err(SynapseError::Transport {
                reason: format!("scripted failure for {:?}", call.op()),
            });
        }
        state.calls.push(call);
        Ok(())
    }
}

impl Default for ScriptedService {
    fn default() -> Self {
        Self::new()
    }
}

impl SdkService for ScriptedService {
    fn initialize_sdk(&self, api_key: &str) -> SynapseResult<ResponseCode> {
        self.dispatch(RemoteCall::InitializeSdk { api_key: api_key.to_string() })?;
        Ok(self.state.lock().unwrap().initialize_response)
    }

    fn shutdown_sdk(&self) -> SynapseResult<()> {
        self.dispatch(RemoteCall::ShutdownSdk)
    }

    fn get_user_login_status(&self) -> SynapseResult<LoginStatus> {
        self.dispatch(RemoteCall::GetUserLoginStatus)?;
        Ok(self.state.lock().unwrap().login_status)
    }

    fn check_user_calibration_status(&self) -> SynapseResult<CalibrationStatus> {
        self.dispatch(RemoteCall::CheckUserCalibrationStatus)?;
        Ok(self.state.lock().unwrap().calibration_status)
    }

    fn scan_for_devices(&self) -> SynapseResult<()> {
        self.dispatch(RemoteCall::ScanForDevices)
    }

    fn connect_sensor_device(&self, address: &str) -> SynapseResult<()> {
        self.dispatch(RemoteCall::ConnectSensorDevice { address: address.to_string() })
    }

    fn disconnect_sensor_device(&self) -> SynapseResult<()> {
        self.dispatch(RemoteCall::DisconnectSensorDevice)
    }

    fn start_prediction_session(&self, prediction: &str) -> SynapseResult<ResponseCode> {
        self.dispatch(RemoteCall::StartPredictionSession {
            prediction: prediction.to_string(),
        })?;
        Ok(self.state.lock().unwrap().start_response)
    }

    fn finish_session(&self) -> SynapseResult<ResponseCode> {
        self.dispatch(RemoteCall::FinishSession)?;
        Ok(self.state.lock().unwrap().finish_response)
    }

    fn write_user_marker(&self, marker: &str) -> SynapseResult<()> {
        self.dispatch(RemoteCall::WriteUserMarker { marker: marker.to_string() })
    }

    fn register_sdk_callback(&self, listener: Arc<dyn SdkListener>) -> SynapseResult<()> {
        self.dispatch(RemoteCall::RegisterSdkCallback)?;
        self.state.lock().unwrap().listener = Some(listener);
        Ok(())
    }

    fn unregister_sdk_callback(&self) -> SynapseResult<()> {
        self.dispatch(RemoteCall::UnregisterSdkCallback)?;
        self.state.lock().unwrap().listener = None;
        Ok(())
    }
}

struct DirectoryState {
    services: Vec<(ServiceEndpoint, Arc<ScriptedService>)>,
    deny_connect: bool,
    disconnect_hooks: Vec<DisconnectHook>,
}

/// Simulated host context with 0..N installed service providers
pub struct SimulatedDirectory {
    state: Mutex<DirectoryState>,
}

impl SimulatedDirectory {
    pub fn new() -> Self {
        SimulatedDirectory {
            state: Mutex::new(DirectoryState {
                services: Vec::new(),
                deny_connect: false,
                disconnect_hooks: Vec::new(),
            }),
        }
    }

    /// Install one provider of the SDK service interface
    pub fn install(&self, endpoint: ServiceEndpoint, service: Arc<ScriptedService>) {
        self.state.lock().unwrap().services.push((endpoint, service));
    }

    /// Refuse all connection requests, simulating a missing permission
    pub fn deny_connections(&self, deny: bool) {
        self.state.lock().unwrap().deny_connect = deny;
    }

    /// Kill every established connection, firing the disconnect hooks
    pub fn drop_connection(&self) {
        let hooks = std::mem::take(&mut self.state.lock().unwrap().disconnect_hooks);
        for hook in &hooks {
            hook();
        }
    }
}

impl Default for SimulatedDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceDirectory for SimulatedDirectory {
    fn resolve(&self, interface: &str) -> Vec<ServiceEndpoint> {
        if interface != SDK_SERVICE_INTERFACE {
            return Vec::new();
        }
        self.state
            .lock()
            .unwrap()
            .services
            .iter()
            .map(|(endpoint, _)| endpoint.clone())
            .collect()
    }

    fn connect(
        &self,
        endpoint: &ServiceEndpoint,
        on_disconnect: DisconnectHook,
    ) -> Result<Arc<dyn SdkService>, BindError> {
        let mut state = self.state.lock().unwrap();
        if state.deny_connect {
            return Err(BindError::PermissionDenied);
        }
        let service = state
            .services
            .iter()
            .find(|(candidate, _)| candidate == endpoint)
            .map(|(_, service)| service.clone())
            .ok_or(BindError::ServiceNotFound)?;
        state.disconnect_hooks.push(on_disconnect);
        Ok(service)
    }
}
