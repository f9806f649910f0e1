//! Service bridge: binder lifecycle, call forwarding and event fan-out

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, Weak};

use synapse_core::{
    BindCallback, BindError, CalibrationStatus, ConnectionState, DeviceMap, DisconnectHook,
    LoginStatus, ResponseCode, SdkCallback, SdkListener, SdkService, ServiceDirectory,
    SuccessOrFailureCallback, SynapseError, SynapseResult, SDK_SERVICE_INTERFACE,
};

/// Bridge between a host application and one remote biosignal service
///
/// Created once per host session. The proxy handle is acquired on a
/// successful [`bind`](ServiceBridge::bind) and cleared on
/// [`unbind`](ServiceBridge::unbind) or spontaneous disconnect; every
/// forwarding call made while the handle is absent fails with
/// [`SynapseError::NotBound`] without touching the remote side.
pub struct ServiceBridge {
    inner: Arc<BridgeInner>,
}

/// Shared state reachable from both the forwarding path and the event path
struct BridgeInner {
    service: Mutex<Option<Arc<dyn SdkService>>>,
    devices: Mutex<DeviceMap>,
    callback: Mutex<Option<Arc<dyn SdkCallback>>>,
}

impl ServiceBridge {
    pub fn new() -> Self {
        ServiceBridge {
            inner: Arc::new(BridgeInner {
                service: Mutex::new(None),
                devices: Mutex::new(DeviceMap::new()),
                callback: Mutex::new(None),
            }),
        }
    }

    /// Register the single host callback that receives fanned-out events
    ///
    /// Events arriving while no callback is registered are dropped, not
    /// queued.
    pub fn set_sdk_callback(&self, callback: Arc<dyn SdkCallback>) {
        *self.inner.callback.lock().unwrap() = Some(callback);
    }

    pub fn clear_sdk_callback(&self) {
        *self.inner.callback.lock().unwrap() = None;
    }

    pub fn is_bound(&self) -> bool {
        self.inner.service.lock().unwrap().is_some()
    }

    /// Device ids from the most recently received device list
    pub fn device_ids(&self) -> Vec<String> {
        self.inner
            .devices
            .lock()
            .unwrap()
            .ids()
            .map(str::to_string)
            .collect()
    }

    /// Discover and connect to the service, reporting the outcome
    ///
    /// Exactly one installed provider must implement the service interface:
    /// zero matches fail with `ServiceNotFound`, several with
    /// `MultipleServicesFound`. On success the bridge registers itself as
    /// the remote event receiver before `on_success` fires. A panic from the
    /// directory is caught and logged; nothing propagates to the host.
    pub fn bind(&self, directory: &dyn ServiceDirectory, bind_callback: &dyn BindCallback) {
        let outcome = catch_unwind(AssertUnwindSafe(|| self.try_bind(directory)));
        match outcome {
            Ok(Ok(())) => bind_callback.on_success(),
            Ok(Err(error)) => {
                tracing::debug!(%error, "bind failed");
                bind_callback.on_failure(error);
            }
            Err(_) => {
                tracing::error!("service resolution panicked; bind aborted");
            }
        }
    }

    fn try_bind(&self, directory: &dyn ServiceDirectory) -> Result<(), BindError> {
        let matches = directory.resolve(SDK_SERVICE_INTERFACE);
        if matches.is_empty() {
            tracing::debug!("cannot find a matching service");
            return Err(BindError::ServiceNotFound);
        }
        if matches.len() > 1 {
            // Never expected outside a misconfigured installation.
            tracing::debug!(count = matches.len(), "found multiple matching services");
            return Err(BindError::MultipleServicesFound);
        }

        let endpoint = &matches[0];
        let weak: Weak<BridgeInner> = Arc::downgrade(&self.inner);
        let hook: DisconnectHook = Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                *inner.service.lock().unwrap() = None;
                tracing::debug!("service disconnected");
            }
        });

        let service = directory.connect(endpoint, hook)?;

        let listener: Arc<dyn SdkListener> = self.inner.clone();
        if let Err(error) = service.register_sdk_callback(listener) {
            tracing::error!(%error, "registering event receiver failed");
            return Err(BindError::UnknownError);
        }

        *self.inner.service.lock().unwrap() = Some(service);
        tracing::debug!(package = %endpoint.package, "bound to service");
        Ok(())
    }

    /// Drop the service connection
    ///
    /// The event receiver is unregistered best-effort first; a transport
    /// failure during teardown never blocks local cleanup.
    pub fn unbind(&self) {
        let service = self.inner.service.lock().unwrap().take();
        if let Some(service) = service {
            if let Err(error) = service.unregister_sdk_callback() {
                tracing::warn!(%error, "unregister during unbind failed");
            }
            tracing::debug!("unbound from service");
        }
    }

    /// Current proxy handle, or `NotBound`
    fn service(&self) -> SynapseResult<Arc<dyn SdkService>> {
        self.inner
            .service
            .lock()
            .unwrap()
            .clone()
            .ok_or(SynapseError::NotBound)
    }

    pub fn initialize(&self, api_key: &str) -> SynapseResult<ResponseCode> {
        let service = self.service()?;
        tracing::debug!("initialize");
        service.initialize_sdk(api_key)
    }

    pub fn shutdown(&self) -> SynapseResult<()> {
        let service = self.service()?;
        tracing::debug!("shutdown");
        service.shutdown_sdk()
    }

    pub fn is_logged_in(&self) -> SynapseResult<LoginStatus> {
        let service = self.service()?;
        let status = service.get_user_login_status()?;
        tracing::debug!(?status, "login status");
        Ok(status)
    }

    pub fn calibration_status(&self) -> SynapseResult<CalibrationStatus> {
        let service = self.service()?;
        service.check_user_calibration_status()
    }

    pub fn scan_for_devices(&self) -> SynapseResult<()> {
        let service = self.service()?;
        tracing::debug!("starting device scan");
        service.scan_for_devices()
    }

    /// Connect to a device by the id announced in the last device list
    ///
    /// The mapped transport address, not the id, is forwarded to the
    /// service. An unknown id performs no remote call.
    pub fn connect_to_device(&self, device_id: &str) -> SynapseResult<()> {
        let service = self.service()?;
        let address = {
            let devices = self.inner.devices.lock().unwrap();
            devices.address_for(device_id).map(str::to_string)
        };
        match address {
            Some(address) => {
                tracing::debug!(device_id, %address, "connecting to device");
                service.connect_sensor_device(&address)
            }
            None => {
                tracing::debug!(device_id, "device not found");
                Err(SynapseError::DeviceNotFound {
                    device_id: device_id.to_string(),
                })
            }
        }
    }

    pub fn disconnect_device(&self) -> SynapseResult<()> {
        let service = self.service()?;
        service.disconnect_sensor_device()
    }

    pub fn start_prediction(&self, prediction: &str) -> SynapseResult<ResponseCode> {
        let service = self.service()?;
        tracing::debug!(prediction, "starting prediction session");
        service.start_prediction_session(prediction)
    }

    pub fn end_prediction(&self) -> SynapseResult<ResponseCode> {
        let service = self.service()?;
        tracing::debug!("ending prediction session");
        service.finish_session()
    }

    pub fn write_marker(&self, marker: &str) -> SynapseResult<()> {
        let service = self.service()?;
        tracing::debug!(marker, "writing user marker");
        service.write_user_marker(marker)
    }

    /// Probe the login state and report it through the one-shot callback
    pub fn launch_login(&self, callback: &dyn SuccessOrFailureCallback) {
        match self.service() {
            Err(_) => callback.on_failure(ResponseCode::NotInitialized),
            Ok(service) => match service.get_user_login_status() {
                Ok(LoginStatus::LoggedIn) => callback.on_success(),
                Ok(LoginStatus::NotLoggedIn) => {
                    callback.on_failure(ResponseCode::UserNotLoggedIn)
                }
                Err(error) => {
                    tracing::warn!(%error, "login status query failed");
                    callback.on_failure(ResponseCode::UnknownError);
                }
            },
        }
    }
}

impl Default for ServiceBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl BridgeInner {
    fn callback(&self) -> Option<Arc<dyn SdkCallback>> {
        self.callback.lock().unwrap().clone()
    }
}

impl SdkListener for BridgeInner {
    fn on_connection_changed(&self, previous: ConnectionState, current: ConnectionState) {
        tracing::debug!(%previous, %current, "connection changed");
        if let Some(callback) = self.callback() {
            callback.connection_status(previous, current);
        }
    }

    fn on_value_changed(&self, key: &str, value: f32) {
        if let Some(callback) = self.callback() {
            callback.value_changed(key, value);
        }
    }

    fn on_qa_status(&self, passed: bool, failure_type: i32) {
        tracing::debug!(passed, failure_type, "qa status");
        if let Some(callback) = self.callback() {
            callback.qa_status(passed, failure_type);
        }
    }

    fn on_session_complete(&self) {
        tracing::debug!("session complete");
        if let Some(callback) = self.callback() {
            callback.session_complete();
        }
    }

    fn on_device_list(&self, devices: HashMap<String, String>) {
        tracing::debug!(count = devices.len(), "device list received");
        // The map is replaced wholesale before any fan-out, so a concurrent
        // connect_to_device only ever sees the latest mapping.
        let ids: Vec<String> = devices.keys().cloned().collect();
        self.devices.lock().unwrap().replace_all(devices);
        if let Some(callback) = self.callback() {
            for id in &ids {
                callback.scan_result(id);
            }
        }
    }

    fn on_signal_quality(&self, quality: &str) {
        if let Some(callback) = self.callback() {
            callback.signal_quality(quality);
        }
    }

    fn on_error(&self, code: i32, message: &str) {
        // Logged only; error reports are not relayed to the host callback.
        tracing::warn!(code, message, "service error");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;
    use synapse_core::{ServiceEndpoint, ServiceEvent};
    use synapse_simulation::{RemoteCall, RemoteOp, ScriptedService, SimulatedDirectory};

    /// Records every fanned-out callback for assertions
    #[derive(Default)]
    struct RecordingCallback {
        records: StdMutex<Vec<Record>>,
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Record {
        ScanResult(String),
        Connection(ConnectionState, ConnectionState),
        Value(String, f32),
        Qa(bool, i32),
        SessionComplete,
        SignalQuality(String),
    }

    impl RecordingCallback {
        fn records(&self) -> Vec<Record> {
            self.records.lock().unwrap().clone()
        }
    }

    impl SdkCallback for RecordingCallback {
        fn scan_result(&self, device_id: &str) {
            self.records
                .lock()
                .unwrap()
                .push(Record::ScanResult(device_id.to_string()));
        }
        fn connection_status(&self, previous: ConnectionState, current: ConnectionState) {
            self.records
                .lock()
                .unwrap()
                .push(Record::Connection(previous, current));
        }
        fn value_changed(&self, key: &str, value: f32) {
            self.records
                .lock()
                .unwrap()
                .push(Record::Value(key.to_string(), value));
        }
        fn qa_status(&self, passed: bool, failure_type: i32) {
            self.records.lock().unwrap().push(Record::Qa(passed, failure_type));
        }
        fn session_complete(&self) {
            self.records.lock().unwrap().push(Record::SessionComplete);
        }
        fn signal_quality(&self, quality: &str) {
            self.records
                .lock()
                .unwrap()
                .push(Record::SignalQuality(quality.to_string()));
        }
    }

    /// Captures the bind outcome
    #[derive(Default)]
    struct LatchBindCallback {
        outcome: StdMutex<Option<Result<(), BindError>>>,
    }

    impl LatchBindCallback {
        fn outcome(&self) -> Option<Result<(), BindError>> {
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

    #[derive(Default)]
    struct LatchLoginCallback {
        outcome: StdMutex<Option<Result<(), ResponseCode>>>,
    }

    impl LatchLoginCallback {
        fn outcome(&self) -> Option<Result<(), ResponseCode>> {
            self.outcome.lock().unwrap().clone()
        }
    }

    impl SuccessOrFailureCallback for LatchLoginCallback {
        fn on_success(&self) {
            *self.outcome.lock().unwrap() = Some(Ok(()));
        }
        fn on_failure(&self, response: ResponseCode) {
            *self.outcome.lock().unwrap() = Some(Err(response));
        }
    }

    fn device_list(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(id, addr)| (id.to_string(), addr.to_string()))
            .collect()
    }

    /// Directory, one installed service and a bound bridge
    fn bound_bridge() -> (ServiceBridge, SimulatedDirectory, Arc<ScriptedService>) {
        let service = Arc::new(ScriptedService::new());
        let directory = SimulatedDirectory::new();
        directory.install(
            ServiceEndpoint::new("io.synapse.demo", "DemoService"),
            service.clone(),
        );
        let bridge = ServiceBridge::new();
        let latch = LatchBindCallback::default();
        bridge.bind(&directory, &latch);
        assert_eq!(latch.outcome(), Some(Ok(())));
        (bridge, directory, service)
    }

    #[test]
    fn test_bind_zero_services_reports_not_found() {
        let directory = SimulatedDirectory::new();
        let bridge = ServiceBridge::new();
        let latch = LatchBindCallback::default();
        bridge.bind(&directory, &latch);
        assert_eq!(latch.outcome(), Some(Err(BindError::ServiceNotFound)));
        assert!(!bridge.is_bound());
    }

    #[test]
    fn test_bind_two_services_reports_multiple() {
        let directory = SimulatedDirectory::new();
        directory.install(
            ServiceEndpoint::new("io.synapse.one", "Service"),
            Arc::new(ScriptedService::new()),
        );
        directory.install(
            ServiceEndpoint::new("io.synapse.two", "Service"),
            Arc::new(ScriptedService::new()),
        );
        let bridge = ServiceBridge::new();
        let latch = LatchBindCallback::default();
        bridge.bind(&directory, &latch);
        assert_eq!(latch.outcome(), Some(Err(BindError::MultipleServicesFound)));
        assert!(!bridge.is_bound());
    }

    #[test]
    fn test_bind_permission_denied() {
        let directory = SimulatedDirectory::new();
        directory.install(
            ServiceEndpoint::new("io.synapse.demo", "DemoService"),
            Arc::new(ScriptedService::new()),
        );
        directory.deny_connections(true);
        let bridge = ServiceBridge::new();
        let latch = LatchBindCallback::default();
        bridge.bind(&directory, &latch);
        assert_eq!(latch.outcome(), Some(Err(BindError::PermissionDenied)));
        assert!(!bridge.is_bound());
    }

    #[test]
    fn test_bind_registers_event_receiver() {
        let (bridge, _directory, service) = bound_bridge();
        assert!(bridge.is_bound());
        assert!(service.has_listener());
        assert_eq!(service.calls(), vec![RemoteCall::RegisterSdkCallback]);
    }

    #[test]
    fn test_panicking_directory_is_caught() {
        struct PanickyDirectory;
        impl ServiceDirectory for PanickyDirectory {
            fn resolve(&self, _interface: &str) -> Vec<ServiceEndpoint> {
                panic!("package manager exploded")
            }
            fn connect(
                &self,
                _endpoint: &ServiceEndpoint,
                _on_disconnect: DisconnectHook,
            ) -> Result<Arc<dyn SdkService>, BindError> {
                unreachable!()
            }
        }

        let bridge = ServiceBridge::new();
        let latch = LatchBindCallback::default();
        bridge.bind(&PanickyDirectory, &latch);
        // Caught and logged; no outcome is reported and the host survives.
        assert_eq!(latch.outcome(), None);
        assert!(!bridge.is_bound());
    }

    #[test]
    fn test_calls_fail_fast_when_unbound() {
        let bridge = ServiceBridge::new();
        assert_eq!(bridge.initialize("key"), Err(SynapseError::NotBound));
        assert_eq!(bridge.shutdown(), Err(SynapseError::NotBound));
        assert_eq!(bridge.is_logged_in(), Err(SynapseError::NotBound));
        assert_eq!(bridge.calibration_status(), Err(SynapseError::NotBound));
        assert_eq!(bridge.scan_for_devices(), Err(SynapseError::NotBound));
        assert_eq!(bridge.connect_to_device("dev-1"), Err(SynapseError::NotBound));
        assert_eq!(bridge.disconnect_device(), Err(SynapseError::NotBound));
        assert_eq!(bridge.start_prediction("zone"), Err(SynapseError::NotBound));
        assert_eq!(bridge.end_prediction(), Err(SynapseError::NotBound));
        assert_eq!(bridge.write_marker("m"), Err(SynapseError::NotBound));
    }

    #[test]
    fn test_forwarding_passes_application_codes_through() {
        let (bridge, _directory, service) = bound_bridge();
        service.set_initialize_response(ResponseCode::ApiKeyError);
        assert_eq!(bridge.initialize("bad-key"), Ok(ResponseCode::ApiKeyError));
        service.set_start_response(ResponseCode::ModelsNotAvailable);
        assert_eq!(
            bridge.start_prediction("zone"),
            Ok(ResponseCode::ModelsNotAvailable)
        );
    }

    #[test]
    fn test_transport_failure_is_distinct_from_application_error() {
        let (bridge, _directory, service) = bound_bridge();
        service.fail_transport(RemoteOp::StartPredictionSession);
        let result = bridge.start_prediction("zone");
        match result {
            Err(SynapseError::Transport { .. }) => {}
            other => panic!("expected transport failure, got {:?}", other),
        }
    }

    #[test]
    fn test_device_list_fan_out_and_connect_by_id() {
        let (bridge, _directory, service) = bound_bridge();
        let callback = Arc::new(RecordingCallback::default());
        bridge.set_sdk_callback(callback.clone());

        service.emit(ServiceEvent::DeviceList(device_list(&[("dev-1", "AA:BB")])));

        let scans: Vec<Record> = callback
            .records()
            .into_iter()
            .filter(|r| matches!(r, Record::ScanResult(_)))
            .collect();
        assert_eq!(scans, vec![Record::ScanResult("dev-1".to_string())]);

        service.clear_calls();
        bridge.connect_to_device("dev-1").unwrap();
        assert_eq!(
            service.calls(),
            vec![RemoteCall::ConnectSensorDevice { address: "AA:BB".to_string() }]
        );
    }

    #[test]
    fn test_connect_unknown_device_performs_no_remote_call() {
        let (bridge, _directory, service) = bound_bridge();
        service.clear_calls();
        let result = bridge.connect_to_device("unknown");
        assert_eq!(
            result,
            Err(SynapseError::DeviceNotFound { device_id: "unknown".to_string() })
        );
        assert!(service.calls().is_empty());
    }

    #[test]
    fn test_device_map_is_replaced_wholesale() {
        let (bridge, _directory, service) = bound_bridge();
        service.emit(ServiceEvent::DeviceList(device_list(&[
            ("dev-1", "AA:BB"),
            ("dev-2", "CC:DD"),
        ])));
        service.emit(ServiceEvent::DeviceList(device_list(&[("dev-3", "EE:FF")])));

        let mut ids = bridge.device_ids();
        ids.sort();
        assert_eq!(ids, vec!["dev-3".to_string()]);

        service.clear_calls();
        assert!(matches!(
            bridge.connect_to_device("dev-1"),
            Err(SynapseError::DeviceNotFound { .. })
        ));
        assert!(service.calls().is_empty());
    }

    #[test]
    fn test_events_without_callback_are_dropped_not_queued() {
        let (bridge, _directory, service) = bound_bridge();

        // No callback registered yet: events vanish without error.
        service.emit(ServiceEvent::ValueChanged { key: "focus".to_string(), value: 0.5 });
        service.emit(ServiceEvent::SessionComplete);

        let callback = Arc::new(RecordingCallback::default());
        bridge.set_sdk_callback(callback.clone());
        assert!(callback.records().is_empty());

        // But the device map still updates behind the scenes.
        bridge.clear_sdk_callback();
        service.emit(ServiceEvent::DeviceList(device_list(&[("dev-1", "AA:BB")])));
        assert_eq!(bridge.device_ids(), vec!["dev-1".to_string()]);
    }

    #[test]
    fn test_relayed_events_arrive_unchanged() {
        let (bridge, _directory, service) = bound_bridge();
        let callback = Arc::new(RecordingCallback::default());
        bridge.set_sdk_callback(callback.clone());

        service.emit(ServiceEvent::ConnectionChanged {
            previous: ConnectionState::Connecting,
            current: ConnectionState::Connected,
        });
        service.emit(ServiceEvent::ValueChanged { key: "focus".to_string(), value: 0.82 });
        service.emit(ServiceEvent::QaStatus { passed: false, failure_type: 2 });
        service.emit(ServiceEvent::SignalQuality("good".to_string()));
        service.emit(ServiceEvent::SessionComplete);

        assert_eq!(
            callback.records(),
            vec![
                Record::Connection(ConnectionState::Connecting, ConnectionState::Connected),
                Record::Value("focus".to_string(), 0.82),
                Record::Qa(false, 2),
                Record::SignalQuality("good".to_string()),
                Record::SessionComplete,
            ]
        );
    }

    #[test]
    fn test_error_event_is_logged_not_relayed() {
        let (bridge, _directory, service) = bound_bridge();
        let callback = Arc::new(RecordingCallback::default());
        bridge.set_sdk_callback(callback.clone());

        service.emit(ServiceEvent::Error {
            code: -10,
            message: "server unreachable".to_string(),
        });
        assert!(callback.records().is_empty());
    }

    #[test]
    fn test_unbind_unregisters_best_effort() {
        let (bridge, _directory, service) = bound_bridge();
        service.fail_transport(RemoteOp::UnregisterSdkCallback);
        bridge.unbind();
        // Teardown transport failure never blocks local cleanup.
        assert!(!bridge.is_bound());
        assert_eq!(bridge.initialize("key"), Err(SynapseError::NotBound));
    }

    #[test]
    fn test_spontaneous_disconnect_clears_handle() {
        let (bridge, directory, service) = bound_bridge();
        service.clear_calls();
        directory.drop_connection();

        // Not reported proactively; the next forwarding call surfaces it.
        assert_eq!(bridge.scan_for_devices(), Err(SynapseError::NotBound));
        assert!(service.calls().is_empty());
    }

    #[test]
    fn test_launch_login_reports_status() {
        let (bridge, _directory, service) = bound_bridge();

        service.set_login_status(LoginStatus::LoggedIn);
        let latch = LatchLoginCallback::default();
        bridge.launch_login(&latch);
        assert_eq!(latch.outcome(), Some(Ok(())));

        service.set_login_status(LoginStatus::NotLoggedIn);
        let latch = LatchLoginCallback::default();
        bridge.launch_login(&latch);
        assert_eq!(latch.outcome(), Some(Err(ResponseCode::UserNotLoggedIn)));

        let unbound = ServiceBridge::new();
        let latch = LatchLoginCallback::default();
        unbound.launch_login(&latch);
        assert_eq!(latch.outcome(), Some(Err(ResponseCode::NotInitialized)));
    }
}
