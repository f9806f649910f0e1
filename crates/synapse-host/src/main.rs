//! Synapse Host - demo session against a simulated biosignal service
//!
//! Wires the full path end to end: discovery, bind, device scan and
//! connection, a streamed prediction session, marker write and teardown.

mod host_callback;

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Context;
use synapse_bridge::ServiceBridge;
use synapse_core::predictions::prediction;
use synapse_core::{ConnectionState, ServiceEndpoint, ServiceEvent};
use synapse_simulation::{
    start_session_simulator, ScriptedService, SimulatedDirectory, SimulationConfig,
};
use tokio::sync::mpsc;
use tokio::time::{timeout, Duration};

use host_callback::{HostCallback, HostEvent, LatchBindCallback};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    println!("Starting Synapse host demo...");
    println!("Flow: bind -> scan -> connect -> prediction session -> teardown");

    // Simulated service installation, standing in for the real out-of-process
    // provider.
    let service = Arc::new(ScriptedService::new());
    service.set_login_status(synapse_core::LoginStatus::LoggedIn);

    let directory = SimulatedDirectory::new();
    directory.install(
        ServiceEndpoint::new("io.synapse.demo", "DemoBiosignalService"),
        service.clone(),
    );

    // Bridge setup: host callback first, then bind.
    let bridge = ServiceBridge::new();
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    bridge.set_sdk_callback(Arc::new(HostCallback::new(event_tx)));

    let latch = LatchBindCallback::default();
    bridge.bind(&directory, &latch);
    match latch.outcome() {
        Some(Ok(())) => tracing::info!("bound to service"),
        Some(Err(error)) => anyhow::bail!("bind failed: {}", error),
        None => anyhow::bail!("bind reported no outcome"),
    }

    let response = bridge.initialize("demo-api-key")?;
    anyhow::ensure!(response.is_success(), "initialize failed: {}", response);

    let login = bridge.is_logged_in()?;
    let calibration = bridge.calibration_status()?;
    tracing::info!(?login, ?calibration, "session preconditions");

    // Scan; the simulated service answers with one headband.
    bridge.scan_for_devices()?;
    let mut devices = HashMap::new();
    devices.insert("headband-01".to_string(), "AA:BB:CC:DD:EE:01".to_string());
    service.emit(ServiceEvent::DeviceList(devices));

    let device_id = match timeout(Duration::from_secs(5), event_rx.recv()).await {
        Ok(Some(HostEvent::ScanResult(id))) => id,
        other => anyhow::bail!("expected a scan result, got {:?}", other),
    };

    bridge.connect_to_device(&device_id)?;
    service.emit(ServiceEvent::ConnectionChanged {
        previous: ConnectionState::Connecting,
        current: ConnectionState::Connected,
    });

    // Prediction session with simulated value streaming.
    let response = bridge.start_prediction(prediction::ZONE)?;
    anyhow::ensure!(response.is_success(), "start prediction failed: {}", response);

    let listener = service
        .listener()
        .context("bridge did not register an event receiver")?;
    let config = SimulationConfig {
        update_rate: 10.0,
        session_duration: 2.0,
        qa_interval: 0.5,
        ..Default::default()
    };
    let (session, _control) = start_session_simulator(config, listener, prediction::ZONE)?;
    tracing::info!(session = %session.id, "prediction session running");

    let mut value_count: u64 = 0;
    loop {
        let event = timeout(Duration::from_secs(10), event_rx.recv())
            .await
            .context("timed out waiting for session events")?;
        match event {
            Some(HostEvent::Value(_, _)) => value_count += 1,
            Some(HostEvent::SessionComplete) => break,
            Some(_) => {}
            None => anyhow::bail!("event channel closed mid-session"),
        }
    }
    tracing::info!(value_count, "session streamed to completion");

    let marker = format!(
        "session {} complete at {}",
        session.id,
        chrono::Utc::now().to_rfc3339()
    );
    bridge.write_marker(&marker)?;

    let response = bridge.end_prediction()?;
    anyhow::ensure!(response.is_success(), "end prediction failed: {}", response);

    bridge.shutdown()?;
    bridge.unbind();

    println!("Demo complete: {} value updates received", value_count);
    Ok(())
}
