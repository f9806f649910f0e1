//! Basic usage of the shared bridge vocabulary
//!
//! Demonstrates the constant registry, the device map's replace semantics
//! and event dispatch through an `SdkListener`.

use std::collections::HashMap;
use std::sync::Arc;

use synapse_core::predictions::{prediction, value_key};
use synapse_core::{
    CalibrationStatus, ConnectionState, DeviceMap, ResponseCode, SdkListener, ServiceEvent,
};

fn main() {
    println!("=== Synapse Core Basic Usage ===\n");

    constants_example();
    device_map_example();
    event_dispatch_example();

    println!("=== Done ===");
}

/// Constant registry: wire values and names
fn constants_example() {
    println!("1. Constant registry");
    println!(
        "   Success is {}, NotInitialized is {}",
        ResponseCode::Success.code(),
        ResponseCode::NotInitialized.code()
    );
    println!(
        "   Calibration blocked sits at {}",
        CalibrationStatus::Blocked.code()
    );
    println!(
        "   Predictions: {}, {}, {}",
        prediction::ZONE,
        prediction::GAME,
        prediction::SLEEP
    );
    println!();
}

/// Device maps replace wholesale; earlier entries do not survive
fn device_map_example() {
    println!("2. Device map");
    let mut devices = DeviceMap::new();

    let mut first = HashMap::new();
    first.insert("headband-01".to_string(), "AA:BB:CC:DD:EE:01".to_string());
    first.insert("headband-02".to_string(), "AA:BB:CC:DD:EE:02".to_string());
    devices.replace_all(first);
    println!("   After first scan: {} devices", devices.len());

    let mut second = HashMap::new();
    second.insert("headband-03".to_string(), "AA:BB:CC:DD:EE:03".to_string());
    devices.replace_all(second);
    println!(
        "   After second scan: {} device, headband-01 present: {}",
        devices.len(),
        devices.contains("headband-01")
    );
    println!();
}

struct PrintingListener;

impl SdkListener for PrintingListener {
    fn on_connection_changed(&self, previous: ConnectionState, current: ConnectionState) {
        println!("   connection: {} -> {}", previous, current);
    }
    fn on_value_changed(&self, key: &str, value: f32) {
        println!("   value: {} = {:.2}", key, value);
    }
    fn on_qa_status(&self, passed: bool, failure_type: i32) {
        println!("   qa: passed={} type={}", passed, failure_type);
    }
    fn on_session_complete(&self) {
        println!("   session complete");
    }
    fn on_device_list(&self, devices: HashMap<String, String>) {
        println!("   device list: {} entries", devices.len());
    }
    fn on_signal_quality(&self, quality: &str) {
        println!("   signal quality: {}", quality);
    }
    fn on_error(&self, code: i32, message: &str) {
        println!("   error {}: {}", code, message);
    }
}

/// Whole events dispatch to the per-type listener methods
fn event_dispatch_example() {
    println!("3. Event dispatch");
    let listener: Arc<dyn SdkListener> = Arc::new(PrintingListener);

    listener.on_event(ServiceEvent::ConnectionChanged {
        previous: ConnectionState::Connecting,
        current: ConnectionState::Connected,
    });
    listener.on_event(ServiceEvent::ValueChanged {
        key: value_key::FOCUS.to_string(),
        value: 0.82,
    });
    listener.on_event(ServiceEvent::SessionComplete);
    println!();
}
