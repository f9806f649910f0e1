//! Prediction session identity

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of one prediction session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionInfo {
    /// Unique identifier for this session
    pub id: Uuid,
    /// Prediction name the session was started with
    pub prediction: String,
    /// Start timestamp, unix milliseconds
    pub started_at_ms: u64,
}

impl SessionInfo {
    pub fn new(prediction: impl Into<String>) -> Self {
        SessionInfo {
            id: Uuid::new_v4(),
            prediction: prediction.into(),
            started_at_ms: current_time_ms(),
        }
    }
}

/// Current unix time in milliseconds
pub fn current_time_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_millis() as u64
}
