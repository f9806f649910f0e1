//! Prediction vocabulary and QA screen properties

use serde::{Deserialize, Serialize};

/// Names of predictions that can be passed to `start_prediction_session`
pub mod prediction {
    pub const ZONE: &str = "zone";
    pub const GAME: &str = "game_zone";
    pub const SLEEP: &str = "sleep";
}

/// Keys of the realtime value stream delivered via value-changed events
///
/// The key set is open: services may emit keys beyond these well-known ones,
/// so the stream is typed as strings rather than a closed enum.
pub mod value_key {
    pub const ZONE_STATE: &str = "zone_state";
    pub const FOCUS: &str = "focus";
    pub const ENJOYMENT: &str = "enjoyment";
    pub const AVG_MOTION: &str = "avg_motion";
    pub const HEART_RATE: &str = "heart_rate";
}

/// Signal quality a host can require before a QA screen returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QaQuality {
    Perfect,
    Good,
    Normal,
}

/// Properties supplied when launching a QA flow from a client
///
/// A `max_timeout` of [`QaProperties::INFINITE_TIMEOUT`] waits indefinitely
/// for the requested quality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaProperties {
    pub quality: QaQuality,
    pub max_timeout: f32,
}

impl QaProperties {
    pub const INFINITE_TIMEOUT: f32 = 0.0;

    pub const TASK_PROPERTIES: &'static str = "properties";
    pub const STAND_ALONE: &'static str = "standalone";
    pub const RUN_IN_DEBUG: &'static str = "debug";
    pub const APPLICATION_NAME: &'static str = "appname";
    pub const APPLICATION_CATEGORY: &'static str = "appcategory";

    pub fn new(quality: QaQuality) -> Self {
        QaProperties {
            quality,
            max_timeout: Self::INFINITE_TIMEOUT,
        }
    }

    pub fn with_timeout(quality: QaQuality, max_timeout: f32) -> Self {
        QaProperties { quality, max_timeout }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timeout_is_infinite() {
        let props = QaProperties::new(QaQuality::Good);
        assert_eq!(props.max_timeout, QaProperties::INFINITE_TIMEOUT);
    }

    #[test]
    fn test_prediction_names() {
        assert_eq!(prediction::ZONE, "zone");
        assert_eq!(prediction::GAME, "game_zone");
        assert_eq!(prediction::SLEEP, "sleep");
    }
}
