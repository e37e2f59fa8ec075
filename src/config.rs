use crate::env::{
    env_or, KAFKA_LOG_PRODUCER_TOPIC_ENV, LOG_SINK_ARRAY_THRESHOLD_ENV,
    LOG_SINK_DISABLE_OUTPUT_ENV, LOG_SINK_SERVICE_NAME_ENV,
};
use crate::level::LevelSource;

/// Default number of array elements rendered in DEBUG payloads.
pub const DEFAULT_ARRAY_THRESHOLD: usize = 15;

/// Default number of entries queued before logging calls start waiting.
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// Logger configuration.
///
/// **Fields**
/// - `service_name`: used for entries without a service name; required.
/// - `topic`: broker topic entries are published to; required.
/// - `event_action`, `service_action`: used for entries that leave these empty.
/// - `array_threshold`: maximum rendered elements per array in DEBUG
///   payloads; `0` disables truncation.
/// - `queue_capacity`: size of the dispatcher queue.
/// - `enable_output`: mirror descriptions to the output stream (stdout).
/// - `level`: where the minimum level is read from on every call.
#[derive(Clone, Debug)]
pub struct LoggerConfig {
    pub service_name: String,
    pub topic: String,
    pub event_action: String,
    pub service_action: String,
    pub array_threshold: usize,
    pub queue_capacity: usize,
    pub enable_output: bool,
    pub level: LevelSource,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            service_name: String::new(),
            topic: String::new(),
            event_action: String::new(),
            service_action: String::new(),
            array_threshold: DEFAULT_ARRAY_THRESHOLD,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            enable_output: true,
            level: LevelSource::default(),
        }
    }
}

impl LoggerConfig {
    pub fn new(service_name: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            topic: topic.into(),
            ..Default::default()
        }
    }

    pub fn with_level(mut self, level: impl Into<LevelSource>) -> Self {
        self.level = level.into();
        self
    }

    /// Build a configuration from the `LOG_SINK_*` and Kafka topic
    /// environment variables, keeping defaults for anything unset.
    ///
    /// An unparsable or negative array threshold disables truncation.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let threshold = env_or(
            LOG_SINK_ARRAY_THRESHOLD_ENV,
            &defaults.array_threshold.to_string(),
        );
        let disable_output = env_or(LOG_SINK_DISABLE_OUTPUT_ENV, "false");

        Self {
            service_name: env_or(LOG_SINK_SERVICE_NAME_ENV, ""),
            topic: env_or(KAFKA_LOG_PRODUCER_TOPIC_ENV, ""),
            array_threshold: threshold.trim().parse().unwrap_or(0),
            enable_output: !disable_output.trim().eq_ignore_ascii_case("true"),
            ..defaults
        }
    }
}
