//! Environment variable names used by this crate for convenient
//! configuration of loggers from microservices.
//!
//! The level variable is read on every logging call; the others are only
//! consulted by [`LoggerConfig::from_env`](crate::config::LoggerConfig::from_env).

/// Minimum emitted level: `DEBUG`, `INFO`, `ERROR` or `NONE`.
pub const LOG_LEVEL_ENV: &str = "LOG_LEVEL";

/// Comma-separated Kafka broker list, e.g. `127.0.0.1:9092,127.0.0.1:9093`.
pub const KAFKA_BROKERS_ENV: &str = "KAFKA_BROKERS";

/// Topic the log-entries are published to.
pub const KAFKA_LOG_PRODUCER_TOPIC_ENV: &str = "KAFKA_LOG_PRODUCER_TOPIC";

/// Default service name for entries that don't carry one.
pub const LOG_SINK_SERVICE_NAME_ENV: &str = "LOG_SINK_SERVICE_NAME";

/// Maximum number of array elements rendered in DEBUG payloads; `0` disables truncation.
pub const LOG_SINK_ARRAY_THRESHOLD_ENV: &str = "LOG_SINK_ARRAY_THRESHOLD";

/// Set to `true` to stop mirroring descriptions to stdout.
pub const LOG_SINK_DISABLE_OUTPUT_ENV: &str = "LOG_SINK_DISABLE_OUTPUT";

/// Read an environment variable or fall back to a provided default.
pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
