use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::LevelError;

/// Severity of an entry, and the minimum severity a logger emits.
///
/// Ordered from most to least verbose. `None` blocks everything when used as
/// the configured level and is never a valid level for an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    Debug,
    Info,
    Error,
    None,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Error => "ERROR",
            Level::None => "NONE",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = LevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DEBUG" => Ok(Level::Debug),
            "INFO" => Ok(Level::Info),
            "ERROR" => Ok(Level::Error),
            "NONE" => Ok(Level::None),
            other => Err(LevelError(other.to_string())),
        }
    }
}

/// A single log-entry as supplied by the caller.
///
/// Empty `event_action`, `service_action` and `service_name` are filled from
/// the logger's defaults before the entry is published.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entry {
    pub description: String,
    pub error_code: i64,
    pub event_action: String,
    pub service_action: String,
    pub service_name: String,
}

impl Entry {
    pub fn new(description: impl Into<String>) -> Self {
        Entry {
            description: description.into(),
            ..Default::default()
        }
    }

    pub fn with_error_code(mut self, code: i64) -> Self {
        self.error_code = code;
        self
    }

    pub fn with_event_action(mut self, action: impl Into<String>) -> Self {
        self.event_action = action.into();
        self
    }

    pub fn with_service_action(mut self, action: impl Into<String>) -> Self {
        self.service_action = action.into();
        self
    }

    pub fn with_service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = name.into();
        self
    }

    pub(crate) fn into_log_entry(self, level: Level) -> LogEntry {
        LogEntry {
            description: self.description,
            error_code: self.error_code,
            level,
            event_action: self.event_action,
            service_action: self.service_action,
            service_name: self.service_name,
        }
    }
}

/// The record published to the broker topic.
///
/// Serialized as a flat camelCase JSON object; empty strings and a zero
/// error code are omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub error_code: i64,
    pub level: Level,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub event_action: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub service_action: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub service_name: String,
}

fn is_zero(v: &i64) -> bool {
    *v == 0
}

impl LogEntry {
    /// Encode the entry into the bytes handed to the publisher.
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}
