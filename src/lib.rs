//! Leveled log-entries for services that collect their logs through a
//! message broker.
//!
//! A [`Logger`] filters entries against a level read on every call, renders
//! attached DEBUG payloads into the description, mirrors the description to
//! stdout and publishes the entry as JSON to a broker topic from a
//! background task.

pub mod backend;
pub mod config;
pub mod dispatcher;
pub mod entry;
pub mod env;
pub mod error;
pub mod filter;
pub mod format;
pub mod init;
pub mod level;
pub mod logger;
pub mod memory;
pub mod model;
pub mod payload;
pub mod publisher;
pub mod render;

#[cfg(feature = "kafka")]
pub mod kafka;

pub use config::LoggerConfig;
pub use entry::{Entry, Level, LogEntry};
pub use error::{Error, Result};
pub use level::{LevelSource, LevelSwitch};
pub use logger::{FatalExit, Logger};
pub use payload::Payload;
pub use publisher::Publisher;
