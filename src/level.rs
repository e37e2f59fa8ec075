use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use crate::entry::Level;
use crate::env::LOG_LEVEL_ENV;
use crate::error::LevelError;

/// Where a logger reads its minimum level from.
///
/// The source is consulted on every logging call, so changes are picked up
/// without rebuilding the logger.
#[derive(Debug, Clone)]
pub enum LevelSource {
    /// Read the named environment variable.
    Env(String),
    /// Read a shared in-process switch.
    Switch(LevelSwitch),
}

impl Default for LevelSource {
    fn default() -> Self {
        LevelSource::Env(LOG_LEVEL_ENV.to_string())
    }
}

impl LevelSource {
    /// Current configured level, or the offending raw value if it is unusable.
    pub fn read(&self) -> Result<Level, LevelError> {
        match self {
            LevelSource::Env(key) => match std::env::var(key) {
                Ok(raw) => raw.parse(),
                Err(_) => Err(LevelError(String::new())),
            },
            LevelSource::Switch(switch) => Ok(switch.get()),
        }
    }
}

/// Atomically readable level shared between a logger and whoever
/// reconfigures it at runtime.
#[derive(Debug, Clone)]
pub struct LevelSwitch {
    inner: Arc<AtomicU8>,
}

impl LevelSwitch {
    pub fn new(level: Level) -> Self {
        LevelSwitch {
            inner: Arc::new(AtomicU8::new(encode(level))),
        }
    }

    pub fn get(&self) -> Level {
        decode(self.inner.load(Ordering::Relaxed))
    }

    pub fn set(&self, level: Level) {
        self.inner.store(encode(level), Ordering::Relaxed);
    }
}

impl From<LevelSwitch> for LevelSource {
    fn from(switch: LevelSwitch) -> Self {
        LevelSource::Switch(switch)
    }
}

fn encode(level: Level) -> u8 {
    match level {
        Level::Debug => 0,
        Level::Info => 1,
        Level::Error => 2,
        Level::None => 3,
    }
}

fn decode(raw: u8) -> Level {
    match raw {
        0 => Level::Debug,
        1 => Level::Info,
        2 => Level::Error,
        _ => Level::None,
    }
}
