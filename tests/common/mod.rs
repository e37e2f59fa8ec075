#![allow(dead_code)]

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use kafka_log_sink::{Level, LevelSwitch, Logger, LoggerConfig};
use kafka_log_sink::memory::MemoryPublisher;

/// Output stream that can be read back after the logger wrote to it.
#[derive(Clone, Default)]
pub struct SharedOutput(Arc<Mutex<Vec<u8>>>);

impl SharedOutput {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for SharedOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub struct Harness {
    pub logger: Logger,
    pub publisher: MemoryPublisher,
    pub level: LevelSwitch,
    pub output: SharedOutput,
}

pub fn harness(level: Level) -> Harness {
    harness_with(LoggerConfig::new("testsvc", "log.sink"), level)
}

pub fn harness_with(config: LoggerConfig, level: Level) -> Harness {
    let publisher = MemoryPublisher::new();
    let switch = LevelSwitch::new(level);
    let logger = Logger::new(config.with_level(switch.clone()), publisher.clone())
        .expect("build logger");
    let output = SharedOutput::default();
    logger.set_output(output.clone());

    Harness {
        logger,
        publisher,
        level: switch,
        output,
    }
}
