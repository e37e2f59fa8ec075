use std::time::Duration;

use kafka_log_sink::init::init_diagnostics;
use kafka_log_sink::memory::MemoryPublisher;
use kafka_log_sink::{Entry, Level, LevelSwitch, Logger, LoggerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_diagnostics(tracing::Level::INFO);

    // 1) Publish into memory and switch levels at runtime instead of
    //    through the LOG_LEVEL variable.
    let publisher = MemoryPublisher::new();
    let level = LevelSwitch::new(Level::Info);
    let config = LoggerConfig::new("inventory", "log.sink").with_level(level.clone());
    let logger = Logger::new(config, publisher.clone())?;

    // 2) DEBUG is filtered at INFO, the other two are published.
    logger.debug(Entry::new("not shown"), Vec::new()).await;
    logger.info(Entry::new("service started")).await;
    logger
        .error(Entry::new("order failed").with_error_code(3).with_event_action("checkout"))
        .await;

    level.set(Level::Error);
    logger.info(Entry::new("filtered once the level is raised")).await;

    publisher.wait_for(2, Duration::from_secs(1)).await;
    for entry in publisher.entries() {
        println!("[published] {}", serde_json::to_string(&entry)?);
    }

    logger.shutdown().await;
    Ok(())
}
