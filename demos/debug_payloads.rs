use std::time::Duration;

use kafka_log_sink::memory::MemoryPublisher;
use kafka_log_sink::model::{Document, Event};
use kafka_log_sink::{Entry, Level, LevelSwitch, Logger, LoggerConfig, Payload};
use serde_json::json;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let publisher = MemoryPublisher::new();
    let config =
        LoggerConfig::new("inventory", "log.sink").with_level(LevelSwitch::new(Level::Debug));
    let logger = Logger::new(config, publisher.clone())?;

    let result = Document {
        source: "warehouse".into(),
        data: serde_json::to_vec(&json!([{ "sku": "A-1", "qty": 4 }]))?,
        ..Default::default()
    };
    let event = Event {
        action: "restock".into(),
        data: serde_json::to_vec(&result)?,
        ..Default::default()
    };
    let readings: Vec<u32> = (0..20).collect();

    // The description is printed to stdout with every payload expanded;
    // the Event's data unfolds into the Document, whose data unfolds into
    // the item list. Only the first 15 readings are rendered.
    logger
        .debug(
            Entry::new("restock received"),
            vec![
                event.into(),
                readings.into(),
                Payload::record(&json!({ "batch": 7 })),
            ],
        )
        .await;

    publisher.wait_for(1, Duration::from_secs(1)).await;
    logger.shutdown().await;
    Ok(())
}
