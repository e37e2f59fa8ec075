use kafka_log_sink::env::{env_or, KAFKA_BROKERS_ENV, KAFKA_LOG_PRODUCER_TOPIC_ENV};
use kafka_log_sink::init::init_diagnostics;
use kafka_log_sink::{Entry, Logger, LoggerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_diagnostics(tracing::Level::INFO);

    // 1) Point these variables to your Kafka cluster.
    let brokers = env_or(KAFKA_BROKERS_ENV, "127.0.0.1:9092");
    let topic = env_or(KAFKA_LOG_PRODUCER_TOPIC_ENV, "log.sink");

    // 2) The level comes from LOG_LEVEL on every call; unset means INFO.
    let logger = Logger::from_dsn(
        LoggerConfig::new("kafka-demo", topic.clone()),
        &format!("kafka://{}/{}", brokers, topic),
    )?;

    logger.info(Entry::new("service started")).await;
    logger
        .error(Entry::new("order failed").with_error_code(1))
        .await;

    // 3) Flush what is queued and close the producer.
    logger.shutdown().await;
    Ok(())
}
