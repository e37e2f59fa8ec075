use std::time::Instant;
use tokio::time::Duration;

use kafka_log_sink::memory::MemoryPublisher;
use kafka_log_sink::{Entry, Level, LevelSwitch, Logger, LoggerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let publisher = MemoryPublisher::new();
    let config =
        LoggerConfig::new("load-test", "log.sink").with_level(LevelSwitch::new(Level::Info));
    let logger = Logger::new(config, publisher.clone())?;
    logger.disable_output();

    let n: usize = 100_000;
    let start = Instant::now();

    for i in 0..n {
        logger
            .error(Entry::new("default load test error").with_error_code(i as i64))
            .await;
    }

    let elapsed = start.elapsed();
    println!("default config: sent {} entries in {:?} (~{:.0} entries/s)",
        n,
        elapsed,
        n as f64 / elapsed.as_secs_f64()
    );

    // Give the background task a little time to drain the queue
    publisher.wait_for(n, Duration::from_secs(2)).await;
    logger.shutdown().await;
    Ok(())
}
