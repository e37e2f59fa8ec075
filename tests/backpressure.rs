//! A full queue suspends logging calls instead of dropping entries.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use common::SharedOutput;
use kafka_log_sink::error::PublishError;
use kafka_log_sink::{Entry, Level, LevelSwitch, Logger, LoggerConfig, Publisher};
use tokio::time::timeout;

/// Publisher whose broker never acknowledges a send.
#[derive(Clone, Default)]
struct StalledPublisher {
    attempts: Arc<AtomicUsize>,
}

#[async_trait]
impl Publisher for StalledPublisher {
    async fn send(&self, _topic: &str, _payload: Vec<u8>) -> Result<(), PublishError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        std::future::pending().await
    }
}

#[tokio::test]
async fn full_queue_blocks_the_caller_without_dropping() {
    let publisher = StalledPublisher::default();
    let mut config = LoggerConfig::new("testsvc", "log.sink").with_level(LevelSwitch::new(Level::Info));
    config.queue_capacity = 1;
    let logger = Logger::new(config, publisher.clone()).unwrap();
    logger.set_output(SharedOutput::default());

    // One entry is stuck in the publisher, the next one fills the queue.
    timeout(Duration::from_secs(2), logger.info(Entry::new("in flight")))
        .await
        .expect("first entry is accepted");
    timeout(Duration::from_secs(2), logger.info(Entry::new("queued")))
        .await
        .expect("second entry fits the queue");

    let third = timeout(Duration::from_millis(200), logger.info(Entry::new("waiting"))).await;
    assert!(third.is_err(), "caller must wait while the queue is full");

    assert_eq!(publisher.attempts.load(Ordering::SeqCst), 1);
    assert_eq!(logger.stats().enqueued.load(Ordering::Relaxed), 2);
    assert_eq!(logger.stats().discarded.load(Ordering::Relaxed), 0);
    assert_eq!(logger.stats().publish_failures.load(Ordering::Relaxed), 0);
}
