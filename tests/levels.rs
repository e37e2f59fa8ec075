//! Level filtering and default-filling as seen by the broker.

mod common;

use std::sync::atomic::Ordering;
use std::time::Duration;

use common::{harness, harness_with, SharedOutput};
use kafka_log_sink::memory::MemoryPublisher;
use kafka_log_sink::{Entry, Level, LevelSource, LogEntry, Logger, LoggerConfig};

const WAIT: Duration = Duration::from_secs(2);

fn levels(entries: &[LogEntry]) -> Vec<Level> {
    entries.iter().map(|e| e.level).collect()
}

async fn submit_all(logger: &Logger) {
    logger.debug(Entry::new("debug-entry"), Vec::new()).await;
    logger.info(Entry::new("info-entry")).await;
    logger.error(Entry::new("error-entry")).await;
}

#[tokio::test]
async fn info_level_drops_debug_entries() {
    let h = harness(Level::Info);
    submit_all(&h.logger).await;

    assert!(h.publisher.wait_for(2, WAIT).await);
    assert_eq!(levels(&h.publisher.entries()), vec![Level::Info, Level::Error]);
    assert_eq!(h.logger.stats().enqueued.load(Ordering::Relaxed), 2);
}

#[tokio::test]
async fn error_level_only_publishes_errors() {
    let h = harness(Level::Error);
    h.logger.info(Entry::new("info-entry")).await;
    h.logger.debug(Entry::new("debug-entry"), Vec::new()).await;
    h.logger.error(Entry::new("error-entry")).await;

    assert!(h.publisher.wait_for(1, WAIT).await);
    let entries = h.publisher.entries();
    assert_eq!(levels(&entries), vec![Level::Error]);
    assert_eq!(entries[0].description, "error-entry");
    assert_eq!(h.logger.stats().enqueued.load(Ordering::Relaxed), 1);
}

#[tokio::test]
async fn none_level_publishes_nothing() {
    let h = harness(Level::None);
    submit_all(&h.logger).await;

    assert!(!h.publisher.wait_for(1, Duration::from_millis(100)).await);
    assert_eq!(h.logger.stats().enqueued.load(Ordering::Relaxed), 0);
    assert!(h.output.text().is_empty());
}

#[tokio::test]
async fn debug_level_publishes_everything() {
    let h = harness(Level::Debug);
    submit_all(&h.logger).await;

    assert!(h.publisher.wait_for(3, WAIT).await);
    assert_eq!(
        levels(&h.publisher.entries()),
        vec![Level::Debug, Level::Info, Level::Error]
    );
}

#[tokio::test]
async fn level_changes_apply_to_the_next_call() {
    let h = harness(Level::Error);
    h.logger.info(Entry::new("before")).await;

    h.level.set(Level::Info);
    h.logger.info(Entry::new("after")).await;

    assert!(h.publisher.wait_for(1, WAIT).await);
    let entries = h.publisher.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].description, "after");
}

#[tokio::test]
async fn invalid_configured_level_behaves_as_info_and_warns_once() {
    let key = "KAFKA_LOG_SINK_IT_INVALID_LEVEL";
    std::env::set_var(key, "LOUD");

    let publisher = MemoryPublisher::new();
    let config = LoggerConfig::new("testsvc", "log.sink").with_level(LevelSource::Env(key.into()));
    let logger = Logger::new(config, publisher.clone()).unwrap();
    let output = SharedOutput::default();
    logger.set_output(output.clone());

    submit_all(&logger).await;
    logger.info(Entry::new("second-info")).await;

    assert!(publisher.wait_for(3, WAIT).await);
    assert_eq!(
        levels(&publisher.entries()),
        vec![Level::Info, Level::Error, Level::Info]
    );

    let text = output.text();
    assert_eq!(text.matches("INFO level will be used").count(), 1);
    assert!(publisher
        .entries()
        .iter()
        .all(|e| !e.description.contains("INFO level will be used")));

    std::env::remove_var(key);
}

#[tokio::test]
async fn level_warning_waits_for_output_to_be_enabled() {
    let key = "KAFKA_LOG_SINK_IT_SILENCED_LEVEL";
    std::env::set_var(key, "bogus");

    let publisher = MemoryPublisher::new();
    let config = LoggerConfig::new("testsvc", "log.sink").with_level(LevelSource::Env(key.into()));
    let logger = Logger::new(config, publisher.clone()).unwrap();
    let output = SharedOutput::default();
    logger.set_output(output.clone());

    logger.disable_output();
    logger.info(Entry::new("a")).await;
    logger.enable_output();
    logger.info(Entry::new("b")).await;
    logger.info(Entry::new("c")).await;

    assert!(publisher.wait_for(3, WAIT).await);
    let text = output.text();
    assert!(!text.lines().any(|line| line == "a"));
    assert_eq!(text.matches("INFO level will be used").count(), 1);
    assert!(text.starts_with("unrecognized log level \"bogus\""));
    assert!(text.ends_with("INFO level will be used\nb\nc\n"));

    std::env::remove_var(key);
}

#[tokio::test]
async fn empty_fields_take_instance_defaults() {
    let mut config = LoggerConfig::new("svcA", "log.sink");
    config.event_action = "default-event".into();
    let h = harness_with(config, Level::Info);

    h.logger.info(Entry::new("no service")).await;
    h.logger
        .info(
            Entry::new("own service")
                .with_service_name("svcB")
                .with_event_action("own-event")
                .with_service_action("own-action")
                .with_error_code(7),
        )
        .await;

    assert!(h.publisher.wait_for(2, WAIT).await);
    let entries = h.publisher.entries();

    assert_eq!(entries[0].service_name, "svcA");
    assert_eq!(entries[0].event_action, "default-event");
    assert_eq!(entries[0].service_action, "");

    assert_eq!(entries[1].service_name, "svcB");
    assert_eq!(entries[1].event_action, "own-event");
    assert_eq!(entries[1].service_action, "own-action");
    assert_eq!(entries[1].error_code, 7);
}

#[tokio::test]
async fn output_mirrors_descriptions_until_disabled() {
    let h = harness(Level::Info);

    h.logger.info(Entry::new("visible")).await;
    h.logger.disable_output();
    h.logger.info(Entry::new("hidden")).await;
    h.logger.enable_output();
    h.logger.error(Entry::new("visible again")).await;

    assert!(h.publisher.wait_for(3, WAIT).await);
    assert_eq!(h.output.text(), "visible\nvisible again\n");
}

#[tokio::test]
async fn shutdown_stops_publishing() {
    let h = harness(Level::Info);
    h.logger.info(Entry::new("queued")).await;
    h.logger.shutdown().await;

    assert!(h.publisher.is_closed());
    assert_eq!(h.publisher.entries().len(), 1);

    h.logger.info(Entry::new("too late")).await;
    assert_eq!(h.logger.stats().discarded.load(Ordering::Relaxed), 1);
    assert_eq!(h.publisher.entries().len(), 1);
}
