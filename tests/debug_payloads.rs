//! DEBUG descriptions produced through the logger.

mod common;

use std::collections::HashMap;
use std::time::Duration;

use common::harness;
use kafka_log_sink::model::{Command, Document, Event};
use kafka_log_sink::{Entry, Level, Payload};
use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

const WAIT: Duration = Duration::from_secs(2);

#[derive(Serialize)]
struct Query {
    aggregate_id: i8,
    aggregate_version: i64,
}

#[tokio::test]
async fn payloads_are_rendered_into_the_published_description() {
    let h = harness(Level::Debug);
    let id = Uuid::new_v4();

    let inner = Document {
        uuid: id,
        ..Default::default()
    };
    let event = Event {
        action: "test-action".into(),
        data: serde_json::to_vec(&inner).unwrap(),
        ..Default::default()
    };
    let query = Query {
        aggregate_id: 1,
        aggregate_version: 3,
    };
    let map_arr = vec![json!({ "test-key": "test-value" })];

    h.logger
        .debug(
            Entry::new(id.to_string()),
            vec![
                (&event).into(),
                Payload::record(&query),
                "testData5".into(),
                4i32.into(),
                map_arr.into(),
            ],
        )
        .await;

    assert!(h.publisher.wait_for(1, WAIT).await);
    let desc = &h.publisher.entries()[0].description;

    assert!(desc.contains(&format!(": ===> {}", id)));
    assert!(desc.contains("==> Data 0: kafka_log_sink::model::Event:"));
    assert!(desc.contains(&format!(r#""uuid":"{}""#, id)));
    assert!(desc.contains(r#""action":"test-action""#));
    assert!(desc.contains(r#""aggregate_version":3"#));
    assert!(desc.contains("==> Data 2: &str:\ntestData5"));
    assert!(desc.contains("==> Data 3: i32:\n4"));
    assert!(desc.contains(r#"=> Index 0: serde_json::value::Value:
{"test-key":"test-value"}"#));

    // The description on the wire is also what was written to the output.
    assert_eq!(h.output.text(), format!("{}\n", desc));
}

#[tokio::test]
async fn call_site_is_the_public_logging_call() {
    let h = harness(Level::Debug);
    let line = line!() + 1;
    h.logger.debug(Entry::new("where"), Vec::new()).await;

    assert!(h.publisher.wait_for(1, WAIT).await);
    let desc = &h.publisher.entries()[0].description;
    assert!(desc.contains(&format!("{}:{}: ===> where", file!(), line)));
}

#[tokio::test]
async fn deeply_nested_payload_resolves_to_its_json() {
    let h = harness(Level::Debug);

    let nested = r#"[
        {"a": 1},
        {"someKey": "testValue"},
        [
            {"testNested": "veryNested"},
            [
                {"moreNested": "suchNested"},
                [
                    {"suchNested": "muchResolution"},
                    {"suchResolution": {"muchWow": "wow"}},
                    "damn",
                    [],
                    {}
                ]
            ]
        ]
    ]"#;
    let inner = Document {
        data: nested.as_bytes().to_vec(),
        source: "test".into(),
        ..Default::default()
    };
    let outer = Document {
        data: serde_json::to_vec(&inner).unwrap(),
        error: "test-error".into(),
        error_code: 1,
        source: "test-source".into(),
        topic: "test-topic".into(),
        ..Default::default()
    };

    h.logger.debug(Entry::new("nested"), vec![outer.into()]).await;

    assert!(h.publisher.wait_for(1, WAIT).await);
    let desc = &h.publisher.entries()[0].description;

    let compact: String = nested.chars().filter(|c| !c.is_whitespace()).collect();
    assert!(desc.contains(&compact));
    assert!(desc.contains(r#""source":"test""#));
    assert!(desc.contains(r#""topic":"test-topic""#));
}

#[tokio::test]
async fn command_payload_unfolds_event_data() {
    let h = harness(Level::Debug);

    let event = json!({ "aggregateID": 4, "action": "restock", "yearBucket": 2026 });
    let cmd = Command {
        action: "dispatch".into(),
        data: serde_json::to_vec(&event).unwrap(),
        ttl_sec: 30,
        ..Default::default()
    };

    h.logger.debug(Entry::new("cmd"), vec![cmd.into()]).await;

    assert!(h.publisher.wait_for(1, WAIT).await);
    let desc = &h.publisher.entries()[0].description;
    assert!(desc.contains("kafka_log_sink::model::Command:"));
    assert!(desc.contains(r#""ttlSec":30"#));
    // Resolved as an Event: fields it didn't carry are filled in.
    assert!(desc.contains(r#""nanoTime":0"#));
    assert!(desc.contains(r#""year":2026"#));
}

#[tokio::test]
async fn long_arrays_are_truncated_at_the_threshold() {
    let h = harness(Level::Debug);
    let items: Vec<i64> = (0..20).collect();

    h.logger.debug(Entry::new("array"), vec![items.into()]).await;

    assert!(h.publisher.wait_for(1, WAIT).await);
    let desc = &h.publisher.entries()[0].description;
    assert!(desc.contains("Array (length: 20) exceeds array-length threshold of 15."));
    assert_eq!(desc.matches("=> Index ").count(), 15);
}

#[tokio::test]
async fn threshold_can_be_changed_at_runtime() {
    let h = harness(Level::Debug);
    h.logger.set_array_threshold(0);
    let items: Vec<i64> = (0..20).collect();

    h.logger.debug(Entry::new("array"), vec![items.into()]).await;

    assert!(h.publisher.wait_for(1, WAIT).await);
    let desc = &h.publisher.entries()[0].description;
    assert!(!desc.contains("threshold"));
    assert_eq!(desc.matches("=> Index ").count(), 20);
}

#[tokio::test]
async fn render_failure_is_appended_and_entry_still_published() {
    let h = harness(Level::Debug);
    let mut bad = HashMap::new();
    bad.insert((1, 1), "tuple keys can't be JSON object keys");

    h.logger
        .debug(Entry::new("broken"), vec!["fine".into(), Payload::record(&bad)])
        .await;

    assert!(h.publisher.wait_for(1, WAIT).await);
    let desc = &h.publisher.entries()[0].description;
    assert!(desc.contains("==> Data 0: &str:\nfine"));
    assert!(desc.contains("error while formatting DEBUG data at index: 1"));
}

#[tokio::test]
async fn payloads_are_ignored_below_debug() {
    let h = harness(Level::Debug);
    h.level.set(Level::Info);

    h.logger.error(Entry::new("plain")).await;
    h.logger
        .log(Level::Error, Entry::new("with data"), vec!["ignored".into()])
        .await;

    assert!(h.publisher.wait_for(2, WAIT).await);
    let entries = h.publisher.entries();
    assert_eq!(entries[0].description, "plain");
    assert_eq!(entries[1].description, "with data");
}
