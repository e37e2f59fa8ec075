//! Fixed-schema records whose `data` field is itself an encoded payload.
//!
//! These are the shapes the renderer knows how to unpack. Byte fields travel
//! as base64 text, so a record serialized by a peer service can be decoded
//! back into one of these types and rendered with its nested data resolved.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// A record that wraps an opaque encoded payload.
pub trait Wrapper: DeserializeOwned {
    /// Wire names of every field, used for structural matching.
    const FIELDS: &'static [&'static str];

    /// The encoded nested payload.
    fn payload(&self) -> &[u8];

    /// All fields except the payload, keyed by the name they are rendered under.
    fn scalar_fields(&self) -> Map<String, Value>;

    /// Fields plus the payload resolved by [`resolve_bytes`](crate::render::resolve_bytes).
    fn to_value(&self) -> Value {
        let mut fields = self.scalar_fields();
        fields.insert("data".to_string(), crate::render::resolve_bytes(self.payload()));
        Value::Object(fields)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Document {
    pub uuid: Uuid,
    #[serde(rename = "correlationId")]
    pub correlation_id: Uuid,
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
    pub error: String,
    #[serde(rename = "errorCode")]
    pub error_code: i16,
    pub source: String,
    pub topic: String,
}

impl Wrapper for Document {
    const FIELDS: &'static [&'static str] = &[
        "uuid",
        "correlationId",
        "data",
        "error",
        "errorCode",
        "source",
        "topic",
    ];

    fn payload(&self) -> &[u8] {
        &self.data
    }

    fn scalar_fields(&self) -> Map<String, Value> {
        let mut m = Map::new();
        m.insert("correlationId".into(), self.correlation_id.to_string().into());
        m.insert("error".into(), self.error.clone().into());
        m.insert("errorCode".into(), self.error_code.into());
        m.insert("source".into(), self.source.clone().into());
        m.insert("topic".into(), self.topic.clone().into());
        m.insert("uuid".into(), self.uuid.to_string().into());
        m
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Command {
    pub uuid: Uuid,
    #[serde(rename = "correlationId")]
    pub correlation_id: Uuid,
    pub action: String,
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
    #[serde(rename = "responseTopic")]
    pub response_topic: String,
    pub source: String,
    #[serde(rename = "sourceTopic")]
    pub source_topic: String,
    pub timestamp: i64,
    #[serde(rename = "ttlSec")]
    pub ttl_sec: i64,
}

impl Wrapper for Command {
    const FIELDS: &'static [&'static str] = &[
        "uuid",
        "correlationId",
        "action",
        "data",
        "responseTopic",
        "source",
        "sourceTopic",
        "timestamp",
        "ttlSec",
    ];

    fn payload(&self) -> &[u8] {
        &self.data
    }

    fn scalar_fields(&self) -> Map<String, Value> {
        let mut m = Map::new();
        m.insert("action".into(), self.action.clone().into());
        m.insert("correlationId".into(), self.correlation_id.to_string().into());
        m.insert("responseTopic".into(), self.response_topic.clone().into());
        m.insert("source".into(), self.source.clone().into());
        m.insert("sourceTopic".into(), self.source_topic.clone().into());
        m.insert("timestamp".into(), self.timestamp.into());
        m.insert("ttlSec".into(), self.ttl_sec.into());
        m.insert("uuid".into(), self.uuid.to_string().into());
        m
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Event {
    pub uuid: Uuid,
    #[serde(rename = "aggregateID")]
    pub aggregate_id: i8,
    #[serde(rename = "correlationID")]
    pub correlation_id: Uuid,
    pub action: String,
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
    #[serde(rename = "nanoTime")]
    pub nano_time: i64,
    pub source: String,
    #[serde(rename = "userUUID")]
    pub user_uuid: Uuid,
    pub version: i64,
    #[serde(rename = "yearBucket")]
    pub year_bucket: i16,
}

impl Wrapper for Event {
    const FIELDS: &'static [&'static str] = &[
        "uuid",
        "aggregateID",
        "correlationID",
        "action",
        "data",
        "nanoTime",
        "source",
        "userUUID",
        "version",
        "yearBucket",
    ];

    fn payload(&self) -> &[u8] {
        &self.data
    }

    fn scalar_fields(&self) -> Map<String, Value> {
        let mut m = Map::new();
        m.insert("action".into(), self.action.clone().into());
        m.insert("aggregateID".into(), self.aggregate_id.into());
        m.insert("correlationID".into(), self.correlation_id.to_string().into());
        m.insert("nanoTime".into(), self.nano_time.into());
        m.insert("source".into(), self.source.clone().into());
        m.insert("userUUID".into(), self.user_uuid.to_string().into());
        m.insert("uuid".into(), self.uuid.to_string().into());
        m.insert("version".into(), self.version.into());
        m.insert("year".into(), self.year_bucket.into());
        m
    }
}

/// Byte fields as base64 text; `null` decodes to an empty payload.
mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(text) => STANDARD.decode(text).map_err(de::Error::custom),
            None => Ok(Vec::new()),
        }
    }
}
