//! Payload rendering.
//!
//! [`render_node`] turns a [`Payload`] into a [`RenderNode`] tree and its
//! `Display` impl produces the text that ends up in DEBUG descriptions.
//! Known wrapper records have their encoded `data` reparsed: the bytes are
//! decoded as JSON and, when the resulting object's keys fit one of the
//! known shapes, decoded again as that shape so its own `data` unfolds too.

use serde_json::{Map, Value};
use std::any::type_name;
use std::fmt;

use crate::error::RenderError;
use crate::model::{Command, Document, Event, Wrapper};
use crate::payload::Payload;

/// Rendered form of one payload.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderNode {
    Scalar {
        type_name: &'static str,
        text: String,
    },
    Structured {
        type_name: &'static str,
        value: Value,
    },
    Sequence {
        type_name: &'static str,
        /// Length before truncation.
        len: usize,
        threshold: usize,
        items: Vec<RenderNode>,
    },
}

impl RenderNode {
    pub fn type_name(&self) -> &'static str {
        match self {
            RenderNode::Scalar { type_name, .. }
            | RenderNode::Structured { type_name, .. }
            | RenderNode::Sequence { type_name, .. } => type_name,
        }
    }

    pub fn is_truncated(&self) -> bool {
        match self {
            RenderNode::Sequence { len, items, .. } => items.len() < *len,
            _ => false,
        }
    }
}

impl fmt::Display for RenderNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderNode::Scalar { type_name, text } => write!(f, "{}:\n{}", type_name, text),
            RenderNode::Structured { type_name, value } => write!(f, "{}:\n{}", type_name, value),
            RenderNode::Sequence {
                type_name,
                len,
                threshold,
                items,
            } => {
                writeln!(f, "{}:", type_name)?;
                if items.len() < *len {
                    writeln!(
                        f,
                        "Array (length: {}) exceeds array-length threshold of {}.",
                        len, threshold
                    )?;
                }
                for (i, item) in items.iter().enumerate() {
                    writeln!(f, "-----")?;
                    writeln!(f, "=> Index {}: {}", i, item)?;
                }
                f.write_str("-----")
            }
        }
    }
}

/// Render one payload into text.
///
/// `array_threshold` caps how many elements of a list are rendered; `0`
/// renders every element.
pub fn render(payload: Payload, array_threshold: usize) -> Result<String, RenderError> {
    render_node(payload, array_threshold).map(|node| node.to_string())
}

pub fn render_node(payload: Payload, array_threshold: usize) -> Result<RenderNode, RenderError> {
    match payload {
        Payload::Document(doc) => Ok(structured::<Document>(&doc)),
        Payload::Command(cmd) => Ok(structured::<Command>(&cmd)),
        Payload::Event(event) => Ok(structured::<Event>(&event)),
        Payload::Record { type_name, value } => match value {
            Ok(value) => Ok(RenderNode::Structured { type_name, value }),
            Err(source) => Err(RenderError::Encode { type_name, source }),
        },
        Payload::List { type_name, items } => {
            let len = items.len();
            let keep = if array_threshold > 0 {
                len.min(array_threshold)
            } else {
                len
            };

            let mut nodes = Vec::with_capacity(keep);
            for (index, item) in items.into_iter().take(keep).enumerate() {
                let node = render_node(item, array_threshold).map_err(|e| RenderError::Element {
                    type_name,
                    index,
                    source: Box::new(e),
                })?;
                nodes.push(node);
            }

            Ok(RenderNode::Sequence {
                type_name,
                len,
                threshold: array_threshold,
                items: nodes,
            })
        }
        Payload::Scalar { type_name, text } => Ok(RenderNode::Scalar { type_name, text }),
    }
}

fn structured<W: Wrapper>(wrapper: &W) -> RenderNode {
    RenderNode::Structured {
        type_name: type_name::<W>(),
        value: wrapper.to_value(),
    }
}

type Decoder = fn(&Map<String, Value>) -> Option<Value>;

/// Candidate shapes for nested payloads, smallest field set first.
const SHAPES: &[(&[&str], Decoder)] = &[
    (Document::FIELDS, decode_as::<Document>),
    (Command::FIELDS, decode_as::<Command>),
    (Event::FIELDS, decode_as::<Event>),
];

fn decode_as<W: Wrapper>(map: &Map<String, Value>) -> Option<Value> {
    let wrapper: W = serde_json::from_value(Value::Object(map.clone())).ok()?;
    Some(wrapper.to_value())
}

/// Decode the opaque payload of a wrapper into a readable value.
///
/// Objects are matched against the known shapes, non-empty arrays have each
/// element resolved, and anything else comes back as the raw text.
pub fn resolve_bytes(bytes: &[u8]) -> Value {
    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(map)) => resolve_object(map),
        Ok(Value::Array(items)) if !items.is_empty() => {
            Value::Array(items.into_iter().map(resolve_value).collect())
        }
        _ => Value::String(String::from_utf8_lossy(bytes).into_owned()),
    }
}

fn resolve_value(value: Value) -> Value {
    match value {
        Value::Object(map) => resolve_object(map),
        Value::Array(items) => Value::Array(items.into_iter().map(resolve_value).collect()),
        other => other,
    }
}

fn resolve_object(map: Map<String, Value>) -> Value {
    // An empty object would fit every shape.
    if map.is_empty() {
        return Value::Object(map);
    }

    for (fields, decode) in SHAPES {
        let fits = map.keys().all(|k| fields.contains(&k.as_str()));
        if fits {
            if let Some(value) = decode(&map) {
                return value;
            }
        }
    }
    Value::Object(map)
}
