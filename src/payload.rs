use serde::Serialize;
use serde_json::Value;
use std::any::type_name;
use std::fmt::Debug;

use crate::model::{Command, Document, Event};

/// A value attached to a DEBUG entry.
///
/// The variants are the complete set of shapes the renderer distinguishes.
/// Most callers build payloads through the `From` impls, e.g.
/// `vec![event.into(), "note".into(), 4.into()]`.
#[derive(Debug)]
pub enum Payload {
    Document(Document),
    Command(Command),
    Event(Event),
    /// Any serializable mapping or record, encoded when the payload was built.
    Record {
        type_name: &'static str,
        value: Result<Value, serde_json::Error>,
    },
    List {
        type_name: &'static str,
        items: Vec<Payload>,
    },
    Scalar {
        type_name: &'static str,
        text: String,
    },
}

impl Payload {
    /// Attach any serializable value; it is rendered as JSON.
    pub fn record<T: Serialize + ?Sized>(value: &T) -> Self {
        Payload::Record {
            type_name: type_name::<T>(),
            value: serde_json::to_value(value),
        }
    }

    /// Attach a value through its `Debug` representation.
    pub fn debug<T: Debug + ?Sized>(value: &T) -> Self {
        Payload::Scalar {
            type_name: type_name::<T>(),
            text: format!("{:?}", value),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Payload::Document(_) => type_name::<Document>(),
            Payload::Command(_) => type_name::<Command>(),
            Payload::Event(_) => type_name::<Event>(),
            Payload::Record { type_name, .. }
            | Payload::List { type_name, .. }
            | Payload::Scalar { type_name, .. } => type_name,
        }
    }
}

macro_rules! scalar_payload {
    ($($t:ty),* $(,)?) => {
        $(
            impl From<$t> for Payload {
                fn from(value: $t) -> Self {
                    Payload::Scalar {
                        type_name: type_name::<$t>(),
                        text: value.to_string(),
                    }
                }
            }
        )*
    };
}

scalar_payload!(bool, char, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, String);

impl From<&str> for Payload {
    fn from(value: &str) -> Self {
        Payload::Scalar {
            type_name: type_name::<&str>(),
            text: value.to_string(),
        }
    }
}

impl From<&String> for Payload {
    fn from(value: &String) -> Self {
        Payload::from(value.clone())
    }
}

macro_rules! wrapper_payload {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for Payload {
                fn from(value: $variant) -> Self {
                    Payload::$variant(value)
                }
            }

            impl From<&$variant> for Payload {
                fn from(value: &$variant) -> Self {
                    Payload::$variant(value.clone())
                }
            }
        )*
    };
}

wrapper_payload!(Document, Command, Event);

impl<T: Into<Payload>> From<Vec<T>> for Payload {
    fn from(items: Vec<T>) -> Self {
        Payload::List {
            type_name: type_name::<Vec<T>>(),
            items: items.into_iter().map(Into::into).collect(),
        }
    }
}

impl<T: Clone + Into<Payload>> From<&[T]> for Payload {
    fn from(items: &[T]) -> Self {
        Payload::List {
            type_name: type_name::<&[T]>(),
            items: items.iter().cloned().map(Into::into).collect(),
        }
    }
}

/// JSON arrays become lists so they are truncated like any other sequence.
impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(items) => Payload::List {
                type_name: type_name::<Vec<Value>>(),
                items: items.into_iter().map(Payload::from).collect(),
            },
            other => Payload::Record {
                type_name: type_name::<Value>(),
                value: Ok(other),
            },
        }
    }
}
