use std::error::Error as StdError;

/// Error returned when a [`Logger`](crate::logger::Logger) cannot be built.
///
/// Construction is the only place where misconfiguration is fatal; once a
/// logger exists, logging calls never fail.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("empty default service-name provided")]
    EmptyServiceName,

    #[error("empty producer-topic provided")]
    EmptyTopic,

    #[error("queue capacity must be greater than zero")]
    ZeroCapacity,

    #[error("logger must be created inside a Tokio runtime")]
    NoRuntime,

    #[error("error creating log-transport producer: {0}")]
    Producer(#[source] PublishError),

    #[error("invalid broker DSN: {0}")]
    Dsn(#[from] crate::backend::DsnError),
}

/// Failure while converting one payload into its structured text form.
#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error("error marshalling {type_name}: {source}")]
    Encode {
        type_name: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("error formatting {type_name} at index: \"{index}\": {source}")]
    Element {
        type_name: &'static str,
        index: usize,
        #[source]
        source: Box<RenderError>,
    },
}

/// Failure while assembling a debug description.
///
/// Carries the text produced before the failing payload so the caller can
/// still emit something useful.
#[derive(thiserror::Error, Debug)]
#[error("error while formatting DEBUG data at index: {index}: {source}")]
pub struct FormatError {
    pub index: usize,
    pub partial: String,
    #[source]
    pub source: RenderError,
}

/// Error reported by a [`Publisher`](crate::publisher::Publisher).
#[derive(thiserror::Error, Debug)]
pub enum PublishError {
    #[error("missing producer configuration: {0}")]
    Config(String),

    #[error("error marshalling log-entry: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("publisher is closed")]
    Closed,

    #[error("broker error: {0}")]
    Broker(Box<dyn StdError + Send + Sync>),
}

/// A configured level value that is not one of `DEBUG`, `INFO`, `ERROR`, `NONE`.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unrecognized log level {0:?}; valid levels are: DEBUG, INFO, ERROR and NONE")]
pub struct LevelError(pub String);

pub type Result<T> = std::result::Result<T, Error>;
