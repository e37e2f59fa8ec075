/// Supported broker kinds that can be selected via DSN.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrokerKind {
    Kafka,
    Memory,
}

/// Broker configuration built from a DSN.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerConfig {
    /// Selected publisher implementation.
    pub kind: BrokerKind,
    /// Bootstrap brokers; empty for the in-memory publisher.
    pub brokers: Vec<String>,
    /// Topic the log-entries are published to.
    pub topic: String,
}

impl BrokerConfig {
    pub fn kafka<I, S>(brokers: I, topic: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        BrokerConfig {
            kind: BrokerKind::Kafka,
            brokers: brokers.into_iter().map(Into::into).collect(),
            topic: topic.into(),
        }
    }
}

/// Parse a DSN string and infer the broker kind from its scheme.
///
/// Examples:
/// - "kafka://broker1:9092,broker2:9092/logs"
/// - "memory://logs"
pub fn parse_dsn(dsn: &str) -> Result<BrokerConfig, DsnError> {
    let lower = dsn.to_ascii_lowercase();

    if lower.starts_with("kafka://") {
        let (brokers, topic) = split_path(&dsn["kafka://".len()..])?;
        let brokers: Vec<String> = brokers
            .split(',')
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .map(str::to_string)
            .collect();
        if brokers.is_empty() {
            return Err(DsnError::MissingBrokers);
        }
        Ok(BrokerConfig {
            kind: BrokerKind::Kafka,
            brokers,
            topic,
        })
    } else if lower.starts_with("memory://") {
        let topic = dsn["memory://".len()..].trim_matches('/');
        if topic.is_empty() {
            return Err(DsnError::MissingTopic);
        }
        Ok(BrokerConfig {
            kind: BrokerKind::Memory,
            brokers: Vec::new(),
            topic: topic.to_string(),
        })
    } else {
        Err(DsnError::UnknownScheme)
    }
}

fn split_path(rest: &str) -> Result<(&str, String), DsnError> {
    match rest.split_once('/') {
        Some((hosts, topic)) if !topic.trim_matches('/').is_empty() => {
            Ok((hosts, topic.trim_matches('/').to_string()))
        }
        _ => Err(DsnError::MissingTopic),
    }
}

/// Error type returned when parsing a DSN.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum DsnError {
    #[error("unknown or unsupported DSN scheme")]
    UnknownScheme,

    #[error("DSN does not name a topic")]
    MissingTopic,

    #[error("DSN does not name any broker")]
    MissingBrokers,
}
