use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::PublishError;

/// A message the broker accepted but failed to deliver.
#[derive(thiserror::Error, Debug)]
#[error("error delivering to topic {topic:?}: {source}")]
pub struct DeliveryError {
    pub topic: String,
    #[source]
    pub source: PublishError,
}

/// Message-broker producer that published log-entries are handed to.
///
/// The dispatcher calls `send` from a background task, one entry at a
/// time, and drains `errors` from a second task.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Hand one encoded entry to the broker.
    ///
    /// An `Err` means the broker refused the message outright. Failures
    /// discovered after the hand-off are reported through [`errors`](Publisher::errors).
    async fn send(&self, topic: &str, payload: Vec<u8>) -> Result<(), PublishError>;

    /// Stream of asynchronous delivery failures.
    ///
    /// Called once, before the publisher is shared; implementations without
    /// asynchronous delivery return `None`.
    fn errors(&mut self) -> Option<mpsc::Receiver<DeliveryError>> {
        None
    }

    /// Flush and release broker resources.
    ///
    /// Default implementation is a no-op.
    async fn close(&self) -> Result<(), PublishError> {
        Ok(())
    }
}
