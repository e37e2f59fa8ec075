use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::{mpsc, Notify};
use tokio::time::{timeout, Duration, Instant};

use crate::entry::LogEntry;
use crate::error::PublishError;
use crate::publisher::{DeliveryError, Publisher};

/// One message as it reached the broker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub topic: String,
    pub payload: Vec<u8>,
}

/// In-process publisher that keeps every message in memory.
///
/// Clones share the same store, so a test can hand one clone to a logger
/// and inspect what was published through another. Useful for unit tests
/// and for measuring the overhead of the logger without any external I/O.
#[derive(Clone)]
pub struct MemoryPublisher {
    shared: Arc<Shared>,
}

struct Shared {
    messages: Mutex<Vec<Message>>,
    published: Notify,
    closed: AtomicBool,
    reject_sends: AtomicBool,
    fail_deliveries: AtomicBool,
    errors_tx: mpsc::Sender<DeliveryError>,
    errors_rx: Mutex<Option<mpsc::Receiver<DeliveryError>>>,
}

impl Default for MemoryPublisher {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryPublisher {
    pub fn new() -> Self {
        let (errors_tx, errors_rx) = mpsc::channel(64);
        MemoryPublisher {
            shared: Arc::new(Shared {
                messages: Mutex::new(Vec::new()),
                published: Notify::new(),
                closed: AtomicBool::new(false),
                reject_sends: AtomicBool::new(false),
                fail_deliveries: AtomicBool::new(false),
                errors_tx,
                errors_rx: Mutex::new(Some(errors_rx)),
            }),
        }
    }

    /// Make `send` refuse every message.
    pub fn reject_sends(&self, reject: bool) {
        self.shared.reject_sends.store(reject, Ordering::Relaxed);
    }

    /// Accept messages but report each one on the error stream instead of storing it.
    pub fn fail_deliveries(&self, fail: bool) {
        self.shared.fail_deliveries.store(fail, Ordering::Relaxed);
    }

    pub fn is_closed(&self) -> bool {
        self.shared.closed.load(Ordering::Relaxed)
    }

    pub fn messages(&self) -> Vec<Message> {
        self.lock_messages().clone()
    }

    /// Published messages decoded back into entries; undecodable ones are skipped.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.lock_messages()
            .iter()
            .filter_map(|m| LogEntry::from_bytes(&m.payload).ok())
            .collect()
    }

    /// Wait until at least `count` messages were published or `limit` elapses.
    pub async fn wait_for(&self, count: usize, limit: Duration) -> bool {
        let deadline = Instant::now() + limit;
        loop {
            let notified = self.shared.published.notified();
            if self.lock_messages().len() >= count {
                return true;
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() || timeout(remaining, notified).await.is_err() {
                return self.lock_messages().len() >= count;
            }
        }
    }

    fn lock_messages(&self) -> MutexGuard<'_, Vec<Message>> {
        self.shared
            .messages
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl Publisher for MemoryPublisher {
    async fn send(&self, topic: &str, payload: Vec<u8>) -> Result<(), PublishError> {
        if self.is_closed() {
            return Err(PublishError::Closed);
        }
        if self.shared.reject_sends.load(Ordering::Relaxed) {
            return Err(PublishError::Broker("message rejected".into()));
        }
        if self.shared.fail_deliveries.load(Ordering::Relaxed) {
            let failure = DeliveryError {
                topic: topic.to_string(),
                source: PublishError::Broker("delivery failed".into()),
            };
            // Dropped if the stream is full or nobody took it.
            let _ = self.shared.errors_tx.try_send(failure);
            return Ok(());
        }

        self.lock_messages().push(Message {
            topic: topic.to_string(),
            payload,
        });
        self.shared.published.notify_waiters();
        Ok(())
    }

    fn errors(&mut self) -> Option<mpsc::Receiver<DeliveryError>> {
        self.shared
            .errors_rx
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take()
    }

    async fn close(&self) -> Result<(), PublishError> {
        self.shared.closed.store(true, Ordering::Relaxed);
        Ok(())
    }
}
