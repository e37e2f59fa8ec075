use crate::entry::LogEntry;
use crate::publisher::{DeliveryError, Publisher};
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info, warn};

/// Lifecycle of a [`Dispatcher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatcherState {
    /// Accepting entries; both background tasks are active.
    Running,
    /// Shutdown observed; already queued entries are flushed best-effort.
    Closing,
    /// Publisher closed and the publish task exited.
    Closed,
}

const RUNNING: u8 = 0;
const CLOSING: u8 = 1;
const CLOSED: u8 = 2;

/// Counters maintained by the dispatcher and its background tasks.
#[derive(Debug, Default)]
pub struct DispatchStats {
    /// Accepted into the queue.
    pub enqueued: AtomicU64,
    /// Handed to the publisher without an immediate error.
    pub published: AtomicU64,
    /// Refused by the publisher or not encodable.
    pub publish_failures: AtomicU64,
    /// Reported on the publisher's error stream.
    pub delivery_failures: AtomicU64,
    /// Submitted after the dispatcher stopped accepting entries.
    pub discarded: AtomicU64,
}

/// Bounded FIFO hand-off between logging callers and the publisher.
///
/// A publish task pulls one entry at a time, encodes it and sends it to
/// the configured topic. A second task drains the publisher's error
/// stream. Both stop when the shutdown token is cancelled.
pub struct Dispatcher {
    sender: mpsc::Sender<LogEntry>,
    state: Arc<AtomicU8>,
    stats: Arc<DispatchStats>,
    shutdown_token: CancellationToken,
    task_tracker: TaskTracker,
}

impl Dispatcher {
    /// Spawn the background tasks on the current Tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero or if called outside a Tokio runtime.
    pub fn spawn<P>(
        mut publisher: P,
        topic: String,
        capacity: usize,
        shutdown_token: CancellationToken,
    ) -> Self
    where
        P: Publisher + 'static,
    {
        let (tx, rx) = mpsc::channel::<LogEntry>(capacity);
        let state = Arc::new(AtomicU8::new(RUNNING));
        let stats = Arc::new(DispatchStats::default());
        let task_tracker = TaskTracker::new();

        if let Some(errors) = publisher.errors() {
            task_tracker.spawn(drain_errors(errors, shutdown_token.clone(), Arc::clone(&stats)));
        }

        let publisher: Arc<dyn Publisher> = Arc::new(publisher);
        task_tracker.spawn(publish_loop(
            rx,
            publisher,
            topic,
            shutdown_token.clone(),
            Arc::clone(&state),
            Arc::clone(&stats),
        ));
        task_tracker.close();

        Dispatcher {
            sender: tx,
            state,
            stats,
            shutdown_token,
            task_tracker,
        }
    }

    /// Queue an entry for publishing, waiting while the queue is full.
    ///
    /// Returns `false` if the dispatcher no longer accepts entries.
    pub async fn enqueue(&self, entry: LogEntry) -> bool {
        if self.state() != DispatcherState::Running {
            self.discard();
            return false;
        }

        match self.sender.send(entry).await {
            Ok(()) => {
                self.stats.enqueued.fetch_add(1, Ordering::Relaxed);
                true
            }
            Err(_) => {
                self.discard();
                false
            }
        }
    }

    fn discard(&self) {
        self.stats.discarded.fetch_add(1, Ordering::Relaxed);
        warn!("log-transport is closed, dropping log-entry");
    }

    pub fn state(&self) -> DispatcherState {
        match self.state.load(Ordering::Acquire) {
            RUNNING => DispatcherState::Running,
            CLOSING => DispatcherState::Closing,
            _ => DispatcherState::Closed,
        }
    }

    pub fn stats(&self) -> &DispatchStats {
        &self.stats
    }

    /// Cancel the shutdown token and wait for both background tasks.
    pub async fn shutdown(&self) {
        self.shutdown_token.cancel();
        self.task_tracker.wait().await;
    }
}

async fn publish_loop(
    mut rx: mpsc::Receiver<LogEntry>,
    publisher: Arc<dyn Publisher>,
    topic: String,
    shutdown_token: CancellationToken,
    state: Arc<AtomicU8>,
    stats: Arc<DispatchStats>,
) {
    loop {
        tokio::select! {
            biased;
            () = shutdown_token.cancelled() => {
                info!("log-transport: shutdown requested");
                break;
            }
            next = rx.recv() => match next {
                Some(entry) => publish(&*publisher, &topic, &entry, &stats).await,
                None => {
                    debug!("log-transport: all senders dropped");
                    break;
                }
            },
        }
    }

    state.store(CLOSING, Ordering::Release);
    rx.close();
    while let Ok(entry) = rx.try_recv() {
        publish(&*publisher, &topic, &entry, &stats).await;
    }

    if let Err(e) = publisher.close().await {
        error!(error = %e, "error closing log-transport producer");
    }
    state.store(CLOSED, Ordering::Release);
    info!("closed log-transporter");
}

async fn publish(publisher: &dyn Publisher, topic: &str, entry: &LogEntry, stats: &DispatchStats) {
    let payload = match entry.to_bytes() {
        Ok(payload) => payload,
        Err(e) => {
            stats.publish_failures.fetch_add(1, Ordering::Relaxed);
            error!(error = %e, "error marshalling log-entry");
            return;
        }
    };

    match publisher.send(topic, payload).await {
        Ok(()) => {
            stats.published.fetch_add(1, Ordering::Relaxed);
        }
        Err(e) => {
            stats.publish_failures.fetch_add(1, Ordering::Relaxed);
            error!(error = %e, topic, "error publishing log-entry");
        }
    }
}

async fn drain_errors(
    mut errors: mpsc::Receiver<DeliveryError>,
    shutdown_token: CancellationToken,
    stats: Arc<DispatchStats>,
) {
    loop {
        tokio::select! {
            () = shutdown_token.cancelled() => {
                info!("log-transport producer: shutdown requested");
                return;
            }
            next = errors.recv() => match next {
                Some(e) => {
                    stats.delivery_failures.fetch_add(1, Ordering::Relaxed);
                    error!(error = %e, "error in log-transport producer");
                }
                None => return,
            },
        }
    }
}
