use std::future::Future;
use std::io::{self, Write};
use std::panic::Location;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::backend::{parse_dsn, BrokerKind};
use crate::config::LoggerConfig;
use crate::dispatcher::{DispatchStats, Dispatcher, DispatcherState};
use crate::entry::{Entry, Level};
use crate::error::{Error, LevelError, Result};
use crate::filter::{should_emit, Defaults};
use crate::format::format_debug;
use crate::level::LevelSource;
use crate::memory::MemoryPublisher;
use crate::payload::Payload;
use crate::publisher::Publisher;

/// Leveled logger that mirrors descriptions to an output stream and
/// publishes entries to a broker topic in the background.
///
/// Cloning is cheap; clones share the same queue and settings.
#[derive(Clone)]
pub struct Logger {
    inner: Arc<Inner>,
}

struct Inner {
    dispatcher: Dispatcher,
    defaults: Defaults,
    level: LevelSource,
    array_threshold: AtomicUsize,
    enable_output: AtomicBool,
    output: Mutex<Box<dyn Write + Send>>,
    level_warned: AtomicBool,
}

/// Returned by [`Logger::fatal`]; call [`exit`](FatalExit::exit) to terminate.
#[must_use = "fatal logs only terminate the process once `exit()` is called"]
#[derive(Debug)]
pub struct FatalExit {
    code: i32,
}

impl FatalExit {
    pub fn code(&self) -> i32 {
        self.code
    }

    pub fn exit(self) -> ! {
        std::process::exit(self.code)
    }
}

impl Logger {
    /// Create a logger that publishes through `publisher`.
    ///
    /// The dispatcher tasks are spawned immediately on the current Tokio
    /// runtime and run until [`shutdown`](Logger::shutdown) or until every
    /// clone of the logger is dropped. Outside a runtime this returns
    /// [`Error::NoRuntime`].
    pub fn new<P>(config: LoggerConfig, publisher: P) -> Result<Self>
    where
        P: Publisher + 'static,
    {
        Self::with_shutdown_token(config, publisher, CancellationToken::new())
    }

    /// Like [`new`](Logger::new), stopping the background tasks when
    /// `shutdown_token` is cancelled.
    pub fn with_shutdown_token<P>(
        config: LoggerConfig,
        publisher: P,
        shutdown_token: CancellationToken,
    ) -> Result<Self>
    where
        P: Publisher + 'static,
    {
        if config.service_name.is_empty() {
            return Err(Error::EmptyServiceName);
        }
        if config.topic.is_empty() {
            return Err(Error::EmptyTopic);
        }
        if config.queue_capacity == 0 {
            return Err(Error::ZeroCapacity);
        }
        if tokio::runtime::Handle::try_current().is_err() {
            return Err(Error::NoRuntime);
        }

        let dispatcher = Dispatcher::spawn(
            publisher,
            config.topic.clone(),
            config.queue_capacity,
            shutdown_token,
        );

        Ok(Logger {
            inner: Arc::new(Inner {
                dispatcher,
                defaults: Defaults {
                    service_name: config.service_name,
                    event_action: config.event_action,
                    service_action: config.service_action,
                },
                level: config.level,
                array_threshold: AtomicUsize::new(config.array_threshold),
                enable_output: AtomicBool::new(config.enable_output),
                output: Mutex::new(Box::new(io::stdout())),
                level_warned: AtomicBool::new(false),
            }),
        })
    }

    /// Create a logger for the broker named by `dsn`.
    ///
    /// The DSN's topic replaces `config.topic`.
    pub fn from_dsn(mut config: LoggerConfig, dsn: &str) -> Result<Self> {
        let broker = parse_dsn(dsn)?;
        config.topic = broker.topic.clone();

        match broker.kind {
            BrokerKind::Memory => Self::new(config, MemoryPublisher::new()),
            BrokerKind::Kafka => {
                #[cfg(feature = "kafka")]
                {
                    let publisher =
                        crate::kafka::KafkaPublisher::new(&broker).map_err(Error::Producer)?;
                    Self::new(config, publisher)
                }

                #[cfg(not(feature = "kafka"))]
                {
                    Err(Error::Producer(crate::error::PublishError::Config(
                        "kafka feature is not enabled".to_string(),
                    )))
                }
            }
        }
    }

    /// Produce a DEBUG entry. Attached payloads are rendered into the
    /// description when the configured level is DEBUG.
    #[track_caller]
    pub fn debug(&self, entry: Entry, payloads: Vec<Payload>) -> impl Future<Output = ()> + '_ {
        self.emit(Level::Debug, entry, payloads, Location::caller())
    }

    /// Produce an INFO entry.
    #[track_caller]
    pub fn info(&self, entry: Entry) -> impl Future<Output = ()> + '_ {
        self.emit(Level::Info, entry, Vec::new(), Location::caller())
    }

    /// Produce an ERROR entry.
    #[track_caller]
    pub fn error(&self, entry: Entry) -> impl Future<Output = ()> + '_ {
        self.emit(Level::Error, entry, Vec::new(), Location::caller())
    }

    /// Produce an ERROR entry and hand back a [`FatalExit`] for the caller
    /// to terminate the process with.
    #[track_caller]
    pub fn fatal(&self, entry: Entry) -> impl Future<Output = FatalExit> + '_ {
        let call_site = Location::caller();
        async move {
            self.emit(Level::Error, entry, Vec::new(), call_site).await;
            FatalExit { code: 1 }
        }
    }

    /// Produce an entry at an explicit level.
    ///
    /// `Level::None` is not a valid entry level; such entries are dropped.
    #[track_caller]
    pub fn log(
        &self,
        level: Level,
        entry: Entry,
        payloads: Vec<Payload>,
    ) -> impl Future<Output = ()> + '_ {
        self.emit(level, entry, payloads, Location::caller())
    }

    /// Stop writing descriptions to the output stream. Entries are still published.
    pub fn disable_output(&self) {
        self.inner.enable_output.store(false, Ordering::Relaxed);
    }

    /// Write descriptions to the output stream. This is the default.
    pub fn enable_output(&self) {
        self.inner.enable_output.store(true, Ordering::Relaxed);
    }

    /// Replace the output stream (stdout by default).
    pub fn set_output<W: Write + Send + 'static>(&self, writer: W) {
        *self
            .inner
            .output
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Box::new(writer);
    }

    /// Maximum rendered elements per array; `0` disables truncation.
    pub fn set_array_threshold(&self, threshold: usize) {
        self.inner.array_threshold.store(threshold, Ordering::Relaxed);
    }

    pub fn state(&self) -> DispatcherState {
        self.inner.dispatcher.state()
    }

    pub fn stats(&self) -> &DispatchStats {
        self.inner.dispatcher.stats()
    }

    /// Stop the background tasks after flushing what is already queued.
    pub async fn shutdown(&self) {
        self.inner.dispatcher.shutdown().await;
    }

    async fn emit(
        &self,
        level: Level,
        entry: Entry,
        payloads: Vec<Payload>,
        call_site: &'static Location<'static>,
    ) {
        if level == Level::None {
            warn!("log-entry contains NONE level which is invalid; entry will be ignored");
            return;
        }

        let configured = self.configured_level();
        if !should_emit(configured, level) {
            return;
        }

        let mut record = entry.into_log_entry(level);
        if configured == Level::Debug {
            let threshold = self.inner.array_threshold.load(Ordering::Relaxed);
            match format_debug(&record.description, threshold, payloads, call_site) {
                Ok(description) => record.description = description,
                Err(e) => {
                    warn!(error = %e, "error while formatting log for DEBUG level");
                    record.description = format!("{} {}", e.partial, e);
                }
            }
        }
        self.inner.defaults.fill(&mut record);

        let _ = self.write_output(&record.description);
        self.inner.dispatcher.enqueue(record).await;
    }

    fn configured_level(&self) -> Level {
        match self.inner.level.read() {
            Ok(level) => {
                self.inner.level_warned.store(false, Ordering::Relaxed);
                level
            }
            Err(e) => {
                self.warn_invalid_level(&e);
                Level::Info
            }
        }
    }

    /// Stays armed until the warning has reached the output stream.
    fn warn_invalid_level(&self, e: &LevelError) {
        if self.inner.level_warned.load(Ordering::Relaxed) {
            return;
        }
        if self.write_output(&format!("{}; INFO level will be used", e)) {
            self.inner.level_warned.store(true, Ordering::Relaxed);
            warn!(error = %e, "log level missing or invalid, INFO level will be used");
        }
    }

    /// Returns `false` when output is disabled or the write failed.
    fn write_output(&self, text: &str) -> bool {
        if !self.inner.enable_output.load(Ordering::Relaxed) {
            return false;
        }
        let mut output = self
            .inner
            .output
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        match writeln!(output, "{}", text) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "error writing log output");
                false
            }
        }
    }
}
