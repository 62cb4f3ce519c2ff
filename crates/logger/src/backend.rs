//! Sink backend: fans a record out to the configured sinks

use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::{Map, Value};
use time::OffsetDateTime;
use tracing_appender::non_blocking::WorkerGuard;

use crate::config::{Config, Level};
use crate::core::LogResult;
use crate::sink::{Record, Sink, StreamSink};

/// Set of sinks behind the registry
///
/// [`Backend::log`] never fails: a sink that cannot write is skipped and the
/// failure is only counted.
pub struct Backend {
    sinks: Vec<Box<dyn Sink>>,
    /// Guards of the non-blocking file workers, until the registry takes them
    file_guards: Vec<WorkerGuard>,
    write_failures: AtomicU64,
}

impl std::fmt::Debug for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.sinks.iter().map(|s| s.name()).collect();
        f.debug_struct("Backend")
            .field("sinks", &names)
            .field("file_guards", &self.file_guards.len())
            .field("write_failures", &self.write_failures())
            .finish()
    }
}

impl Backend {
    /// Build the console and file sinks described by `config`
    ///
    /// The console sink exists only when `is_enabled` is set; the file sink
    /// always exists. The logs directory must already exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the log file
    /// cannot be opened
    pub fn configure(config: &Config) -> LogResult<Self> {
        config.validate()?;

        let mut sinks: Vec<Box<dyn Sink>> = Vec::with_capacity(2);
        if config.is_enabled {
            sinks.push(Box::new(StreamSink::console(config)));
        }
        let mut file = StreamSink::file(config)?;
        let file_guards: Vec<WorkerGuard> = file.take_guard().into_iter().collect();
        sinks.push(Box::new(file));

        tracing::debug!(
            path = %config.log_file_full_path().display(),
            console = config.is_enabled,
            level = %config.log_level,
            json = config.only_json,
            "log backend configured"
        );

        let mut backend = Self::from_sinks(sinks);
        backend.file_guards = file_guards;
        Ok(backend)
    }

    /// Backend over a custom set of sinks
    pub fn from_sinks(sinks: Vec<Box<dyn Sink>>) -> Self {
        Self {
            sinks,
            file_guards: Vec::new(),
            write_failures: AtomicU64::new(0),
        }
    }

    /// Whether any sink accepts `level`
    pub fn enabled(&self, level: Level) -> bool {
        self.sinks.iter().any(|sink| sink.accepts(level))
    }

    /// Write a record to every sink accepting its level
    pub fn log(&self, level: Level, message: &str, payload: &Map<String, Value>) {
        let record = Record {
            level,
            message,
            payload,
            timestamp: OffsetDateTime::now_utc(),
        };

        for sink in self.sinks.iter().filter(|sink| sink.accepts(level)) {
            if sink.write(&record).is_err() {
                self.write_failures.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Move the non-blocking worker guards out of the backend
    ///
    /// While the backend owns them they are dropped (and the queue drained)
    /// with the backend itself.
    pub fn take_file_guards(&mut self) -> Vec<WorkerGuard> {
        std::mem::take(&mut self.file_guards)
    }

    /// Flush every sink, best effort
    ///
    /// Lines queued for a non-blocking file worker are not waited for; they
    /// are drained when the worker guard is dropped.
    pub fn flush(&self) {
        for sink in &self.sinks {
            if sink.flush().is_err() {
                self.write_failures.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Names of the active sinks, in write order
    pub fn sink_names(&self) -> Vec<&str> {
        self.sinks.iter().map(|s| s.name()).collect()
    }

    /// Number of swallowed write or flush failures
    pub fn write_failures(&self) -> u64 {
        self.write_failures.load(Ordering::Relaxed)
    }
}
