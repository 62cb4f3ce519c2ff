//! Output sinks
//!
//! A sink accepts records at or above its level, renders them in its own
//! layout and writes them to its destination. Sinks report write failures to
//! the backend, which absorbs them.

use std::io::{self, Write};
use std::path::PathBuf;

use parking_lot::Mutex;
use serde_json::{Map, Value};
use time::OffsetDateTime;
use tracing_appender::non_blocking::WorkerGuard;

use crate::config::{Config, ConsoleTarget, Level};
use crate::core::LogResult;
use crate::format::LineFormat;
use crate::writer::{self, BoxWriter};

/// One log call, as seen by the sinks
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    /// Severity
    pub level: Level,
    /// Message text
    pub message: &'a str,
    /// Normalized metadata
    pub payload: &'a Map<String, Value>,
    /// When the backend received the record
    pub timestamp: OffsetDateTime,
}

/// Destination for log records
pub trait Sink: Send + Sync {
    /// Short name used in diagnostics
    fn name(&self) -> &str;

    /// Whether records of `level` are written
    fn accepts(&self, level: Level) -> bool;

    /// Write one record
    fn write(&self, record: &Record<'_>) -> io::Result<()>;

    /// Flush buffered output
    fn flush(&self) -> io::Result<()> {
        Ok(())
    }
}

/// Sink writing rendered lines to an [`io::Write`] destination
pub struct StreamSink {
    name: String,
    min_level: Level,
    format: LineFormat,
    writer: Mutex<BoxWriter>,
    /// Keeps the background file worker alive
    guard: Option<WorkerGuard>,
}

impl std::fmt::Debug for StreamSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamSink")
            .field("name", &self.name)
            .field("min_level", &self.min_level)
            .field("format", &self.format)
            .finish_non_exhaustive()
    }
}

impl StreamSink {
    /// Sink over an arbitrary writer
    pub fn new(
        name: impl Into<String>,
        min_level: Level,
        format: LineFormat,
        writer: BoxWriter,
    ) -> Self {
        Self {
            name: name.into(),
            min_level,
            format,
            writer: Mutex::new(writer),
            guard: None,
        }
    }

    /// Console sink as described by `config` (colors only apply to text lines)
    pub fn console(config: &Config) -> Self {
        let writer: BoxWriter = match config.console_target {
            ConsoleTarget::Stdout => Box::new(io::stdout()),
            ConsoleTarget::Stderr => Box::new(io::stderr()),
        };
        Self::new(
            "console",
            config.log_level,
            LineFormat::new(config.only_json, config.colors),
            writer,
        )
    }

    /// File sink at `config.log_file_full_path()`, never colorized
    pub fn file(config: &Config) -> LogResult<Self> {
        let path: PathBuf = config.log_file_full_path();
        let (writer, guard) =
            writer::make_file_writer(&path, config.rotation, config.non_blocking)?;

        let mut sink = Self::new(
            "file",
            config.log_level,
            LineFormat::new(config.only_json, false),
            writer,
        );
        sink.guard = guard;
        Ok(sink)
    }

    /// Layout used by this sink
    pub fn format(&self) -> LineFormat {
        self.format
    }

    /// Detach the background worker guard, if any
    ///
    /// Whoever holds the guard decides when queued lines are drained: dropping
    /// it flushes the queue and stops the worker, after which writes fail.
    pub fn take_guard(&mut self) -> Option<WorkerGuard> {
        self.guard.take()
    }
}

impl Sink for StreamSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn accepts(&self, level: Level) -> bool {
        level >= self.min_level
    }

    fn write(&self, record: &Record<'_>) -> io::Result<()> {
        let line = self.format.render(record);
        self.writer.lock().write_all(line.as_bytes())
    }

    fn flush(&self) -> io::Result<()> {
        self.writer.lock().flush()
    }
}
