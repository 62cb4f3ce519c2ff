//! Structured log facade
//!
//! A [`Logger`] carries a module name fixed at construction and forwards
//! leveled calls to the active backend of its registry, after flattening the
//! metadata and tagging it with `className` and `logLevel`. `debug` and
//! `error` also attach the current call stack under `stack`.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::config::Level;
use crate::core::LogResult;
use crate::metadata::{Metadata, normalize};
use crate::registry::Registry;
use crate::stack;

/// Per-module logging entry point
///
/// ```rust,no_run
/// use nebula_logger::{Config, ErrorMeta, Logger};
///
/// # fn main() -> nebula_logger::LogResult<()> {
/// let _handle = nebula_logger::initialize(Config::development())?;
///
/// let logger = Logger::new(); // named after this file
/// logger.info("service started")?;
/// logger.error_with("payment failed", ErrorMeta::new("card declined"))?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Logger {
    module_name: Arc<str>,
    registry: Registry,
}

impl Logger {
    /// Logger on the global registry, named after the caller's source file
    ///
    /// The name comes from `#[track_caller]`: a helper constructing loggers on
    /// behalf of others must be `#[track_caller]` too, or use [`Logger::named`].
    #[track_caller]
    pub fn new() -> Self {
        Self::with_registry(Registry::global().clone(), stack::caller_module_name())
    }

    /// Logger on the global registry with an explicit module name
    pub fn named(module_name: impl Into<Arc<str>>) -> Self {
        Self::with_registry(Registry::global().clone(), module_name)
    }

    pub(crate) fn with_registry(registry: Registry, module_name: impl Into<Arc<str>>) -> Self {
        Self {
            module_name: module_name.into(),
            registry,
        }
    }

    /// Module name attached to every record as `className`
    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    /// Log at debug level, with the current call stack
    pub fn debug(&self, msg: impl AsRef<str>) -> LogResult<()> {
        self.log(Level::Debug, msg, Metadata::Empty, true)
    }

    /// Log at debug level with metadata, with the current call stack
    pub fn debug_with(&self, msg: impl AsRef<str>, meta: impl Into<Metadata>) -> LogResult<()> {
        self.log(Level::Debug, msg, meta, true)
    }

    /// Log at info level
    pub fn info(&self, msg: impl AsRef<str>) -> LogResult<()> {
        self.log(Level::Info, msg, Metadata::Empty, false)
    }

    /// Log at info level with metadata
    pub fn info_with(&self, msg: impl AsRef<str>, meta: impl Into<Metadata>) -> LogResult<()> {
        self.log(Level::Info, msg, meta, false)
    }

    /// Log at warn level
    pub fn warn(&self, msg: impl AsRef<str>) -> LogResult<()> {
        self.log(Level::Warn, msg, Metadata::Empty, false)
    }

    /// Log at warn level with metadata
    pub fn warn_with(&self, msg: impl AsRef<str>, meta: impl Into<Metadata>) -> LogResult<()> {
        self.log(Level::Warn, msg, meta, false)
    }

    /// Log at error level, with the current call stack
    pub fn error(&self, msg: impl AsRef<str>) -> LogResult<()> {
        self.log(Level::Error, msg, Metadata::Empty, true)
    }

    /// Log at error level with metadata, with the current call stack
    pub fn error_with(&self, msg: impl AsRef<str>, meta: impl Into<Metadata>) -> LogResult<()> {
        self.log(Level::Error, msg, meta, true)
    }

    /// Emit one record
    ///
    /// # Errors
    ///
    /// Returns [`LogError::NotInitialized`](crate::LogError::NotInitialized)
    /// if the registry has no backend yet. Sink failures are never reported.
    pub fn log(
        &self,
        level: Level,
        msg: impl AsRef<str>,
        meta: impl Into<Metadata>,
        append_stack: bool,
    ) -> LogResult<()> {
        let backend = self.registry.active_backend()?;
        if !backend.enabled(level) {
            return Ok(());
        }

        let mut payload = into_payload(normalize(meta.into()));
        payload.insert(
            "className".to_string(),
            Value::String(self.module_name.to_string()),
        );
        payload.insert("logLevel".to_string(), Value::from(level.as_str()));
        if append_stack {
            let frames = stack::pretty_trace();
            payload.insert(
                "stack".to_string(),
                Value::Array(frames.into_iter().map(Value::String).collect()),
            );
        }

        backend.log(level, msg.as_ref(), &payload);
        Ok(())
    }
}

fn into_payload(normalized: Value) -> Map<String, Value> {
    match normalized {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => {
            let mut map = Map::new();
            map.insert("meta".to_string(), other);
            map
        }
    }
}
