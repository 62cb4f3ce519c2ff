//! # Nebula Logger - Structured Logging Facade
//!
//! Per-module loggers in front of one process-wide backend writing JSON or
//! human-readable lines to the console and to a size-rotated file.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use nebula_logger::prelude::*;
//!
//! fn main() -> LogResult<()> {
//!     // keep the handle alive: dropping it drains the file worker
//!     let _handle = nebula_logger::initialize(Config::from_env())?;
//!
//!     let logger = Logger::new(); // className = "main.rs"
//!     logger.info_with("server starting", fields!(port = 8080))?;
//!
//!     if let Err(e) = std::fs::read("missing.toml") {
//!         // errorMessage, stack and up to one nested cause
//!         logger.error_with("config unreadable", &e)?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Lifecycle
//!
//! Logging before [`initialize`] fails with [`LogError::NotInitialized`].
//! Tests and embedders that want isolated state use their own [`Registry`]
//! and the [`LoggerHandle`] it returns instead of the global one.
//!
//! Setting `handle_panics` reports uncaught panics as error records carrying
//! the panic message, its location and the stack, before the previously
//! installed panic hook runs.
//!
//! ## Features
//!
//! - `ansi` (default): colorized levels on the console
//! - `compress` (default): gzip rotated log files

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod backend;
mod config;
mod core;
mod layer;
mod logger;
mod macros;
mod metadata;
mod panic_hook;
mod registry;

pub mod format;
pub mod sink;
pub mod stack;
pub mod writer;

// Public API
pub use backend::Backend;
pub use config::{
    Config, ConsoleTarget, DEFAULT_LOG_FILE_NAME, DEFAULT_LOGS_DIR, DEFAULT_MAX_BYTES, Level,
    RotationConfig,
};
pub use crate::core::{LogError, LogIoResultExt, LogResult};
pub use layer::FacadeLayer;
pub use logger::Logger;
pub use metadata::{ErrorMeta, Fields, MAX_INNER_ERRORS_DEPTH, MetaValue, Metadata, normalize};
pub use registry::{LoggerHandle, Registry, ReinitPolicy};

/// Prelude for common imports
pub mod prelude {
    pub use crate::{
        Config, ErrorMeta, Fields, Level, LogError, LogResult, Logger, LoggerHandle, Metadata,
        Registry, fields, initialize, is_initialized,
    };
}

/// Initialize the global registry
///
/// Creates `config.logs_dir` if needed and activates a backend built from
/// `config`. Calling it again replaces the active backend. Keep the returned
/// handle alive while logging: dropping it drains the non-blocking file
/// worker. With `config.handle_panics`, panics are reported as error records.
///
/// # Errors
///
/// Returns an error if the logs directory or the log file cannot be created,
/// or if `config` is invalid
pub fn initialize(config: Config) -> LogResult<LoggerHandle> {
    Registry::global().initialize(config)
}

/// Whether the global registry has an active backend
pub fn is_initialized() -> bool {
    Registry::global().is_initialized()
}
