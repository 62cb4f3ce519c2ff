//! Configuration types
//!
//! This module provides the sink configuration handed to the backend, organized into:
//! - `base`: [`Config`], [`Level`] and [`ConsoleTarget`]
//! - `rotation`: size cap and retention of the file sink
//! - `presets`: environment-driven and pre-configured setups

mod base;
mod presets;
mod rotation;

// Re-export all public types
pub use base::{Config, ConsoleTarget, DEFAULT_LOG_FILE_NAME, DEFAULT_LOGS_DIR, Level};
pub use rotation::{DEFAULT_MAX_BYTES, RotationConfig};
