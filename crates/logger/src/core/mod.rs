//! Core components shared by every part of the logger.
//!
//! ### [`error`] - Error handling
//! The [`LogError`] taxonomy and the [`LogResult`] alias.
//!
//! ### [`result`] - Result helpers
//! Extension traits attaching context to IO errors raised while preparing sinks.

pub mod error;
pub mod result;

// Re-export core types
pub use error::{LogError, LogResult};
pub use result::LogIoResultExt;
