//! Result extension traits for logging operations

use crate::core::error::{LogError, LogResult};

/// Extension trait for IO results produced while preparing sinks
pub trait LogIoResultExt<T> {
    /// Convert the IO error into a [`LogError::Io`] with a fixed message
    ///
    /// # Errors
    ///
    /// Returns [`LogError::Io`] wrapping the original error
    fn or_log_error<S: Into<String>>(self, msg: S) -> LogResult<T>;

    /// Convert the IO error into a [`LogError::Io`] with a lazily built context
    ///
    /// # Errors
    ///
    /// Returns [`LogError::Io`] wrapping the original error
    fn with_log_context<S: Into<String>, F>(self, f: F) -> LogResult<T>
    where
        F: FnOnce() -> S;
}

impl<T> LogIoResultExt<T> for Result<T, std::io::Error> {
    fn or_log_error<S: Into<String>>(self, msg: S) -> LogResult<T> {
        self.map_err(|e| LogError::io(msg, e))
    }

    fn with_log_context<S: Into<String>, F>(self, f: F) -> LogResult<T>
    where
        F: FnOnce() -> S,
    {
        self.map_err(|e| LogError::io(f(), e))
    }
}
