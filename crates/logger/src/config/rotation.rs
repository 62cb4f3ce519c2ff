//! File rotation policy

use serde::{Deserialize, Serialize};

use crate::core::{LogError, LogResult};

/// Default size cap of the log file (10 MiB)
pub const DEFAULT_MAX_BYTES: u64 = 10 * 1024 * 1024;

/// Size-based rotation of the file sink
///
/// When a write would push the current file past `max_bytes`, the file is
/// renamed to `<name>.1` (older rotations shift to `.2`, `.3`, ...) and a fresh
/// file is started. Rotated files beyond `max_files` are deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RotationConfig {
    /// Size cap of the current file in bytes
    pub max_bytes: u64,
    /// Number of rotated files kept next to the current one
    pub max_files: usize,
    /// Gzip rotated files (`<name>.1.gz`)
    pub compress: bool,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_BYTES,
            max_files: 1,
            compress: false,
        }
    }
}

impl RotationConfig {
    /// Validate the policy against the enabled cargo features
    ///
    /// # Errors
    ///
    /// Returns [`LogError::Config`] for a zero size cap or when compression is
    /// requested without the `compress` feature
    pub fn validate(&self) -> LogResult<()> {
        if self.max_bytes == 0 {
            return Err(LogError::config("rotation.maxBytes must be greater than zero"));
        }
        if self.compress && !cfg!(feature = "compress") {
            return Err(LogError::config(
                "rotation.compress requires the `compress` feature",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_keeps_one_rotated_file_of_ten_megabytes() {
        let rotation = RotationConfig::default();
        assert_eq!(rotation.max_bytes, 10_485_760);
        assert_eq!(rotation.max_files, 1);
        assert!(rotation.validate().is_ok());
    }

    #[test]
    fn test_zero_size_cap_is_rejected() {
        let rotation = RotationConfig {
            max_bytes: 0,
            ..RotationConfig::default()
        };
        assert!(rotation.validate().is_err());
    }
}
