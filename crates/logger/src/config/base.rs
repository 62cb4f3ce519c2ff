//! Core configuration types

use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::RotationConfig;
use crate::core::{LogError, LogResult};

/// Default directory of the file sink
pub const DEFAULT_LOGS_DIR: &str = "logs";

/// Default file name of the file sink
pub const DEFAULT_LOG_FILE_NAME: &str = "e2e-tests.log";

/// Sink configuration
///
/// Keys use camelCase when (de)serialized so existing configuration files
/// (`isEnabled`, `logLevel`, `onlyJson`, `logsDir`, `logFileName`) load as-is.
/// Every field has a default, so partial documents are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Whether the console sink emits at all
    pub is_enabled: bool,

    /// Minimum level accepted by the sinks
    pub log_level: Level,

    /// JSON lines instead of `<timestamp> <level>: <message>` lines
    pub only_json: bool,

    /// Directory holding the log file, created at initialization
    pub logs_dir: PathBuf,

    /// Name of the log file inside [`Config::logs_dir`]
    pub log_file_name: String,

    /// Stream used by the console sink
    pub console_target: ConsoleTarget,

    /// Colorize the level of human-readable console lines
    pub colors: bool,

    /// Hand file writes to a background worker
    pub non_blocking: bool,

    /// Size cap and retention of the log file
    pub rotation: RotationConfig,

    /// Report panics to the sinks at error level before the previous hook runs
    pub handle_panics: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            is_enabled: false,
            log_level: Level::Info,
            only_json: false,
            logs_dir: PathBuf::from(DEFAULT_LOGS_DIR),
            log_file_name: DEFAULT_LOG_FILE_NAME.to_string(),
            console_target: ConsoleTarget::Stdout,
            colors: true,
            non_blocking: true,
            rotation: RotationConfig::default(),
            handle_panics: false,
        }
    }
}

impl Config {
    /// Full path of the log file: `logs_dir/log_file_name`
    #[must_use]
    pub fn log_file_full_path(&self) -> PathBuf {
        self.logs_dir.join(&self.log_file_name)
    }

    /// Check the configuration for values no sink can work with
    ///
    /// # Errors
    ///
    /// Returns [`LogError::Config`] describing the first problem found
    pub fn validate(&self) -> LogResult<()> {
        if self.log_file_name.trim().is_empty() {
            return Err(LogError::config("logFileName must not be empty"));
        }
        self.rotation.validate()
    }
}

/// Console output stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleTarget {
    /// Standard output
    #[default]
    Stdout,
    /// Standard error
    Stderr,
}

/// Log level, ordered from most to least verbose
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Diagnostic detail
    Debug,
    /// Normal operation
    #[default]
    Info,
    /// Something unexpected that the process recovered from
    #[serde(alias = "warning")]
    Warn,
    /// Failure
    Error,
}

impl Level {
    /// All levels, most verbose first
    pub const ALL: [Level; 4] = [Level::Debug, Level::Info, Level::Warn, Level::Error];

    /// Lower-case name as written to the sinks
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(Level::Debug),
            "info" => Ok(Level::Info),
            "warn" | "warning" => Ok(Level::Warn),
            "error" => Ok(Level::Error),
            _ => Err(LogError::InvalidLevel(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_defaults_match_bootstrap_expectations() {
        let config = Config::default();
        assert!(!config.is_enabled);
        assert_eq!(config.log_level, Level::Info);
        assert!(!config.only_json);
        assert!(!config.handle_panics);
        assert_eq!(
            config.log_file_full_path(),
            PathBuf::from("logs").join("e2e-tests.log")
        );
    }

    #[test]
    fn test_camel_case_document_with_missing_keys() {
        let config: Config = serde_json::from_str(
            r#"{"isEnabled": true, "logLevel": "debug", "onlyJson": true, "logsDir": "/tmp/t", "logFileName": "a.log"}"#,
        )
        .unwrap();

        assert!(config.is_enabled);
        assert_eq!(config.log_level, Level::Debug);
        assert!(config.only_json);
        assert_eq!(config.log_file_full_path(), PathBuf::from("/tmp/t/a.log"));
        assert_eq!(config.rotation, RotationConfig::default());
        assert_eq!(config.console_target, ConsoleTarget::Stdout);
    }

    #[test]
    fn test_empty_file_name_is_rejected() {
        let config = Config {
            log_file_name: "  ".to_string(),
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(LogError::Config(_))));
    }

    #[rstest]
    #[case("debug", Level::Debug)]
    #[case("INFO", Level::Info)]
    #[case("warning", Level::Warn)]
    #[case(" error ", Level::Error)]
    fn test_level_parsing(#[case] input: &str, #[case] expected: Level) {
        assert_eq!(input.parse::<Level>().unwrap(), expected);
    }

    #[test]
    fn test_unknown_level() {
        assert!(matches!(
            "verbose".parse::<Level>(),
            Err(LogError::InvalidLevel(name)) if name == "verbose"
        ));
    }

    #[test]
    fn test_level_ordering_drives_filtering() {
        assert!(Level::Debug < Level::Info);
        assert!(Level::Info < Level::Warn);
        assert!(Level::Warn < Level::Error);
        assert_eq!(Level::ALL.iter().filter(|l| **l >= Level::Warn).count(), 2);
    }
}
