//! Configuration presets for common scenarios

use std::path::PathBuf;

use super::{Config, Level};

impl Config {
    /// Create configuration from environment variables
    ///
    /// | variable | field |
    /// |---|---|
    /// | `NEBULA_LOG_LEVEL` (or `RUST_LOG` holding a bare level) | `log_level` |
    /// | `NEBULA_LOG_CONSOLE` | `is_enabled` |
    /// | `NEBULA_LOG_JSON` | `only_json` |
    /// | `NEBULA_LOG_COLORS` | `colors` |
    /// | `NEBULA_LOG_PANICS` | `handle_panics` |
    /// | `NEBULA_LOG_DIR` | `logs_dir` |
    /// | `NEBULA_LOG_FILE` | `log_file_name` |
    ///
    /// Unparseable values are ignored and the default is kept.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Config::from_env`] with a custom variable source
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(level) = lookup("NEBULA_LOG_LEVEL")
            .or_else(|| lookup("RUST_LOG"))
            .and_then(|v| v.parse::<Level>().ok())
        {
            config.log_level = level;
        }

        let flag = |key: &str| lookup(key).map(|v| v != "0" && !v.eq_ignore_ascii_case("false"));

        if let Some(v) = flag("NEBULA_LOG_CONSOLE") {
            config.is_enabled = v;
        }
        if let Some(v) = flag("NEBULA_LOG_JSON") {
            config.only_json = v;
        }
        if let Some(v) = flag("NEBULA_LOG_COLORS") {
            config.colors = v;
        }
        if let Some(v) = flag("NEBULA_LOG_PANICS") {
            config.handle_panics = v;
        }
        if let Some(dir) = lookup("NEBULA_LOG_DIR").filter(|v| !v.is_empty()) {
            config.logs_dir = PathBuf::from(dir);
        }
        if let Some(name) = lookup("NEBULA_LOG_FILE").filter(|v| !v.is_empty()) {
            config.log_file_name = name;
        }

        config
    }

    /// Development configuration (console on, debug level, colored text)
    #[must_use]
    pub fn development() -> Self {
        Self {
            is_enabled: true,
            log_level: Level::Debug,
            only_json: false,
            colors: true,
            ..Self::default()
        }
    }

    /// Production configuration (console on, info level, JSON lines, panics reported)
    #[must_use]
    pub fn production() -> Self {
        Self {
            is_enabled: true,
            log_level: Level::Info,
            only_json: true,
            colors: false,
            handle_panics: true,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_from_lookup_reads_every_variable() {
        let config = Config::from_lookup(lookup_from(&[
            ("NEBULA_LOG_LEVEL", "warn"),
            ("NEBULA_LOG_CONSOLE", "true"),
            ("NEBULA_LOG_JSON", "1"),
            ("NEBULA_LOG_COLORS", "false"),
            ("NEBULA_LOG_DIR", "/var/log/app"),
            ("NEBULA_LOG_FILE", "app.log"),
            ("NEBULA_LOG_PANICS", "yes"),
        ]));

        assert_eq!(config.log_level, Level::Warn);
        assert!(config.is_enabled);
        assert!(config.only_json);
        assert!(!config.colors);
        assert!(config.handle_panics);
        assert_eq!(config.log_file_full_path(), PathBuf::from("/var/log/app/app.log"));
    }

    #[test]
    fn test_rust_log_directives_are_not_levels() {
        let config = Config::from_lookup(lookup_from(&[("RUST_LOG", "hyper=warn,debug")]));
        assert_eq!(config.log_level, Level::Info);

        let config = Config::from_lookup(lookup_from(&[("RUST_LOG", "debug")]));
        assert_eq!(config.log_level, Level::Debug);
    }

    #[test]
    fn test_presets() {
        assert_eq!(Config::development().log_level, Level::Debug);
        assert!(Config::production().only_json);
        assert!(Config::production().is_enabled);
        assert!(Config::production().handle_panics);
        assert!(!Config::development().handle_panics);
    }
}
