//! Logger registry: holder of the active backend
//!
//! A [`Registry`] starts uninitialized and becomes initialized through
//! [`Registry::initialize`] or [`Registry::install`], both of which return a
//! [`LoggerHandle`]. The handle is proof of initialization: loggers created
//! from it never hit the uninitialized path.
//!
//! The backend reference is an [`ArcSwapOption`], so every log call reads it
//! without locking and re-initialization replaces it atomically. Records
//! already being written finish on the backend they started on.
//!
//! With `non_blocking` file output the handle also owns the worker guard:
//! queued lines are drained when the last clone of the handle is dropped, so
//! keep it alive for as long as the program logs (typically a `_handle`
//! binding in `main`).

use std::fs;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, LazyLock};

use arc_swap::ArcSwapOption;
use tracing_appender::non_blocking::WorkerGuard;

use crate::backend::Backend;
use crate::config::Config;
use crate::core::{LogError, LogIoResultExt, LogResult};
use crate::logger::Logger;
use crate::panic_hook;

/// What a second initialization does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReinitPolicy {
    /// Replace the active backend (useful for test harnesses reconfiguring output)
    #[default]
    Replace,
    /// Refuse with [`LogError::AlreadyInitialized`]
    Reject,
}

struct Inner {
    active: ArcSwapOption<Backend>,
    policy: ReinitPolicy,
    panic_hook: AtomicBool,
}

/// Shared handle on a registry; clones refer to the same registry
#[derive(Clone)]
pub struct Registry {
    inner: Arc<Inner>,
}

static GLOBAL: LazyLock<Registry> = LazyLock::new(Registry::new);

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("initialized", &self.is_initialized())
            .field("policy", &self.inner.policy)
            .finish()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Uninitialized registry replacing its backend on re-initialization
    #[must_use]
    pub fn new() -> Self {
        Self::with_policy(ReinitPolicy::Replace)
    }

    /// Uninitialized registry with an explicit re-initialization policy
    #[must_use]
    pub fn with_policy(policy: ReinitPolicy) -> Self {
        Self {
            inner: Arc::new(Inner {
                active: ArcSwapOption::empty(),
                policy,
                panic_hook: AtomicBool::new(false),
            }),
        }
    }

    /// Process-wide registry used by [`Logger::new`] and [`Logger::named`]
    pub fn global() -> &'static Registry {
        &GLOBAL
    }

    /// Create the logs directory if needed, configure a backend and make it active
    ///
    /// With `config.handle_panics`, panics are also reported to this registry
    /// at error level (the hook is installed once per registry).
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created, the backend
    /// cannot be configured, or the registry rejects re-initialization
    pub fn initialize(&self, config: Config) -> LogResult<LoggerHandle> {
        self.check_reinit()?;

        fs::create_dir_all(&config.logs_dir).with_log_context(|| {
            format!("creating logs directory '{}'", config.logs_dir.display())
        })?;

        let backend = Backend::configure(&config)?;
        let handle = self.install(backend)?;

        if config.handle_panics && !self.inner.panic_hook.swap(true, Ordering::AcqRel) {
            panic_hook::install(self.clone());
        }
        Ok(handle)
    }

    /// Make a caller-built backend active
    ///
    /// # Errors
    ///
    /// Returns [`LogError::AlreadyInitialized`] if the registry rejects
    /// re-initialization
    pub fn install(&self, mut backend: Backend) -> LogResult<LoggerHandle> {
        let file_guards = backend.take_file_guards();
        let backend = Some(Arc::new(backend));

        match self.inner.policy {
            ReinitPolicy::Replace => {
                if self.inner.active.swap(backend).is_some() {
                    tracing::warn!("logger registry re-initialized, previous backend replaced");
                }
            }
            ReinitPolicy::Reject => {
                let previous = self
                    .inner
                    .active
                    .compare_and_swap(&None::<Arc<Backend>>, backend);
                if previous.is_some() {
                    return Err(LogError::AlreadyInitialized);
                }
            }
        }

        Ok(LoggerHandle {
            registry: self.clone(),
            file_guards: Arc::new(file_guards),
        })
    }

    /// Whether a backend is active
    pub fn is_initialized(&self) -> bool {
        self.inner.active.load().is_some()
    }

    /// The active backend
    ///
    /// # Errors
    ///
    /// Returns [`LogError::NotInitialized`] before initialization
    pub fn active_backend(&self) -> LogResult<Arc<Backend>> {
        self.inner.active.load_full().ok_or(LogError::NotInitialized)
    }

    /// Re-initialization policy
    pub fn policy(&self) -> ReinitPolicy {
        self.inner.policy
    }

    fn check_reinit(&self) -> LogResult<()> {
        if self.inner.policy == ReinitPolicy::Reject && self.is_initialized() {
            return Err(LogError::AlreadyInitialized);
        }
        Ok(())
    }
}

/// Proof that a registry has been initialized
///
/// Returned by [`Registry::initialize`] and [`Registry::install`]; builds
/// loggers bound to that registry. Holds the guards of the backend's
/// non-blocking file workers: dropping the last clone drains their queues,
/// and later file writes of that backend fail (and are counted).
#[derive(Debug, Clone)]
#[must_use = "dropping the handle drains and stops the non-blocking file worker"]
pub struct LoggerHandle {
    registry: Registry,
    file_guards: Arc<Vec<WorkerGuard>>,
}

impl LoggerHandle {
    /// Logger named after the caller's source file
    #[track_caller]
    pub fn logger(&self) -> Logger {
        Logger::with_registry(self.registry.clone(), crate::stack::caller_module_name())
    }

    /// Logger with an explicit module name
    pub fn named(&self, module_name: impl Into<Arc<str>>) -> Logger {
        Logger::with_registry(self.registry.clone(), module_name)
    }

    /// Registry this handle belongs to
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Flush the active backend's sinks, best effort
    ///
    /// Does not wait for a non-blocking file worker; drop the handle for that.
    pub fn flush(&self) {
        if let Ok(backend) = self.registry.active_backend() {
            backend.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::thread;

    fn config_in(dir: &Path) -> Config {
        Config {
            logs_dir: dir.join("nested").join("logs"),
            log_file_name: "a.log".to_string(),
            non_blocking: false,
            ..Config::default()
        }
    }

    #[test]
    fn test_uninitialized_registry_refuses_backend_lookup() {
        let registry = Registry::new();
        assert!(!registry.is_initialized());
        assert!(matches!(
            registry.active_backend(),
            Err(LogError::NotInitialized)
        ));
    }

    #[test]
    fn test_initialize_creates_logs_directory() {
        let dir = tempfile::tempdir().unwrap();
        let registry = Registry::new();

        let _handle = registry.initialize(config_in(dir.path())).unwrap();

        assert!(registry.is_initialized());
        assert!(dir.path().join("nested/logs/a.log").exists());
    }

    #[test]
    fn test_replace_policy_swaps_backend() {
        let dir = tempfile::tempdir().unwrap();
        let registry = Registry::new();

        let _first = registry.initialize(config_in(dir.path())).unwrap();
        let first = registry.active_backend().unwrap();

        let _second = registry
            .initialize(Config {
                is_enabled: true,
                ..config_in(dir.path())
            })
            .unwrap();
        let second = registry.active_backend().unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(second.sink_names(), vec!["console", "file"]);
    }

    #[test]
    fn test_reject_policy_keeps_first_backend() {
        let dir = tempfile::tempdir().unwrap();
        let registry = Registry::with_policy(ReinitPolicy::Reject);
        assert_eq!(registry.policy(), ReinitPolicy::Reject);
        assert_eq!(Registry::global().policy(), ReinitPolicy::Replace);

        let _handle = registry.initialize(config_in(dir.path())).unwrap();
        let first = registry.active_backend().unwrap();

        let err = registry.initialize(config_in(dir.path())).unwrap_err();
        assert!(matches!(err, LogError::AlreadyInitialized));

        let err = registry
            .install(Backend::from_sinks(Vec::new()))
            .unwrap_err();
        assert!(matches!(err, LogError::AlreadyInitialized));
        assert!(Arc::ptr_eq(&first, &registry.active_backend().unwrap()));
    }

    #[test]
    fn test_dropping_handle_drains_non_blocking_file() {
        let dir = tempfile::tempdir().unwrap();
        let registry = Registry::new();
        let config = Config {
            only_json: true,
            non_blocking: true,
            ..config_in(dir.path())
        };
        let path = config.log_file_full_path();

        let handle = registry.initialize(config).unwrap();
        let logger = handle.named("drain.rs");
        for i in 0..2_000 {
            logger.info(format!("queued {i}")).unwrap();
        }
        handle.flush();
        drop(handle);

        let lines = fs::read_to_string(path).unwrap().lines().count();
        assert_eq!(lines, 2_000);
        assert_eq!(registry.active_backend().unwrap().write_failures(), 0);
    }

    #[test]
    fn test_clones_share_state_across_threads() {
        let registry = Registry::new();
        let readers: Vec<_> = (0..4)
            .map(|_| {
                let registry = registry.clone();
                thread::spawn(move || {
                    while !registry.is_initialized() {
                        thread::yield_now();
                    }
                    registry.active_backend().is_ok()
                })
            })
            .collect();

        let _handle = registry.install(Backend::from_sinks(Vec::new())).unwrap();

        for reader in readers {
            assert!(reader.join().unwrap());
        }
    }
}
