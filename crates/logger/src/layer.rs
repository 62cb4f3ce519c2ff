//! Bridge from `tracing` events to the facade
//!
//! [`FacadeLayer`] lets code instrumented with `tracing` macros end up in the
//! same sinks as [`Logger`] calls. The event target becomes the module name,
//! the `message` field the message, and every other field a metadata entry.
//! Fields recorded as errors (`error = &err as &dyn Error`) are flattened like
//! any other error metadata.

use std::error::Error as StdError;
use std::fmt;

use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

use crate::config::Level;
use crate::logger::Logger;
use crate::metadata::{ErrorMeta, Fields, MetaValue};
use crate::registry::Registry;

/// Events from this crate are never forwarded, so rotation and registry
/// diagnostics cannot re-enter a sink that is already writing
const OWN_TARGET: &str = "nebula_logger";

/// `tracing_subscriber` layer forwarding events to a registry's backend
///
/// Events arriving before the registry is initialized are dropped.
///
/// ```rust,no_run
/// use nebula_logger::{Config, FacadeLayer, Registry};
/// use tracing_subscriber::layer::SubscriberExt;
///
/// # fn main() -> nebula_logger::LogResult<()> {
/// let _handle = nebula_logger::initialize(Config::production())?;
///
/// let subscriber =
///     tracing_subscriber::registry().with(FacadeLayer::new(Registry::global().clone()));
/// tracing::subscriber::set_global_default(subscriber).ok();
///
/// tracing::info!(port = 8080, "server starting");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct FacadeLayer {
    registry: Registry,
}

impl FacadeLayer {
    /// Layer writing into `registry`
    #[must_use]
    pub fn new(registry: Registry) -> Self {
        Self { registry }
    }
}

impl<S: Subscriber> Layer<S> for FacadeLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if metadata.target().starts_with(OWN_TARGET) || !self.registry.is_initialized() {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let level = map_level(*metadata.level());
        let logger = Logger::with_registry(self.registry.clone(), metadata.target());
        let append_stack = matches!(level, Level::Debug | Level::Error);

        // Re-initialization may race with us; a dropped event is acceptable here.
        let _ = logger.log(
            level,
            visitor.message.unwrap_or_default(),
            visitor.fields,
            append_stack,
        );
    }
}

fn map_level(level: tracing::Level) -> Level {
    match level {
        tracing::Level::ERROR => Level::Error,
        tracing::Level::WARN => Level::Warn,
        tracing::Level::INFO => Level::Info,
        _ => Level::Debug,
    }
}

#[derive(Default)]
struct EventVisitor {
    message: Option<String>,
    fields: Fields,
}

impl EventVisitor {
    fn plain(&mut self, field: &Field, value: impl Into<serde_json::Value>) {
        self.fields
            .insert(field.name(), MetaValue::Plain(value.into()));
    }
}

impl Visit for EventVisitor {
    fn record_f64(&mut self, field: &Field, value: f64) {
        self.plain(field, value);
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.plain(field, value);
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.plain(field, value);
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.plain(field, value);
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.plain(field, value);
        }
    }

    fn record_error(&mut self, field: &Field, value: &(dyn StdError + 'static)) {
        self.fields
            .insert(field.name(), MetaValue::Error(ErrorMeta::from_error(value)));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{value:?}"));
        } else {
            self.plain(field, format!("{value:?}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};
    use std::io;
    use std::path::Path;
    use tracing_subscriber::layer::SubscriberExt;

    fn read_lines(dir: &Path) -> Vec<Value> {
        std::fs::read_to_string(dir.join("bridge.log"))
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    fn initialized_registry(dir: &Path) -> Registry {
        let registry = Registry::new();
        let _handle = registry
            .initialize(Config {
                log_level: Level::Debug,
                only_json: true,
                logs_dir: dir.to_path_buf(),
                log_file_name: "bridge.log".to_string(),
                non_blocking: false,
                ..Config::default()
            })
            .unwrap();
        registry
    }

    #[test]
    fn test_tracing_event_becomes_record() {
        let dir = tempfile::tempdir().unwrap();
        let registry = initialized_registry(dir.path());
        let subscriber = tracing_subscriber::registry().with(FacadeLayer::new(registry));

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(target: "orders", order_id = 42u64, express = true, "order placed");
        });

        let lines = read_lines(dir.path());
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0]["message"], json!("order placed"));
        assert_eq!(lines[0]["className"], json!("orders"));
        assert_eq!(lines[0]["logLevel"], json!("info"));
        assert_eq!(lines[0]["order_id"], json!(42));
        assert_eq!(lines[0]["express"], json!(true));
    }

    #[test]
    fn test_error_field_is_flattened() {
        let dir = tempfile::tempdir().unwrap();
        let registry = initialized_registry(dir.path());
        let subscriber = tracing_subscriber::registry().with(FacadeLayer::new(registry));
        let err = io::Error::other("disk gone");

        tracing::subscriber::with_default(subscriber, || {
            tracing::error!(
                target: "storage",
                cause = &err as &(dyn StdError + 'static),
                "write failed"
            );
        });

        let record = &read_lines(dir.path())[0];
        assert_eq!(record["cause"]["errorMessage"], json!("disk gone"));
        assert!(record["stack"].as_array().is_some_and(|s| !s.is_empty()));
    }

    #[test]
    fn test_trace_maps_to_debug_and_own_events_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let registry = initialized_registry(dir.path());
        let subscriber = tracing_subscriber::registry().with(FacadeLayer::new(registry));

        tracing::subscriber::with_default(subscriber, || {
            tracing::trace!(target: "orders", "fine grained");
            tracing::warn!(target: "nebula_logger::writer", "internal");
        });

        let lines = read_lines(dir.path());
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0]["level"], json!("debug"));
    }

    #[test]
    fn test_events_before_initialize_are_dropped() {
        let registry = Registry::new();
        let subscriber = tracing_subscriber::registry().with(FacadeLayer::new(registry.clone()));

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(target: "orders", "nobody listens");
        });

        assert!(!registry.is_initialized());
    }
}
