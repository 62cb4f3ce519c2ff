//! Panic reporting
//!
//! Routes uncaught panics to a registry at error level, then hands over to
//! whatever hook was installed before, so the default stderr report and the
//! process outcome are unchanged.

use std::any::Any;
use std::panic::{self, PanicHookInfo};

use crate::config::Level;
use crate::logger::Logger;
use crate::metadata::ErrorMeta;
use crate::registry::Registry;
use crate::stack;

/// Message used when the payload is neither `&str` nor `String`
const OPAQUE_PAYLOAD: &str = "Box<dyn Any>";

/// Chain a hook reporting panics to `registry` in front of the current one
pub(crate) fn install(registry: Registry) {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        report(&registry, info);
        previous(info);
    }));
}

fn report(registry: &Registry, info: &PanicHookInfo<'_>) {
    let message = payload_message(info.payload());
    let mut error = ErrorMeta::new(message);
    let module_name = match info.location() {
        Some(location) => {
            error = error.with_field(
                "location",
                format!(
                    "{}:{}:{}",
                    location.file(),
                    location.line(),
                    location.column()
                ),
            );
            stack::module_name_from_path(location.file())
        }
        None => "panic".to_string(),
    };

    let logger = Logger::with_registry(registry.clone(), module_name);
    // Nothing to do if the registry lost its backend; the previous hook still reports.
    let _ = logger.log(
        Level::Error,
        format!("uncaught panic: {message}"),
        error,
        true,
    );
    if let Ok(backend) = registry.active_backend() {
        backend.flush();
    }
}

fn payload_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        OPAQUE_PAYLOAD
    }
}
