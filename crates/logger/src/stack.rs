//! Call-site inspection: module identity and pretty stack traces
//!
//! Module identity comes from `#[track_caller]`, so it is only right when
//! every layer between the caller and [`caller_module_name`] is itself
//! `#[track_caller]`. Wrappers that are not must pass a name explicitly.

use std::panic::Location;
use std::path::Path;

use backtrace::Backtrace;

/// Frames belonging to the capture machinery itself
const INTERNAL_PREFIXES: &[&str] = &[
    "backtrace::",
    "<backtrace::",
    "nebula_logger::stack::pretty_trace",
];

/// Base file name of the caller's source file (e.g. `orders.rs`)
#[track_caller]
pub fn caller_module_name() -> String {
    module_name_from_path(Location::caller().file())
}

/// Base file name of `file`, or `file` itself when it has none
pub fn module_name_from_path(file: &str) -> String {
    Path::new(file)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(file)
        .to_string()
}

/// Capture the current call stack as `function (file:line:col)` strings
///
/// Frames without a function name or without a resolvable source location
/// are left out.
pub fn pretty_trace() -> Vec<String> {
    let bt = Backtrace::new();

    bt.frames()
        .iter()
        .flat_map(|frame| frame.symbols().first())
        .filter_map(|symbol| {
            let name = format!("{:#}", symbol.name()?);
            if INTERNAL_PREFIXES.iter().any(|p| name.starts_with(p)) {
                return None;
            }
            let file = symbol.filename()?;
            let line = symbol.lineno()?;
            let col = symbol.colno().unwrap_or(0);
            Some(format!("{} ({}:{}:{})", name, file.display(), line, col))
        })
        .collect()
}
