//! Depth-bounded flattening of metadata into a JSON mapping

use serde_json::{Map, Value};

use super::{ErrorMeta, Fields, MetaValue, Metadata};

/// Deepest error level that is expanded; the top-level payload is level 1.
///
/// An error at this level keeps its message, stack and fields, but the error
/// it wraps is dropped.
pub const MAX_INNER_ERRORS_DEPTH: usize = 2;

/// Flatten a payload into loggable JSON.
///
/// - errors become `{ errorMessage, stack, ...fields }` with `innerError`
///   expanded while the depth bound allows it;
/// - error-valued fields of a mapping are flattened the same way;
/// - any other value passes through unchanged;
/// - an empty payload yields an empty object.
///
/// Never fails.
pub fn normalize(meta: Metadata) -> Value {
    match meta {
        Metadata::Empty => Value::Object(Map::new()),
        Metadata::Fields(fields) => Value::Object(spread_fields(fields, 1)),
        Metadata::Error(error) => Value::Object(spread_error(error, 1)),
        Metadata::Value(value) => value,
    }
}

fn spread_error(error: ErrorMeta, depth: usize) -> Map<String, Value> {
    let ErrorMeta {
        message,
        stack,
        fields,
        inner,
    } = error;

    let mut out = Map::with_capacity(fields.len() + 3);
    out.insert("errorMessage".to_string(), Value::String(message));
    out.insert(
        "stack".to_string(),
        stack.map_or(Value::Null, |frames| {
            Value::Array(frames.into_iter().map(Value::String).collect())
        }),
    );
    out.extend(fields);

    if let Some(inner) = inner
        && depth < MAX_INNER_ERRORS_DEPTH
    {
        out.insert(
            "innerError".to_string(),
            Value::Object(spread_error(*inner, depth + 1)),
        );
    }

    out
}

fn spread_fields(fields: Fields, depth: usize) -> Map<String, Value> {
    fields
        .into_iter()
        .map(|(key, value)| {
            let value = match value {
                MetaValue::Plain(value) => value,
                MetaValue::Error(error) => Value::Object(spread_error(error, depth)),
            };
            (key, value)
        })
        .collect()
}
