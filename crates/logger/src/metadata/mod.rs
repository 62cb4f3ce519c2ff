//! Metadata attached to a log call
//!
//! A payload is either nothing, a mapping of fields, an error, or an arbitrary
//! JSON value. Field values are themselves either plain JSON or errors, so an
//! error buried in a mapping (`{ context: "x", cause: err }`) is still
//! flattened by [`normalize`].

mod normalize;

pub use normalize::{MAX_INNER_ERRORS_DEPTH, normalize};

use std::error::Error as StdError;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::stack;

/// Payload supplied by the caller of a log method
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Metadata {
    /// No payload
    #[default]
    Empty,
    /// Mapping whose values may be errors
    Fields(Fields),
    /// An error, possibly chained
    Error(ErrorMeta),
    /// Any other JSON value, passed through untouched
    Value(Value),
}

/// A single metadata field value
#[derive(Debug, Clone, PartialEq)]
pub enum MetaValue {
    /// Plain JSON
    Plain(Value),
    /// An error to be flattened
    Error(ErrorMeta),
}

/// Ordered mapping of metadata fields
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Fields {
    entries: Vec<(String, MetaValue)>,
}

impl Fields {
    /// Create an empty mapping
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a plain field; values that fail to serialize are skipped
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(v) = serde_json::to_value(value) {
            self.insert(key, MetaValue::Plain(v));
        }
        self
    }

    /// Add an error-valued field
    #[must_use]
    pub fn with_error(mut self, key: impl Into<String>, error: impl Into<ErrorMeta>) -> Self {
        self.insert(key, MetaValue::Error(error.into()));
        self
    }

    /// Insert or replace a field, keeping its original position on replace
    pub fn insert(&mut self, key: impl Into<String>, value: MetaValue) {
        let key = key.into();
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    /// Look a field up by key
    pub fn get(&self, key: &str) -> Option<&MetaValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no fields
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the fields in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetaValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl IntoIterator for Fields {
    type Item = (String, MetaValue);
    type IntoIter = std::vec::IntoIter<(String, MetaValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Loggable view of an error
///
/// Carries the error message, an optional pretty stack, extra fields of the
/// error and the error it wraps.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorMeta {
    message: String,
    stack: Option<Vec<String>>,
    fields: Map<String, Value>,
    inner: Option<Box<ErrorMeta>>,
}

impl ErrorMeta {
    /// Error with a message and nothing else
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            stack: None,
            fields: Map::new(),
            inner: None,
        }
    }

    /// Convert any error, following its `source()` chain into `inner`
    ///
    /// The current call stack is captured for the outermost error only; the
    /// sources carry no stack of their own.
    pub fn from_error<E: StdError + ?Sized>(error: &E) -> Self {
        let mut meta = Self::new(error.to_string()).with_stack(stack::pretty_trace());
        meta.inner = error.source().map(|source| Box::new(Self::from_source(source)));
        meta
    }

    fn from_source(error: &(dyn StdError + 'static)) -> Self {
        let mut meta = Self::new(error.to_string());
        meta.inner = error.source().map(|source| Box::new(Self::from_source(source)));
        meta
    }

    /// Attach stack frames
    #[must_use]
    pub fn with_stack(mut self, frames: Vec<String>) -> Self {
        self.stack = Some(frames);
        self
    }

    /// Attach an extra field; values that fail to serialize are skipped
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(v) = serde_json::to_value(value) {
            self.fields.insert(key.into(), v);
        }
        self
    }

    /// Attach the wrapped error
    #[must_use]
    pub fn with_inner(mut self, inner: impl Into<ErrorMeta>) -> Self {
        self.inner = Some(Box::new(inner.into()));
        self
    }

    /// Error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Stack frames, if any were captured
    pub fn stack(&self) -> Option<&[String]> {
        self.stack.as_deref()
    }

    /// Extra fields
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Wrapped error
    pub fn inner(&self) -> Option<&ErrorMeta> {
        self.inner.as_deref()
    }

    /// Depth of the chain, counting this error
    pub fn chain_len(&self) -> usize {
        1 + self.inner.as_ref().map_or(0, |inner| inner.chain_len())
    }
}

impl<E: StdError + ?Sized> From<&E> for ErrorMeta {
    fn from(error: &E) -> Self {
        Self::from_error(error)
    }
}

impl From<()> for Metadata {
    fn from((): ()) -> Self {
        Metadata::Empty
    }
}

impl From<Fields> for Metadata {
    fn from(fields: Fields) -> Self {
        Metadata::Fields(fields)
    }
}

impl From<ErrorMeta> for Metadata {
    fn from(error: ErrorMeta) -> Self {
        Metadata::Error(error)
    }
}

impl From<Value> for Metadata {
    fn from(value: Value) -> Self {
        Metadata::Value(value)
    }
}

impl From<Map<String, Value>> for Metadata {
    fn from(map: Map<String, Value>) -> Self {
        Metadata::Value(Value::Object(map))
    }
}

impl<E: StdError + ?Sized> From<&E> for Metadata {
    fn from(error: &E) -> Self {
        Metadata::Error(ErrorMeta::from_error(error))
    }
}

impl From<Value> for MetaValue {
    fn from(value: Value) -> Self {
        MetaValue::Plain(value)
    }
}

impl From<ErrorMeta> for MetaValue {
    fn from(error: ErrorMeta) -> Self {
        MetaValue::Error(error)
    }
}
