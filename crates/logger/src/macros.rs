//! Convenience macros for structured logging

/// Build [`Fields`](crate::Fields) from `key = value` pairs
///
/// Values go through `serde`; a value that fails to serialize is skipped.
/// Error-valued fields are added with [`Fields::with_error`](crate::Fields::with_error).
///
/// ```rust
/// use nebula_logger::fields;
///
/// let meta = fields!(order_id = 42, items = vec!["a", "b"]);
/// assert_eq!(meta.len(), 2);
/// ```
#[macro_export]
macro_rules! fields {
    () => {
        $crate::Fields::new()
    };
    ($($key:ident = $value:expr),+ $(,)?) => {
        $crate::Fields::new()$(.with(stringify!($key), $value))+
    };
}
