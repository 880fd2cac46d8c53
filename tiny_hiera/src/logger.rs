//! Debug hooks for observing a resolution.

use std::fmt;

/// Receives debug records emitted while a document is resolved.
///
/// Each record is a message plus structured `(name, value)` fields. Closures
/// with the matching signature implement the trait, so callers can capture
/// records without defining a type.
///
/// # Examples
///
/// ```
/// use std::cell::RefCell;
/// use tiny_hiera::ResolveLogger;
///
/// let seen = RefCell::new(Vec::new());
/// let logger = |message: &str, fields: &[(&str, &str)]| {
///     seen.borrow_mut().push(format!("{message} {fields:?}"));
/// };
/// logger.debug("Evaluating override", &[("override", "env:prod")]);
/// assert_eq!(seen.borrow().len(), 1);
/// ```
pub trait ResolveLogger {
    /// Record a debug message with structured fields.
    fn debug(&self, message: &str, fields: &[(&str, &str)]);
}

impl<F> ResolveLogger for F
where
    F: Fn(&str, &[(&str, &str)]),
{
    fn debug(&self, message: &str, fields: &[(&str, &str)]) {
        self(message, fields);
    }
}

/// Logger forwarding records to `tracing` at debug level.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingLogger;

impl ResolveLogger for TracingLogger {
    fn debug(&self, message: &str, fields: &[(&str, &str)]) {
        tracing::debug!(fields = %FieldList(fields), "{message}");
    }
}

/// Renders fields as `name=value` pairs separated by spaces.
struct FieldList<'a>(&'a [(&'a str, &'a str)]);

impl fmt::Display for FieldList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, (name, value)) in self.0.iter().enumerate() {
            if position > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{name}={value}")?;
        }
        Ok(())
    }
}
