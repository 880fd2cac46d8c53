//! Convenience constructors for `HieraError`.

use std::sync::Arc;

use super::{DocumentFormat, HieraError};

impl HieraError {
    /// Construct a schema error with the given message.
    ///
    /// # Examples
    ///
    /// ```
    /// use tiny_hiera::HieraError;
    /// let err = HieraError::schema("hierarchy section is required");
    /// assert_eq!(err.to_string(), "hierarchy section is required");
    /// ```
    #[must_use]
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema {
            message: message.into(),
        }
    }

    /// Construct an evaluation error for `expression`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tiny_hiera::HieraError;
    /// let err = HieraError::eval("nope()", "unknown function 'nope'");
    /// assert!(matches!(err, HieraError::Eval { .. }));
    /// ```
    #[must_use]
    pub fn eval(expression: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Eval {
            expression: expression.into(),
            message: message.into(),
        }
    }

    /// Construct a merge-mode error naming the rejected selector.
    #[must_use]
    pub fn merge_mode(mode: impl Into<String>) -> Self {
        Self::MergeMode { mode: mode.into() }
    }

    /// Construct a parse error for `format` from a decoder failure.
    #[must_use]
    pub fn parse(
        format: DocumentFormat,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Parse {
            format,
            source: source.into(),
        }
    }

    /// Construct a schema error wrapped in an [`Arc`].
    ///
    /// This helper keeps call sites returning [`crate::HieraResult`] terse.
    #[must_use]
    pub fn schema_arc(message: impl Into<String>) -> Arc<Self> {
        Arc::new(Self::schema(message))
    }

    /// Construct an evaluation error wrapped in an [`Arc`].
    #[must_use]
    pub fn eval_arc(expression: impl Into<String>, message: impl Into<String>) -> Arc<Self> {
        Arc::new(Self::eval(expression, message))
    }
}
