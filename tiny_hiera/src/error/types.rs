//! Primary error enum for resolution flows.

use std::fmt;

use thiserror::Error;

/// Serialisation formats accepted for hierarchy documents.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DocumentFormat {
    /// YAML 1.2 input.
    Yaml,
    /// JSON input.
    Json,
}

impl DocumentFormat {
    /// Returns the display name of the format.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Yaml => "YAML",
            Self::Json => "JSON",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur while resolving a hierarchy document.
///
/// Every variant is terminal for the resolution call that produced it; no
/// partial result accompanies an error.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HieraError {
    /// The document bytes could not be decoded.
    #[error("failed to parse {format}: {source}")]
    Parse {
        /// Format the decoder expected.
        format: DocumentFormat,
        /// Underlying decoder error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The document does not have the expected shape.
    #[error("{message}")]
    Schema {
        /// Description of the violated constraint.
        message: String,
    },

    /// An embedded expression failed to compile or evaluate.
    #[error("expression error for '{expression}': {message}")]
    Eval {
        /// Source text of the offending expression.
        expression: String,
        /// Human-readable explanation of the failure.
        message: String,
    },

    /// The hierarchy selected a merge strategy that does not exist.
    #[error("unsupported merge mode: {mode}")]
    MergeMode {
        /// The rejected merge selector.
        mode: String,
    },
}
