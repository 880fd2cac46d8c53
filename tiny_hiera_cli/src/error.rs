//! Error types for `tinyhiera`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use thiserror::Error;
use tiny_hiera::HieraError;

/// Result alias used throughout the CLI.
pub type Result<T, E = CliError> = std::result::Result<T, E>;

/// Errors surfaced by the `tinyhiera` commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Resolving or decoding a document failed.
    #[error(transparent)]
    Resolve(#[from] Arc<HieraError>),

    /// A file could not be read.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// File being accessed.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The facts file decoded to something other than a mapping.
    #[error("facts file {0} must contain a map")]
    FactsNotAMap(Utf8PathBuf),

    /// Rendering JSON output failed.
    #[error("failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Rendering YAML output failed.
    #[error("failed to render YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Writing to standard output failed.
    #[error("failed to write output: {0}")]
    Output(#[source] std::io::Error),

    /// The logging subscriber could not be installed.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}

impl From<HieraError> for CliError {
    fn from(err: HieraError) -> Self {
        Self::Resolve(Arc::new(err))
    }
}
