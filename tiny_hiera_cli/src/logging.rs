//! Diagnostic logging to standard error.

use std::io::IsTerminal;

use tracing_subscriber::EnvFilter;

use crate::error::{CliError, Result};

/// Install the global `tracing` subscriber.
///
/// `debug` forces debug-level output for the resolver; otherwise `RUST_LOG`
/// applies, falling back to warnings only.
///
/// # Errors
///
/// Returns [`CliError::Logging`] when a subscriber is already installed or
/// the filter directive is invalid.
pub fn init(debug: bool) -> Result<()> {
    let filter = if debug {
        EnvFilter::try_new("debug")
    } else {
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("warn"))
    }
    .map_err(|err| CliError::Logging(err.to_string()))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .try_init()
        .map_err(|err| CliError::Logging(err.to_string()))
}
