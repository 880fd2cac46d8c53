//! Gathering the fact set from the host, the environment, files and the
//! command line.
//!
//! Sources are layered, lowest precedence first: system facts, environment
//! facts, the facts file and finally command-line pairs. Later sources
//! replace earlier top-level keys wholesale.

use camino::Utf8Path;
use serde_json::Value;
use tiny_hiera::decode::decode;
use tiny_hiera::{DocumentFormat, Mapping};

use crate::cli::FactSources;
use crate::error::{CliError, Result};
use crate::system::system_facts;

/// Parse a `name=value` command-line fact.
///
/// Only the first `=` separates the pair, so values may contain `=`.
///
/// # Errors
///
/// Returns a message when the argument has no `=` or an empty name.
///
/// # Examples
///
/// ```
/// use tiny_hiera_cli::facts::parse_fact_pair;
///
/// assert_eq!(
///     parse_fact_pair("opts=a=b"),
///     Ok(("opts".to_owned(), "a=b".to_owned()))
/// );
/// assert!(parse_fact_pair("novalue").is_err());
/// ```
pub fn parse_fact_pair(raw: &str) -> std::result::Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_owned(), value.to_owned())),
        Some(_) => Err(format!("fact '{raw}' has an empty name")),
        None => Err(format!("fact '{raw}' must be written as name=value")),
    }
}

/// Merge every requested source into one fact mapping.
///
/// # Errors
///
/// Returns [`CliError`] when the facts file cannot be read or decoded.
pub fn gather(sources: &FactSources) -> Result<Mapping> {
    let mut facts = Mapping::new();
    if sources.should_include_system {
        facts.extend(system_facts());
    }
    if sources.should_include_env {
        facts.extend(env_facts());
    }
    if let Some(path) = &sources.file {
        facts.extend(load_facts_file(path)?);
    }
    facts.extend(
        sources
            .pairs
            .iter()
            .map(|(name, value)| (name.clone(), Value::String(value.clone()))),
    );
    tracing::debug!(count = facts.len(), "gathered facts");
    Ok(facts)
}

/// Read a YAML or JSON facts file; the format is detected from its contents.
///
/// # Errors
///
/// Returns [`CliError::Io`] when the file cannot be read,
/// [`CliError::Resolve`] when it cannot be decoded and
/// [`CliError::FactsNotAMap`] when its root is not a mapping.
pub fn load_facts_file(path: &Utf8Path) -> Result<Mapping> {
    let bytes = std::fs::read(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    match decode(&bytes, DocumentFormat::detect(&bytes))? {
        Value::Object(map) => Ok(map),
        _ => Err(CliError::FactsNotAMap(path.to_path_buf())),
    }
}

/// Facts taken from the process environment.
///
/// Variables whose name or value is not valid Unicode are skipped.
#[must_use]
pub fn env_facts() -> Mapping {
    std::env::vars_os()
        .filter_map(|(name, value)| {
            let key = name.into_string().ok()?;
            let text = value.into_string().ok()?;
            Some((key, Value::String(text)))
        })
        .collect()
}
