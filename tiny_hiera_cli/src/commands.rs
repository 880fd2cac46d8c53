//! Execution of the `parse` and `facts` subcommands.
//!
//! Each command returns the text to print so callers decide where it goes.

use camino::Utf8Path;
use serde_json::Value;
use tiny_hiera::{Mapping, ResolveLogger, ResolveOptions, TracingLogger, resolve_bytes};

use crate::cli::{FactsArgs, OutputFormat, ParseArgs};
use crate::error::{CliError, Result};
use crate::facts::gather;
use crate::output::{render_env, render_json, render_query, render_yaml};

/// Resolve the input document and render it as requested.
///
/// # Errors
///
/// Returns [`CliError`] when facts cannot be gathered, the document cannot
/// be read or resolved, or the output cannot be rendered.
pub fn run_parse(args: &ParseArgs) -> Result<String> {
    let facts = gather(&args.facts)?;
    let resolved = resolve_file(&args.input, &facts, &args.data_key, args.debug)?;
    if let Some(path) = &args.query {
        return Ok(render_query(&Value::Object(resolved), path));
    }
    match args.output_format() {
        OutputFormat::Json => render_json(&resolved),
        OutputFormat::Yaml => render_yaml(&resolved),
        OutputFormat::Env => Ok(render_env(&args.env_prefix, &resolved)),
    }
}

/// Render the gathered facts, or a query over them.
///
/// # Errors
///
/// Returns [`CliError`] when facts cannot be gathered or rendered.
pub fn run_facts(args: &FactsArgs) -> Result<String> {
    let facts = gather(&args.facts)?;
    match &args.query {
        Some(path) => Ok(render_query(&Value::Object(facts), path)),
        None => render_json(&facts),
    }
}

fn resolve_file(path: &Utf8Path, facts: &Mapping, data_key: &str, debug: bool) -> Result<Mapping> {
    let bytes = std::fs::read(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let options = ResolveOptions::default().with_data_key(data_key);
    let logger = debug.then_some(&TracingLogger as &dyn ResolveLogger);
    Ok(resolve_bytes(&bytes, facts, &options, logger)?)
}
