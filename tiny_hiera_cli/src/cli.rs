//! Command-line interface definitions for `tinyhiera`.

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

use crate::facts::parse_fact_pair;

/// Parsed command line for `tinyhiera`.
#[derive(Debug, Parser)]
#[command(name = "tinyhiera")]
#[command(about = "Hierarchical data resolver")]
#[command(version)]
pub struct Cli {
    /// Action to perform.
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands understood by `tinyhiera`.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Resolve a YAML or JSON document and print the result.
    Parse(ParseArgs),
    /// Show the facts that resolution would see.
    Facts(FactsArgs),
}

/// Sources contributing to the fact set, shared by every subcommand.
#[derive(Debug, Default, Args)]
pub struct FactSources {
    /// Facts about the node as `name=value` pairs.
    #[arg(value_name = "FACT=VALUE", value_parser = parse_fact_pair)]
    pub pairs: Vec<(String, String)>,
    /// JSON or YAML file containing facts.
    #[arg(long = "facts", value_name = "FILE")]
    pub file: Option<Utf8PathBuf>,
    /// Include facts describing the host system.
    #[arg(short = 'S', long = "system-facts")]
    pub should_include_system: bool,
    /// Include the process environment as facts.
    #[arg(short = 'E', long = "env-facts")]
    pub should_include_env: bool,
}

/// Arguments for `tinyhiera parse`.
#[derive(Debug, Args)]
pub struct ParseArgs {
    /// Input JSON or YAML file to resolve.
    #[arg(value_name = "INPUT", env = "HIERA_INPUT")]
    pub input: Utf8PathBuf,
    /// Fact sources.
    #[command(flatten)]
    pub facts: FactSources,
    /// Output YAML instead of JSON; takes precedence over `--env`.
    #[arg(long = "yaml")]
    pub is_yaml_output: bool,
    /// Output environment variable assignments.
    #[arg(long = "env")]
    pub is_env_output: bool,
    /// Prefix for environment variable names.
    #[arg(long, value_name = "PREFIX", default_value = "HIERA")]
    pub env_prefix: String,
    /// Path query applied to the result.
    #[arg(long, value_name = "PATH")]
    pub query: Option<String>,
    /// Top-level section holding the base data.
    #[arg(long, value_name = "KEY", default_value = tiny_hiera::DEFAULT_DATA_KEY)]
    pub data_key: String,
    /// Log evaluated overrides to standard error.
    #[arg(long)]
    pub debug: bool,
}

/// Arguments for `tinyhiera facts`.
#[derive(Debug, Args)]
pub struct FactsArgs {
    /// Fact sources.
    #[command(flatten)]
    pub facts: FactSources,
    /// Path query applied to the facts.
    #[arg(long, value_name = "PATH")]
    pub query: Option<String>,
}

/// Output layout selected for `tinyhiera parse`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OutputFormat {
    /// Pretty-printed JSON.
    Json,
    /// YAML.
    Yaml,
    /// `PREFIX_KEY=value` lines.
    Env,
}

impl ParseArgs {
    /// The output layout the flags select.
    #[must_use]
    pub const fn output_format(&self) -> OutputFormat {
        if self.is_yaml_output {
            OutputFormat::Yaml
        } else if self.is_env_output {
            OutputFormat::Env
        } else {
            OutputFormat::Json
        }
    }
}
