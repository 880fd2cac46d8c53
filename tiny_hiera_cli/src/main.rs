//! CLI entrypoint for `tinyhiera`.

use clap::Parser;
use tiny_hiera_cli::cli::{Cli, Command};
use tiny_hiera_cli::commands::{run_facts, run_parse};
use tiny_hiera_cli::error::Result;
use tiny_hiera_cli::logging;
use tiny_hiera_cli::output::write_stdout;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    run().map_err(color_eyre::eyre::Report::from)
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let output = match &cli.command {
        Command::Parse(args) => {
            logging::init(args.debug)?;
            run_parse(args)?
        }
        Command::Facts(args) => {
            logging::init(false)?;
            run_facts(args)?
        }
    };
    write_stdout(&output)
}
