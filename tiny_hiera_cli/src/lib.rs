//! Library interface for the `tinyhiera` command-line tool.
//!
//! The binary parses arguments with [`cli::Cli`], gathers facts through
//! [`facts`] (host facts come from [`system`]), resolves documents through
//! [`commands`] and prints the result via [`output`].

pub mod cli;
pub mod commands;
pub mod error;
pub mod facts;
pub mod logging;
pub mod output;
pub mod system;
