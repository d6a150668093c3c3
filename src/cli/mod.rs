//! Command-line interface for guia.

use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::config::OutputFormat;

pub mod colors;
pub mod commands;
pub mod formatters;
pub mod output;

pub use commands::Commands;

#[derive(Parser, Debug)]
#[command(
    name = "guia",
    version,
    about = "Search and filter a bilingual directory of places",
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (overrides global and project config)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress log output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Emit JSON instead of human-readable output
    #[arg(long, global = true)]
    pub json: bool,
}

impl Cli {
    /// Output format forced on the command line, if any.
    #[must_use]
    pub const fn output_format(&self) -> Option<OutputFormat> {
        if self.json {
            Some(OutputFormat::Json)
        } else {
            None
        }
    }
}
