//! CLI command implementations
//!
//! Each subcommand has its own module with an Args struct and a `run`
//! function.

use clap::Subcommand;

pub mod config;
pub mod search;
pub mod terms;

use crate::app::AppContext;
use crate::error::Result;

pub fn run(ctx: &AppContext, command: &Commands) -> Result<()> {
    match command {
        Commands::Search(args) => search::run(ctx, args),
        Commands::Terms(args) => terms::run(ctx, args),
        Commands::Config(args) => config::run(ctx, args),
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search and filter listings from a catalog file
    Search(search::SearchArgs),

    /// Show how a query expands across Spanish and English
    Terms(terms::TermsArgs),

    /// Show the effective configuration
    Config(config::ConfigArgs),
}
