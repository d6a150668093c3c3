//! guia - bilingual directory search CLI

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use guia::app::AppContext;
use guia::cli::Cli;
use guia::cli::colors::ColorSupport;
use guia::cli::output::json_error;
use guia::{GuiaError, Result};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);
    ColorSupport::detect().apply();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                let code = match &e {
                    GuiaError::Config(_) | GuiaError::MissingConfig(_) => "config",
                    GuiaError::InvalidCatalog(_) | GuiaError::Serialization(_) => "invalid_catalog",
                    GuiaError::Geolocation(_) => "geolocation",
                    GuiaError::Io(_) | GuiaError::Runtime(_) => "error",
                };
                let response = json_error(code, e.to_string());
                println!("{}", serde_json::to_string(&response).unwrap_or_default());
            } else {
                eprintln!("Error: {e}");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let ctx = AppContext::from_cli(cli)?;
    guia::cli::commands::run(&ctx, &cli.command)
}

fn init_tracing(cli: &Cli) {
    if cli.quiet {
        return;
    }

    let filter = match cli.verbose {
        0 => "warn,guia=info",
        1 => "info,guia=debug",
        2 => "debug,guia=trace",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    if cli.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
