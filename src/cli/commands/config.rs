//! guia config - Show the effective configuration

use clap::Args;

use crate::app::AppContext;
use crate::cli::output::{emit_json, json_ok};
use crate::error::Result;

#[derive(Args, Debug)]
pub struct ConfigArgs {}

pub fn run(ctx: &AppContext, _args: &ConfigArgs) -> Result<()> {
    if ctx.json() {
        return emit_json(&json_ok(&ctx.config));
    }
    println!("# project root: {}", ctx.project_root.display());
    print!("{}", ctx.config.to_toml()?);
    Ok(())
}
