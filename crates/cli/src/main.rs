//! scout entry point.
//!
//! Logging goes to stderr; stdout is reserved for results and JSON output
//! so the tool can be piped.

use clap::Parser;
use scout_core::AppConfig;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod output;

use cli::{Cli, Command};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(Cli::parse()).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = AppConfig::load()?;

    match cli.command {
        Command::Search(args) => commands::search::run(&config, args).await?,
        Command::Extract(args) => commands::extract::run(&config, args).await?,
        Command::Cache(args) => commands::cache::run(&config, args)?,
        Command::Setup(args) => commands::setup::run(&config, args)?,
    }

    Ok(())
}
