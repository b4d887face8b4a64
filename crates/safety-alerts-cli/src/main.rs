mod cli;
mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use safety_alerts_core::EntityStore;

const DEFAULT_LOG_FILTER: &str = "safety_alerts_core=info,safety_alerts=info";

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.log_filter.as_deref());

    if let Err(e) = run(&cli) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn init_tracing(log_filter: Option<&str>) {
    let filter = match log_filter {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
    };

    // stdout carries query output only
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let output = load_and_execute(cli)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn load_and_execute(cli: &Cli) -> Result<Value> {
    let store = EntityStore::bootstrap(&cli.data)
        .with_context(|| format!("Failed to load alerts document {}", cli.data.display()))?;
    tracing::info!(path = %cli.data.display(), "Alerts document loaded");

    commands::execute(&store, &cli.command)
}
