//! Tombstone CLI - Runs and inspects the deletion countdown reconciler.

use anyhow::Context;
use clap::Parser;
use tombstone_cli::commands;
use tombstone_cli::{default_log_filter, Cli, Command, Config, Formatter};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Logs go to stderr so that stdout stays machine-readable
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_filter(cli.verbose)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;

    let format = cli.format.map(Into::into).unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Run(args) => commands::execute_run(args, &config, &formatter).await?,
        Command::Once => commands::execute_once(&config, &formatter).await?,
        Command::Serve(args) => commands::execute_serve(args, &config).await?,
        Command::Show => commands::execute_show(&config, &formatter)?,
        Command::Decode(args) => commands::execute_decode(args, &formatter)?,
    }

    Ok(())
}
