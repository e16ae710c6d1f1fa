#![warn(
    clippy::all,
    // clippy::pedantic,
    clippy::nursery,
    clippy::cargo,
    // clippy::unwrap_used
)]
use clap::Parser;
use home_dashboard::logger::{self, LogExt as _};
use home_dashboard::config;

mod cli;
mod commands;

fn main() -> anyhow::Result<()> {
    logger::init();

    let cli = cli::Cli::parse();
    let config = config::init(&cli.config).log_error("Could not load the configuration file")?;

    log::debug!(api = config.api.url.as_str(); "Configuration loaded");

    commands::run(cli.command, &config)
}
