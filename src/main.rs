mod aggregate;
mod auth;
mod classify;
mod cli;
mod config;
mod error;
mod model;
mod output;
mod prompt;
mod providers;
mod report;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use log::info;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    output::print_banner();

    let cli = Cli::parse();
    info!("Starting gitlab-checker");
    cli.execute().await?;

    Ok(())
}
