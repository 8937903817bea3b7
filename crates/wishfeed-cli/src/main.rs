//! Wishfeed CLI - guestbook wishes from the terminal
//!
//! Leave a wish, list the feed, or keep a live view open while other guests
//! write theirs.

mod cli;
mod commands;
mod error;
#[cfg(test)]
mod tests;

use clap::Parser;

use crate::cli::{Cli, Commands};
use crate::commands::common::load_config;
use crate::commands::list::run_list;
use crate::commands::send::run_send;
use crate::commands::ticker::run_ticker;
use crate::commands::watch::run_watch;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("wishfeed=info,wishfeed_core=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.api_url)?;

    match cli.command {
        Commands::List { limit, json } => run_list(limit, json, &config).await?,
        Commands::Send { name, message } => run_send(&name, &message, &config).await?,
        Commands::Watch { ticker, limit } => run_watch(ticker, limit, &config).await?,
        Commands::Ticker => run_ticker(&config).await?,
    }

    Ok(())
}
