//! XenoTic - command-line client
//!
//! Plays tic-tac-toe against a XenoTic server from the terminal.

#![warn(missing_docs)]

mod cli;
mod repl;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;
use xenotic_client::{ClientConfig, Difficulty, GameSessionClient, Symbol};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let mut config = ClientConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?
        .apply_env();
    if let Some(url) = cli.server_url {
        config = config.with_server_url(url);
    }

    match cli.command {
        Command::Play { difficulty, symbol } => run_play(config, difficulty, symbol).await,
        Command::Stats => run_stats(config).await,
    }
}

/// Run an interactive game
#[instrument(skip(config), fields(server_url = %config.server_url()))]
async fn run_play(config: ClientConfig, difficulty: Option<Difficulty>, symbol: Option<Symbol>) -> Result<()> {
    let difficulty = difficulty.unwrap_or(*config.difficulty());
    let symbol = symbol.unwrap_or(*config.human_symbol());
    info!(%difficulty, %symbol, "Starting interactive play");

    let client = GameSessionClient::connect(&config)?;
    repl::run(client, difficulty, symbol).await
}

/// Print server statistics
#[instrument(skip(config), fields(server_url = %config.server_url()))]
async fn run_stats(config: ClientConfig) -> Result<()> {
    let client = GameSessionClient::connect(&config)?;
    let stats = client.server_stats().await?;
    println!("{}", repl::format_stats(&stats));
    Ok(())
}
