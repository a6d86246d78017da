//! Command-line interface for xenotic.

use clap::{Parser, Subcommand};
use xenotic_client::{Difficulty, Symbol};

/// XenoTic - tic-tac-toe against a server-side AI
#[derive(Parser, Debug)]
#[command(name = "xenotic")]
#[command(about = "Play tic-tac-toe against a XenoTic server", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the client config file (TOML); defaults apply if it is missing
    #[arg(long, global = true, default_value = "xenotic.toml")]
    pub config: std::path::PathBuf,

    /// Game server URL (overrides config file and XENOTIC_SERVER_URL)
    #[arg(long, global = true)]
    pub server_url: Option<String>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play an interactive game
    Play {
        /// AI difficulty: easy, medium, hard, impossible
        #[arg(short, long)]
        difficulty: Option<Difficulty>,

        /// Symbol to play (X moves first)
        #[arg(short, long)]
        symbol: Option<Symbol>,
    },

    /// Print the server's aggregate statistics
    Stats,
}
