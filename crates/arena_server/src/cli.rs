//! Command-line interface for arena_server.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Shared real-time tic-tac-toe server
#[derive(Parser, Debug)]
#[command(name = "arena_server")]
#[command(about = "Shared real-time tic-tac-toe session over WebSockets", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the game server
    Serve {
        /// TOML config file (optional; flags below override it)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,

        /// SQLite database for game results
        #[arg(long)]
        db_path: Option<String>,
    },

    /// Print the leaderboard and exit
    Leaderboard {
        /// SQLite database for game results
        #[arg(long, default_value = "tictactoe.db")]
        db_path: String,
    },
}
