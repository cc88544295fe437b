//! arena_server - shared real-time tic-tac-toe over WebSockets.

#![warn(missing_docs)]

mod cli;

use std::sync::Arc;

use anyhow::Result;
use arena_server::{GameHub, GameRepository, ServerConfig, app};
use clap::Parser;
use cli::{Cli, Command};
use tracing::{info, instrument};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    initialize_tracing();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            config,
            host,
            port,
            db_path,
        } => {
            let base = match config {
                Some(path) => ServerConfig::from_file(path)?,
                None => ServerConfig::default(),
            };
            run_server(base.with_overrides(host, port, db_path)).await
        }
        Command::Leaderboard { db_path } => print_leaderboard(db_path),
    }
}

/// Runs the game server until the process is stopped.
#[instrument]
async fn run_server(config: ServerConfig) -> Result<()> {
    let repository = GameRepository::open(config.db_path().clone())?;
    let hub = GameHub::new(Arc::new(repository.clone()));

    let listener = tokio::net::TcpListener::bind((config.host().as_str(), *config.port())).await?;
    info!(addr = %listener.local_addr()?, "Server ready, game socket at /ws");

    axum::serve(listener, app(hub, repository))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Prints one line per player.
#[instrument]
fn print_leaderboard(db_path: String) -> Result<()> {
    let repository = GameRepository::open(db_path)?;
    let entries = repository.leaderboard()?;

    println!("{:<20} {:>5} {:>6} {:>5} {:>7}", "player", "wins", "losses", "draws", "win %");
    for entry in &entries {
        println!(
            "{:<20} {:>5} {:>6} {:>5} {:>6.1}%",
            entry.username(),
            entry.wins(),
            entry.losses(),
            entry.draws(),
            entry.win_rate()
        );
    }
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown requested");
    }
}

fn initialize_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,arena_server=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
