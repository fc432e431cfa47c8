//! Quill MCP server binary
//!
//! Serves the MCP endpoint or manages its bearer token.

use anyhow::Context;
use clap::Parser;
use quill_domain::ActorId;
use quill_server::cli::{Cli, Command, TokenCommand};
use quill_server::{config::ServerConfig, open_store, start_server};
use quill_store::{AdminGrant, SecretProvider};
use std::process;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ServerConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => {
            warn!("No config file specified, using defaults");
            ServerConfig::default()
        }
    };

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => start_server(config).await?,
        Command::Token(TokenCommand::Show) => {
            let store = open_store(&config)?;
            let token = SecretProvider::new(store).ensure_token()?;
            println!("{}", token);
        }
        Command::Token(TokenCommand::Regenerate { user }) => {
            let store = open_store(&config)?;
            let grant = AdminGrant::verify(store.as_ref(), ActorId::new(user))?;
            let token = SecretProvider::new(store).regenerate(&grant)?;
            info!("Bearer token regenerated by user {}", grant.actor());
            println!("{}", token);
        }
    }

    Ok(())
}
