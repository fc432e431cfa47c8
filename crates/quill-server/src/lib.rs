//! Quill MCP Server
//!
//! HTTP binding for the Quill MCP dispatcher: bearer-token authentication,
//! TOML configuration and the axum endpoint at `{route_prefix}/mcp`.

#![warn(missing_docs)]

pub mod auth;
pub mod cli;
pub mod config;
pub mod handlers;

use auth::AuthGate;
use config::ServerConfig;
use handlers::{create_router, AppState};
use quill_domain::{ActorId, RepositoryError};
use quill_mcp::{Dispatcher, ToolCatalog, ToolInvoker};
use quill_store::{
    SecretProvider, SqliteStore, StoreError, OPTION_HOME, OPTION_SITE_DESCRIPTION,
    OPTION_SITE_NAME,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, info};

/// Server error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Storage could not be opened or seeded
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Token storage failed
    #[error("Token error: {0}")]
    Token(#[from] RepositoryError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Open the store named by `config` with the configured acting user
pub fn open_store(config: &ServerConfig) -> Result<Arc<SqliteStore>, ServerError> {
    let store = SqliteStore::new(&config.database_path)?
        .with_current_actor(config.acting_user_id.map(ActorId::new));
    seed_site(&store, config)?;
    Ok(Arc::new(store))
}

fn seed_site(store: &SqliteStore, config: &ServerConfig) -> Result<(), ServerError> {
    let Some(site) = &config.site else {
        return Ok(());
    };

    let seeds = [
        (OPTION_SITE_NAME, &site.name),
        (OPTION_SITE_DESCRIPTION, &site.description),
        (OPTION_HOME, &site.url),
    ];
    for (option, value) in seeds {
        if let Some(value) = value {
            if store.seed_option(option, value)? {
                debug!("Seeded option {}", option);
            }
        }
    }
    Ok(())
}

/// Build the application state over an open store
///
/// Ensures a bearer token exists when the configuration asks for one.
pub fn build_state(config: &ServerConfig, store: Arc<SqliteStore>) -> Result<AppState, ServerError> {
    let secrets = SecretProvider::new(store.clone());
    if config.generate_token_on_start {
        secrets.ensure_token()?;
    }

    let invoker = ToolInvoker::new(Arc::new(ToolCatalog::standard()), store);
    Ok(AppState {
        dispatcher: Dispatcher::new(invoker),
        auth: AuthGate::new(secrets),
    })
}

/// Start the MCP HTTP server
///
/// Opens storage, prepares the bearer token and serves until the process
/// is stopped.
pub async fn start_server(config: ServerConfig) -> Result<(), ServerError> {
    info!("Starting Quill MCP server");
    info!("Database: {}", config.database_path);

    let store = open_store(&config)?;
    let state = build_state(&config, store)?;

    let endpoint = config.endpoint_path();
    let app = create_router(state, &endpoint);

    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("MCP endpoint listening on http://{}{}", config.bind_addr(), endpoint);

    axum::serve(listener, app)
        .await
        .map_err(|e| ServerError::Server(e.to_string()))?;

    Ok(())
}
