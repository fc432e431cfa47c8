//! Configuration file parsing for the MCP server.
//!
//! Loads settings from TOML files including bind address, database path,
//! route prefix and optional site metadata.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Server configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// A field has an unusable value
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Server configuration loaded from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1")
    pub bind_address: String,

    /// Bind port (e.g., 8080)
    pub bind_port: u16,

    /// SQLite database file, or `:memory:`
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Path prefix the `/mcp` endpoint is mounted under
    #[serde(default = "default_route_prefix")]
    pub route_prefix: String,

    /// Create the bearer token at start-up if none is stored
    #[serde(default = "default_generate_token")]
    pub generate_token_on_start: bool,

    /// Identity used as the author of created posts
    #[serde(default)]
    pub acting_user_id: Option<i64>,

    /// Site metadata seeded when absent
    #[serde(default)]
    pub site: Option<SiteConfig>,
}

/// Site metadata table
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SiteConfig {
    /// Site title
    pub name: Option<String>,
    /// Tagline
    pub description: Option<String>,
    /// Home URL
    pub url: Option<String>,
}

fn default_database_path() -> String {
    "quill.db".to_string()
}

fn default_route_prefix() -> String {
    "/quill-mcp/v1".to_string()
}

fn default_generate_token() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind_address: "127.0.0.1".to_string(),
            bind_port: 8080,
            database_path: default_database_path(),
            route_prefix: default_route_prefix(),
            generate_token_on_start: default_generate_token(),
            acting_user_id: None,
            site: None,
        }
    }
}

impl ServerConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: ServerConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.bind_address.trim().is_empty() {
            return Err(ConfigError::Invalid("bind_address is empty".to_string()));
        }
        if !self.route_prefix.starts_with('/') {
            return Err(ConfigError::Invalid(format!(
                "route_prefix must start with '/': {}",
                self.route_prefix
            )));
        }
        Ok(())
    }

    /// Create a default configuration for testing
    pub fn default_test_config() -> Self {
        ServerConfig {
            database_path: ":memory:".to_string(),
            ..ServerConfig::default()
        }
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }

    /// Full path of the MCP endpoint
    pub fn endpoint_path(&self) -> String {
        format!("{}/mcp", self.route_prefix.trim_end_matches('/'))
    }
}
