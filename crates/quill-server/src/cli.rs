//! Command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Quill MCP server - expose site content to AI clients over MCP.
#[derive(Debug, Parser)]
#[command(name = "quill-server")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "QUILL_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Commands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP server (default)
    Serve,

    /// Manage the bearer token
    #[command(subcommand)]
    Token(TokenCommand),
}

/// Bearer token commands
#[derive(Debug, Subcommand)]
pub enum TokenCommand {
    /// Print the current token, creating one if none exists
    Show,

    /// Replace the token; the old one stops working immediately
    Regenerate {
        /// ID of an administrator account authorizing the change
        #[arg(short, long)]
        user: i64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command() {
        let cli = Cli::try_parse_from(["quill-server"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_token_regenerate() {
        let cli = Cli::try_parse_from([
            "quill-server",
            "--config",
            "site.toml",
            "token",
            "regenerate",
            "--user",
            "3",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("site.toml")));
        assert!(matches!(
            cli.command,
            Some(Command::Token(TokenCommand::Regenerate { user: 3 }))
        ));
    }

    #[test]
    fn test_regenerate_requires_user() {
        assert!(Cli::try_parse_from(["quill-server", "token", "regenerate"]).is_err());
    }
}
