//! Bearer token storage
//!
//! A single long-lived secret authorizes every MCP request. It is kept in the
//! options table, created on first use, and replaced only by an administrator.

use quill_domain::{ActorId, ContentRepository, OptionStore, RepositoryError};
use rand::Rng;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Option under which the bearer token is persisted
pub const TOKEN_OPTION: &str = "quill_mcp_bearer_token";

/// Length of generated tokens
pub const TOKEN_LENGTH: usize = 48;

const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &[u8] = b"0123456789";
const SYMBOLS: &[u8] = b"!@#$%^&*()-_[]{}<>~+=,.;:/?|";

/// Errors raised while checking administrative capability
#[derive(Error, Debug)]
pub enum GrantError {
    /// The account does not exist
    #[error("Unknown user: {0}")]
    UnknownActor(ActorId),

    /// The account exists but may not manage credentials
    #[error("User {0} is not an administrator")]
    NotAdministrator(ActorId),

    /// Backend failure during the lookup
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Proof that an administrator authorized a credential change
///
/// Can only be obtained through [`AdminGrant::verify`].
#[derive(Debug)]
pub struct AdminGrant {
    actor: ActorId,
}

impl AdminGrant {
    /// Check that `actor` may manage site credentials
    pub fn verify(repository: &dyn ContentRepository, actor: ActorId) -> Result<Self, GrantError> {
        let role = repository
            .role_of(actor)?
            .ok_or(GrantError::UnknownActor(actor))?;

        if !role.can_manage_options() {
            return Err(GrantError::NotAdministrator(actor));
        }

        Ok(Self { actor })
    }

    /// Administrator that issued the grant
    pub fn actor(&self) -> ActorId {
        self.actor
    }
}

/// Creates, returns and rotates the bearer token
#[derive(Clone)]
pub struct SecretProvider {
    options: Arc<dyn OptionStore>,
}

impl SecretProvider {
    /// Create a provider backed by the given option store
    pub fn new(options: Arc<dyn OptionStore>) -> Self {
        Self { options }
    }

    /// Return the stored token, generating and persisting one if none exists
    pub fn ensure_token(&self) -> Result<String, RepositoryError> {
        if let Some(token) = self.current_token()? {
            return Ok(token);
        }

        let token = generate_token();
        self.options.set_option(TOKEN_OPTION, &token)?;
        info!("Generated MCP bearer token");
        Ok(token)
    }

    /// Return the stored token without creating one
    pub fn current_token(&self) -> Result<Option<String>, RepositoryError> {
        Ok(self
            .options
            .get_option(TOKEN_OPTION)?
            .filter(|token| !token.is_empty()))
    }

    /// Replace the token unconditionally
    ///
    /// Every client holding the previous token is rejected from the next request on.
    pub fn regenerate(&self, grant: &AdminGrant) -> Result<String, RepositoryError> {
        let token = generate_token();
        self.options.set_option(TOKEN_OPTION, &token)?;
        info!("MCP bearer token regenerated by user {}", grant.actor());
        Ok(token)
    }
}

/// Generate a random token containing every character class
pub fn generate_token() -> String {
    let charset: Vec<u8> = [LOWERCASE, UPPERCASE, DIGITS, SYMBOLS].concat();
    let mut rng = rand::rng();

    loop {
        let token: String = (0..TOKEN_LENGTH)
            .map(|_| charset[rng.random_range(0..charset.len())] as char)
            .collect();

        if has_every_class(&token) {
            return token;
        }
    }
}

fn has_every_class(token: &str) -> bool {
    [LOWERCASE, UPPERCASE, DIGITS, SYMBOLS]
        .iter()
        .all(|class| token.bytes().any(|b| class.contains(&b)))
}

/// Compare a presented token with the stored one
///
/// Both values are hashed first so the comparison runs over fixed-size digests;
/// the fold touches every byte regardless of where the values differ.
pub fn tokens_match(stored: &str, presented: &str) -> bool {
    let stored = Sha256::digest(stored.as_bytes());
    let presented = Sha256::digest(presented.as_bytes());

    stored
        .iter()
        .zip(presented.iter())
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}
