//! Bearer token gate for the MCP endpoint.
//!
//! Runs before any request body is interpreted. The stored token is read on
//! every check so a regenerated token takes effect immediately.

use axum::http::HeaderValue;
use quill_store::secret::tokens_match;
use quill_store::SecretProvider;
use tracing::{error, warn};

/// Result of checking one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    /// Token matches, proceed to dispatch
    Authenticated,
    /// Header missing or not `Bearer <token>`
    Unauthenticated,
    /// Well-formed header with the wrong token
    Forbidden,
    /// No token is configured
    ServiceUnavailable,
}

impl AuthOutcome {
    /// HTTP status for this outcome
    pub fn status_code(self) -> u16 {
        match self {
            AuthOutcome::Authenticated => 200,
            AuthOutcome::Unauthenticated => 401,
            AuthOutcome::Forbidden => 403,
            AuthOutcome::ServiceUnavailable => 503,
        }
    }

    /// JSON-RPC style code used in rejection bodies
    pub fn error_code(self) -> i32 {
        match self {
            AuthOutcome::Authenticated => 0,
            AuthOutcome::Unauthenticated => -32001,
            AuthOutcome::Forbidden => -32003,
            AuthOutcome::ServiceUnavailable => -32002,
        }
    }

    /// Message used in rejection bodies
    pub fn message(self) -> &'static str {
        match self {
            AuthOutcome::Authenticated => "Authenticated",
            AuthOutcome::Unauthenticated => "Missing or invalid Authorization header.",
            AuthOutcome::Forbidden => "Invalid bearer token.",
            AuthOutcome::ServiceUnavailable => "MCP is disabled: no bearer token configured.",
        }
    }
}

/// Extract the token from a `Bearer <token>` header value
///
/// The scheme is matched case-insensitively and must be followed by
/// whitespace. Returns `None` for anything else.
pub fn parse_bearer(value: &str) -> Option<&str> {
    let value = value.trim_start();
    let split = value.find(char::is_whitespace)?;
    let (scheme, rest) = value.split_at(split);
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = rest.trim();
    (!token.is_empty()).then_some(token)
}

/// Checks the `Authorization` header against the stored token
#[derive(Clone)]
pub struct AuthGate {
    secrets: SecretProvider,
}

impl AuthGate {
    /// Create a gate backed by `secrets`
    pub fn new(secrets: SecretProvider) -> Self {
        Self { secrets }
    }

    /// Check a request's `Authorization` header
    pub fn check(&self, header: Option<&HeaderValue>) -> AuthOutcome {
        let stored = match self.secrets.current_token() {
            Ok(Some(token)) => token,
            Ok(None) => {
                warn!("Rejecting MCP request: no bearer token configured");
                return AuthOutcome::ServiceUnavailable;
            }
            Err(e) => {
                error!("Failed to read bearer token: {}", e);
                return AuthOutcome::ServiceUnavailable;
            }
        };

        let Some(presented) = header
            .and_then(|value| value.to_str().ok())
            .and_then(parse_bearer)
        else {
            warn!("Rejecting MCP request: missing or malformed Authorization header");
            return AuthOutcome::Unauthenticated;
        };

        if tokens_match(&stored, presented) {
            AuthOutcome::Authenticated
        } else {
            warn!("Rejecting MCP request: bearer token mismatch");
            AuthOutcome::Forbidden
        }
    }
}
