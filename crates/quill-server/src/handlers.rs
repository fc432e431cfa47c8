//! HTTP request handlers for the MCP endpoint.
//!
//! Binds the transport-neutral dispatcher to axum: auth first, then dispatch,
//! then map the reply to a status code and JSON body.

use crate::auth::{AuthGate, AuthOutcome};
use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::post,
    Router as AxumRouter,
};
use quill_mcp::protocol::JSONRPC_VERSION;
use quill_mcp::{Dispatcher, Reply};
use serde::Serialize;
use tracing::error;

/// Code for a GET against the endpoint
const METHOD_NOT_ALLOWED_CODE: i32 = -32000;

/// Code for a dispatch task that died
const INTERNAL_ERROR_CODE: i32 = -32603;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// JSON-RPC dispatcher over the tool catalog
    pub dispatcher: Dispatcher,
    /// Bearer token gate
    pub auth: AuthGate,
}

/// Error body for requests rejected before dispatch
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Always "2.0"
    pub jsonrpc: &'static str,
    /// Error details
    pub error: ErrorBody,
}

/// Code and message of a rejection
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Error code
    pub code: i32,
    /// Error message
    pub message: String,
}

fn error_response(status: StatusCode, code: i32, message: impl Into<String>) -> Response {
    let body = Json(ErrorResponse {
        jsonrpc: JSONRPC_VERSION,
        error: ErrorBody {
            code,
            message: message.into(),
        },
    });
    (status, body).into_response()
}

impl IntoResponse for AuthOutcome {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = error_response(status, self.error_code(), self.message());
        if self == AuthOutcome::Unauthenticated {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                header::HeaderValue::from_static("Bearer"),
            );
        }
        response
    }
}

/// Convert a dispatcher reply into an HTTP response
pub fn reply_response(reply: Reply) -> Response {
    let status =
        StatusCode::from_u16(reply.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    match reply.body() {
        Ok(Some(body)) => (status, Json(body)).into_response(),
        Ok(None) => status.into_response(),
        Err(e) => {
            error!("Failed to serialize MCP reply: {}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                INTERNAL_ERROR_CODE,
                "Internal error",
            )
        }
    }
}

/// POST {prefix}/mcp - Authenticate and dispatch one JSON-RPC request
async fn handle_mcp(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    let authorization = headers.get(header::AUTHORIZATION).cloned();

    // Token lookup and tool handlers hit SQLite synchronously
    let task = tokio::task::spawn_blocking(move || {
        match state.auth.check(authorization.as_ref()) {
            AuthOutcome::Authenticated => reply_response(state.dispatcher.handle_body(&body)),
            rejected => rejected.into_response(),
        }
    });

    match task.await {
        Ok(response) => response,
        Err(e) => {
            error!("MCP request task failed: {}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                INTERNAL_ERROR_CODE,
                "Internal error",
            )
        }
    }
}

/// GET {prefix}/mcp - Streaming is not offered
async fn method_not_allowed() -> Response {
    error_response(
        StatusCode::METHOD_NOT_ALLOWED,
        METHOD_NOT_ALLOWED_CODE,
        "Method not allowed. Use POST for MCP requests.",
    )
}

/// Create the axum router with the MCP route mounted at `endpoint`
pub fn create_router(state: AppState, endpoint: &str) -> AxumRouter {
    AxumRouter::new()
        .route(endpoint, post(handle_mcp).get(method_not_allowed))
        .with_state(state)
}
