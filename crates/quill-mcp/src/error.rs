//! Error types for MCP dispatch.
//!
//! These are protocol-level failures and always surface as a JSON-RPC
//! `error` object. Failures inside a tool never use this type; see
//! [`crate::ToolError`].

use thiserror::Error;

/// JSON-RPC: invalid JSON was received
pub const PARSE_ERROR: i32 = -32700;
/// JSON-RPC: the JSON sent is not a valid request object
pub const INVALID_REQUEST: i32 = -32600;
/// JSON-RPC: the method does not exist
pub const METHOD_NOT_FOUND: i32 = -32601;
/// JSON-RPC: invalid method parameters
pub const INVALID_PARAMS: i32 = -32602;
/// JSON-RPC: internal error
pub const INTERNAL_ERROR: i32 = -32603;

/// MCP dispatch error types
#[derive(Error, Debug)]
pub enum McpError {
    /// Body is not valid JSON
    #[error("Parse error: invalid JSON")]
    Parse,

    /// Body is JSON but not a request object
    #[error("Invalid Request: {0}")]
    InvalidRequest(String),

    /// Method is not part of the protocol surface
    #[error("Unknown method: {0}")]
    MethodNotFound(String),

    /// Tool name does not resolve in the catalog
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Malformed method parameters
    #[error("Invalid params: {0}")]
    InvalidParams(String),

    /// Catalog construction with a repeated tool name
    #[error("Duplicate tool name: {0}")]
    DuplicateTool(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl McpError {
    /// Convert to JSON-RPC error code
    pub fn error_code(&self) -> i32 {
        match self {
            McpError::Parse => PARSE_ERROR,
            McpError::InvalidRequest(_) => INVALID_REQUEST,
            McpError::MethodNotFound(_) => METHOD_NOT_FOUND,
            McpError::UnknownTool(_) | McpError::InvalidParams(_) => INVALID_PARAMS,
            McpError::DuplicateTool(_) | McpError::Json(_) => INTERNAL_ERROR,
        }
    }
}
