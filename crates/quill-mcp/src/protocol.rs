//! MCP protocol types (JSON-RPC 2.0)

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// JSON-RPC version tag carried by every response
pub const JSONRPC_VERSION: &str = "2.0";

/// Protocol version answered when the client does not request one
pub const DEFAULT_PROTOCOL_VERSION: &str = "2024-11-05";

/// Name reported in the initialize handshake
pub const SERVER_NAME: &str = "quill-mcp";

/// JSON-RPC request
#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    /// JSON-RPC version (not enforced)
    #[serde(default)]
    pub jsonrpc: Option<String>,
    /// Request ID; only an absent key marks a notification, `null` is kept
    #[serde(default, deserialize_with = "present")]
    pub id: Option<Value>,
    /// Method name
    #[serde(default)]
    pub method: Option<String>,
    /// Method parameters
    #[serde(default)]
    pub params: Value,
}

fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

impl JsonRpcRequest {
    /// Whether the caller expects no response body
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

/// JSON-RPC response (success)
#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    /// JSON-RPC version (must be "2.0")
    pub jsonrpc: &'static str,
    /// Request ID
    pub id: Value,
    /// Result data
    pub result: Value,
}

/// JSON-RPC error response
#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    /// JSON-RPC version (must be "2.0")
    pub jsonrpc: &'static str,
    /// Request ID, omitted when the request could not be read
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    /// Error details
    pub error: ErrorDetail,
}

/// Error detail structure
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    /// Error code
    pub code: i32,
    /// Error message
    pub message: String,
}

impl JsonRpcResponse {
    /// Create a new success response
    pub fn new(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            result,
        }
    }
}

impl JsonRpcError {
    /// Create a new error response
    pub fn new(id: Option<Value>, code: i32, message: String) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            error: ErrorDetail { code, message },
        }
    }
}

/// MCP server info
#[derive(Debug, Clone, Serialize)]
pub struct ServerInfo {
    /// Server name
    pub name: String,
    /// Server version
    pub version: String,
}

impl Default for ServerInfo {
    fn default() -> Self {
        Self {
            name: SERVER_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Initialize response
#[derive(Debug, Serialize)]
pub struct InitializeResult {
    /// Protocol version
    #[serde(rename = "protocolVersion")]
    pub protocol_version: String,
    /// Capabilities
    pub capabilities: Capabilities,
    /// Server info
    #[serde(rename = "serverInfo")]
    pub server_info: ServerInfo,
}

/// Server capabilities
#[derive(Debug, Serialize)]
pub struct Capabilities {
    /// Tools capability
    pub tools: ToolsCapability,
}

/// Tools capability
#[derive(Debug, Serialize)]
pub struct ToolsCapability {
    /// Whether the server emits tool list change notifications
    #[serde(rename = "listChanged")]
    pub list_changed: bool,
}

/// One block of tool output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    /// Plain text
    Text {
        /// The text
        text: String,
    },
}

/// Normalized outcome of a `tools/call`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallResult {
    /// Output blocks
    pub content: Vec<ContentBlock>,
    /// Whether the tool failed
    #[serde(rename = "isError")]
    pub is_error: bool,
}

impl ToolCallResult {
    /// Successful result carrying `text`
    pub fn success(text: String) -> Self {
        Self {
            content: vec![ContentBlock::Text { text }],
            is_error: false,
        }
    }

    /// Failed result carrying the failure message
    pub fn failure(message: String) -> Self {
        Self {
            content: vec![ContentBlock::Text { text: message }],
            is_error: true,
        }
    }

    /// Text of the first block
    pub fn text(&self) -> &str {
        match self.content.first() {
            Some(ContentBlock::Text { text }) => text,
            None => "",
        }
    }
}
