//! JSON-RPC dispatcher
//!
//! Routes one request body to a protocol operation and produces a [`Reply`].
//! The dispatcher never fails: every outcome, including malformed input, is a
//! reply value the transport can map to a status code.

use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use crate::error::McpError;
use crate::invoker::ToolInvoker;
use crate::protocol::{
    Capabilities, InitializeResult, JsonRpcError, JsonRpcRequest, JsonRpcResponse, ServerInfo,
    ToolsCapability, DEFAULT_PROTOCOL_VERSION,
};

const INITIALIZED_NOTIFICATION: &str = "notifications/initialized";

/// Outcome of dispatching one request body
#[derive(Debug)]
pub enum Reply {
    /// Successful response
    Result(JsonRpcResponse),
    /// Protocol-level error
    Error(JsonRpcError),
    /// Notification acknowledged, no body
    Accepted,
}

impl Reply {
    /// HTTP status code for this reply
    pub fn status_code(&self) -> u16 {
        match self {
            Reply::Result(_) => 200,
            Reply::Error(_) => 400,
            Reply::Accepted => 202,
        }
    }

    /// Response body, `None` for an accepted notification
    pub fn body(&self) -> Result<Option<Value>, McpError> {
        let body = match self {
            Reply::Result(response) => Some(serde_json::to_value(response)?),
            Reply::Error(error) => Some(serde_json::to_value(error)?),
            Reply::Accepted => None,
        };
        Ok(body)
    }

    fn failure(id: Option<Value>, error: McpError) -> Self {
        Reply::Error(JsonRpcError::new(id, error.error_code(), error.to_string()))
    }
}

/// MCP request dispatcher
///
/// Holds the tool invoker and the identity reported in the handshake. Cheap
/// to clone; the catalog and repository are shared.
#[derive(Clone)]
pub struct Dispatcher {
    invoker: ToolInvoker,
    server_info: ServerInfo,
}

impl Dispatcher {
    /// Create a dispatcher over `invoker`
    pub fn new(invoker: ToolInvoker) -> Self {
        Self {
            invoker,
            server_info: ServerInfo::default(),
        }
    }

    /// Override the name and version reported by `initialize`
    pub fn with_server_info(mut self, server_info: ServerInfo) -> Self {
        self.server_info = server_info;
        self
    }

    /// Dispatch a raw request body
    pub fn handle_body(&self, body: &[u8]) -> Reply {
        let value: Value = match serde_json::from_slice(body) {
            Ok(value) => value,
            Err(e) => {
                debug!("Rejecting unparseable body: {}", e);
                return Reply::failure(None, McpError::Parse);
            }
        };
        self.handle_value(value)
    }

    /// Dispatch an already-parsed request value
    pub fn handle_value(&self, value: Value) -> Reply {
        if !value.is_object() {
            return Reply::failure(
                None,
                McpError::InvalidRequest("expected a request object".to_string()),
            );
        }

        let request: JsonRpcRequest = match serde_json::from_value(value) {
            Ok(request) => request,
            Err(e) => {
                return Reply::failure(None, McpError::InvalidRequest(e.to_string()));
            }
        };

        let notification = request.is_notification()
            || request.method.as_deref() == Some(INITIALIZED_NOTIFICATION);

        let reply = self.handle_request(request);
        if notification {
            if let Reply::Error(ref error) = reply {
                debug!("Dropping error for notification: {}", error.error.message);
            }
            return Reply::Accepted;
        }
        reply
    }

    fn handle_request(&self, request: JsonRpcRequest) -> Reply {
        let id = request.id.clone();

        let Some(method) = request.method.as_deref() else {
            return Reply::failure(id, McpError::InvalidRequest("missing method".to_string()));
        };

        let params = match request.params {
            Value::Null => Map::new(),
            Value::Object(map) => map,
            _ => {
                return Reply::failure(
                    id,
                    McpError::InvalidParams("params must be an object".to_string()),
                );
            }
        };

        debug!("Dispatching {}", method);

        let result = match method {
            "initialize" => self.handle_initialize(&params),
            "tools/list" => self.handle_tools_list(),
            "tools/call" => self.handle_tools_call(params),
            "ping" => Ok(json!({})),
            INITIALIZED_NOTIFICATION => Ok(Value::Null),
            other => Err(McpError::MethodNotFound(other.to_string())),
        };

        match result {
            Ok(result) => Reply::Result(JsonRpcResponse::new(id.unwrap_or(Value::Null), result)),
            Err(e) => {
                warn!("Request {} failed: {}", method, e);
                Reply::failure(id, e)
            }
        }
    }

    fn handle_initialize(&self, params: &Map<String, Value>) -> Result<Value, McpError> {
        let protocol_version = params
            .get("protocolVersion")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_PROTOCOL_VERSION)
            .to_string();

        let result = InitializeResult {
            protocol_version,
            capabilities: Capabilities {
                tools: ToolsCapability {
                    list_changed: false,
                },
            },
            server_info: self.server_info.clone(),
        };
        Ok(serde_json::to_value(result)?)
    }

    fn handle_tools_list(&self) -> Result<Value, McpError> {
        let tools = self.invoker.catalog().descriptors();
        Ok(json!({ "tools": serde_json::to_value(tools)? }))
    }

    fn handle_tools_call(&self, mut params: Map<String, Value>) -> Result<Value, McpError> {
        let name = match params.get("name") {
            Some(Value::String(name)) => name.clone(),
            _ => String::new(),
        };

        let arguments = match params.remove("arguments") {
            None | Some(Value::Null) => Map::new(),
            Some(Value::Object(arguments)) => arguments,
            Some(_) => {
                return Err(McpError::InvalidParams(
                    "arguments must be an object".to_string(),
                ))
            }
        };

        let result = self.invoker.invoke(&name, arguments)?;
        Ok(serde_json::to_value(result)?)
    }
}
