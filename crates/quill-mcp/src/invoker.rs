//! Tool invocation
//!
//! Resolves a tool by name, prepares its arguments, runs the handler and folds
//! every handler outcome into a [`ToolCallResult`]. Nothing a handler does,
//! including panicking, escapes this boundary as an error.

use crate::catalog::ToolCatalog;
use crate::error::McpError;
use crate::protocol::ToolCallResult;
use quill_domain::{ContentRepository, RepositoryError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error};

/// Arguments after schema validation and defaulting
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments(Map<String, Value>);

impl Arguments {
    /// Wrap prepared arguments
    pub fn new(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Look up one argument
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Deserialize into a typed parameter struct
    pub fn parse<T: DeserializeOwned>(self) -> Result<T, ToolError> {
        serde_json::from_value(Value::Object(self.0))
            .map_err(|e| ToolError::Invalid(format!("Invalid arguments: {}", e)))
    }
}

/// Successful tool output
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutput {
    /// Used verbatim as the result text
    Text(String),
    /// Rendered as pretty-printed JSON
    Json(Value),
}

impl ToolOutput {
    /// Serialize a structured value
    pub fn json<T: Serialize>(value: &T) -> Result<Self, ToolError> {
        Ok(ToolOutput::Json(serde_json::to_value(value)?))
    }

    /// Text placed in the result content block
    pub fn render(&self) -> Result<String, serde_json::Error> {
        match self {
            ToolOutput::Text(text) => Ok(text.clone()),
            ToolOutput::Json(value) => serde_json::to_string_pretty(value),
        }
    }
}

/// Expected failure of a tool
///
/// Reported to the client inside a successful RPC result with `isError: true`.
#[derive(Error, Debug)]
pub enum ToolError {
    /// Argument validation failed
    #[error("{0}")]
    Invalid(String),

    /// The addressed record does not exist
    #[error("{0}")]
    NotFound(String),

    /// The content backend failed or refused
    #[error("{0}")]
    Repository(#[from] RepositoryError),

    /// Output could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Resolves and executes tools against the content backend
#[derive(Clone)]
pub struct ToolInvoker {
    catalog: Arc<ToolCatalog>,
    repository: Arc<dyn ContentRepository>,
}

impl ToolInvoker {
    /// Create an invoker over a catalog and a backend
    pub fn new(catalog: Arc<ToolCatalog>, repository: Arc<dyn ContentRepository>) -> Self {
        Self {
            catalog,
            repository,
        }
    }

    /// Catalog this invoker resolves names against
    pub fn catalog(&self) -> &ToolCatalog {
        &self.catalog
    }

    /// Invoke a tool by name
    ///
    /// Returns `Err` only when `name` does not resolve; every other outcome is
    /// a [`ToolCallResult`].
    pub fn invoke(
        &self,
        name: &str,
        arguments: Map<String, Value>,
    ) -> Result<ToolCallResult, McpError> {
        let tool = self
            .catalog
            .find(name)
            .ok_or_else(|| McpError::UnknownTool(name.to_string()))?;

        let repository = self.repository.as_ref();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            let output = tool.call(repository, arguments)?;
            Ok::<_, ToolError>(output.render()?)
        }));

        let result = match outcome {
            Ok(Ok(text)) => {
                debug!("Tool {} succeeded", name);
                ToolCallResult::success(text)
            }
            Ok(Err(e)) => {
                debug!("Tool {} failed: {}", name, e);
                ToolCallResult::failure(e.to_string())
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                error!("Tool {} panicked: {}", name, message);
                ToolCallResult::failure(message)
            }
        };

        Ok(result)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "Tool handler panicked".to_string()
    }
}
