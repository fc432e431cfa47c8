//! Option tool - read a named configuration value

use crate::catalog::{InputSchema, PropertySchema, Tool};
use crate::invoker::{Arguments, ToolError, ToolOutput};
use quill_domain::ContentRepository;
use serde::{Deserialize, Serialize};

/// Parameters for reading an option
#[derive(Debug, Deserialize)]
pub struct GetOptionParams {
    /// Option name
    pub option: String,
}

/// Option name and its current value (`null` when unset)
#[derive(Debug, Serialize)]
pub struct OptionValue {
    /// Option name
    pub option: String,
    /// Stored value
    pub value: Option<String>,
}

/// `get_option` tool definition
pub fn tool() -> Tool {
    Tool::new(
        "get_option",
        "Get a site option value.",
        InputSchema::new().required("option", PropertySchema::string().describe("Option name")),
        handle_get_option,
    )
}

fn handle_get_option(
    repository: &dyn ContentRepository,
    arguments: Arguments,
) -> Result<ToolOutput, ToolError> {
    let params: GetOptionParams = arguments.parse()?;
    if params.option.is_empty() {
        return Err(ToolError::Invalid("Option name required".to_string()));
    }

    let value = repository.get_option(&params.option)?;
    ToolOutput::json(&OptionValue {
        option: params.option,
        value,
    })
}
