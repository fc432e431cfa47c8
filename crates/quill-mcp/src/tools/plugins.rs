//! Plugin tool - list installed extensions

use crate::catalog::{InputSchema, Tool};
use crate::invoker::{Arguments, ToolError, ToolOutput};
use quill_domain::{ContentRepository, Plugin};
use serde::Serialize;

/// Installed plugin as reported to clients
#[derive(Debug, Serialize)]
pub struct PluginInfo {
    /// Display name
    pub name: String,
    /// Installed version
    pub version: String,
    /// Whether the plugin is active
    pub active: bool,
    /// Install path
    pub path: String,
}

impl From<Plugin> for PluginInfo {
    fn from(plugin: Plugin) -> Self {
        Self {
            name: plugin.name,
            version: plugin.version,
            active: plugin.active,
            path: plugin.path,
        }
    }
}

/// `list_plugins` tool definition
pub fn tool() -> Tool {
    Tool::new(
        "list_plugins",
        "List installed plugins with name, status, version.",
        InputSchema::new(),
        handle_list_plugins,
    )
}

fn handle_list_plugins(
    repository: &dyn ContentRepository,
    _arguments: Arguments,
) -> Result<ToolOutput, ToolError> {
    let plugins: Vec<PluginInfo> = repository
        .list_plugins()?
        .into_iter()
        .map(PluginInfo::from)
        .collect();
    ToolOutput::json(&plugins)
}
