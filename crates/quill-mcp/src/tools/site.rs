//! Site tool - site metadata

use crate::catalog::{InputSchema, Tool};
use crate::invoker::{Arguments, ToolError, ToolOutput};
use quill_domain::{ContentRepository, SiteInfo};
use serde::Serialize;

/// Site metadata as reported to clients
#[derive(Debug, Serialize)]
pub struct SiteInfoView {
    /// Site title
    pub name: String,
    /// Tagline
    pub description: String,
    /// Home URL
    pub url: String,
    /// Software version
    pub version: String,
}

impl From<SiteInfo> for SiteInfoView {
    fn from(info: SiteInfo) -> Self {
        Self {
            name: info.name,
            description: info.description,
            url: info.url,
            version: info.version,
        }
    }
}

/// `site_info` tool definition
pub fn tool() -> Tool {
    Tool::new(
        "site_info",
        "Get site URL, name, description and software version.",
        InputSchema::new(),
        handle_site_info,
    )
}

fn handle_site_info(
    repository: &dyn ContentRepository,
    _arguments: Arguments,
) -> Result<ToolOutput, ToolError> {
    ToolOutput::json(&SiteInfoView::from(repository.site_info()?))
}
