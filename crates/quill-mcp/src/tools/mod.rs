//! MCP tool implementations

pub mod options;
pub mod plugins;
pub mod posts;
pub mod site;

use crate::catalog::Tool;

/// All content tools in advertised order
pub fn standard_tools() -> Vec<Tool> {
    vec![
        posts::list_posts_tool(),
        posts::get_post_tool(),
        posts::create_post_tool(),
        posts::update_post_tool(),
        options::tool(),
        plugins::tool(),
        site::tool(),
    ]
}
