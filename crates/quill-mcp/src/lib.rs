//! Quill MCP Core
//!
//! Model Context Protocol dispatch layer for exposing a content backend to
//! AI clients (Cursor, Claude Desktop, etc.) over JSON-RPC 2.0.
//!
//! Provides 7 MCP tools:
//! - `list_posts` - List posts filtered by type and status, paginated
//! - `get_post` - Fetch one post by ID
//! - `create_post` - Create a post (draft by default)
//! - `update_post` - Partially update an existing post
//! - `get_option` - Read a named configuration value
//! - `list_plugins` - List installed plugins with their active flag
//! - `site_info` - Site name, tagline, URL and version
//!
//! The crate is transport-neutral: [`Dispatcher::handle_body`] turns a raw
//! request body into a [`Reply`], and the HTTP binding maps that to a status
//! code and response body.
//!
//! # Example
//!
//! ```no_run
//! use quill_mcp::{Dispatcher, ToolCatalog, ToolInvoker};
//! use quill_store::SqliteStore;
//! use std::sync::Arc;
//!
//! let store = Arc::new(SqliteStore::new(":memory:").unwrap());
//! let invoker = ToolInvoker::new(Arc::new(ToolCatalog::standard()), store);
//! let dispatcher = Dispatcher::new(invoker);
//!
//! let reply = dispatcher.handle_body(br#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#);
//! assert_eq!(reply.status_code(), 200);
//! ```

#![warn(missing_docs)]

pub mod catalog;
pub mod dispatcher;
mod error;
pub mod invoker;
pub mod protocol;
pub mod tools;

pub use catalog::{InputSchema, PropertySchema, PropertyType, Tool, ToolCatalog, ToolDescriptor};
pub use dispatcher::{Dispatcher, Reply};
pub use error::McpError;
pub use invoker::{Arguments, ToolError, ToolInvoker, ToolOutput};
pub use protocol::ToolCallResult;
