//! Quill Domain Layer
//!
//! Core content model exposed to AI clients through the MCP endpoint.
//! It has ZERO external dependencies and defines the records, value objects
//! and collaborator traits that the storage and protocol layers depend upon.
//!
//! ## Key Concepts
//!
//! - **Post**: A content record (post, page or custom type) with a lifecycle status
//! - **Option**: A named configuration value kept by the content backend
//! - **Plugin**: An installed extension, active or inactive
//! - **Site metadata**: Name, tagline, public URL and software version
//! - **Actor**: A user identity used as post author
//!
//! ## Architecture
//!
//! - No external crate dependencies
//! - Trait definitions for every interaction with the content backend
//! - Infrastructure implementations live in other crates

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod post;
pub mod site;
pub mod traits;

// Re-exports for convenience
pub use error::RepositoryError;
pub use post::{NewPost, Post, PostId, PostQuery, PostStatus, PostUpdate, StatusFilter};
pub use site::{ActorId, Plugin, Role, SiteInfo};
pub use traits::{ContentRepository, OptionStore};
