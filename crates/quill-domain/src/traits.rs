//! Trait definitions for the content backend
//!
//! These traits define the boundary between the MCP layer and storage.
//! Implementations live in other crates (quill-store).

use crate::{
    ActorId, NewPost, Plugin, Post, PostId, PostQuery, PostUpdate, RepositoryError, Role, SiteInfo,
};

/// Named configuration values
///
/// Implemented by the infrastructure layer (quill-store). Also used as the
/// durable slot for the bearer token.
pub trait OptionStore: Send + Sync {
    /// Read an option; `None` when it has never been set
    fn get_option(&self, name: &str) -> Result<Option<String>, RepositoryError>;

    /// Create or overwrite an option
    fn set_option(&self, name: &str, value: &str) -> Result<(), RepositoryError>;
}

/// Content operations consumed by MCP tools
///
/// Implemented by the infrastructure layer (quill-store).
pub trait ContentRepository: OptionStore {
    /// List posts matching the query, newest first
    fn list_posts(&self, query: &PostQuery) -> Result<Vec<Post>, RepositoryError>;

    /// Get a post by ID
    fn get_post(&self, id: PostId) -> Result<Option<Post>, RepositoryError>;

    /// Create a post and return the stored record
    fn create_post(&self, post: NewPost) -> Result<Post, RepositoryError>;

    /// Apply a partial update and return the stored record
    ///
    /// Fails with [`RepositoryError::NotFound`] when the post does not exist.
    fn update_post(&self, update: PostUpdate) -> Result<Post, RepositoryError>;

    /// List installed plugins
    fn list_plugins(&self) -> Result<Vec<Plugin>, RepositoryError>;

    /// Get site metadata
    fn site_info(&self) -> Result<SiteInfo, RepositoryError>;

    /// Identity acting on behalf of the current request, if any
    fn current_actor(&self) -> Option<ActorId>;

    /// Some account holding the administrator role, if any
    fn find_administrator(&self) -> Result<Option<ActorId>, RepositoryError>;

    /// Role of an account, `None` when the account does not exist
    fn role_of(&self, actor: ActorId) -> Result<Option<Role>, RepositoryError>;
}
