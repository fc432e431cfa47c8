//! Quill Storage Layer
//!
//! Implements the `ContentRepository` and `OptionStore` traits on top of SQLite,
//! and owns the bearer token used to authenticate MCP clients.
//!
//! # Architecture
//!
//! - SQLite for posts, options, users and installed plugins
//! - One connection guarded by a mutex; every trait call is a short critical section
//! - [`secret::SecretProvider`] persists the bearer token in the options table
//!
//! # Examples
//!
//! ```no_run
//! use quill_store::SqliteStore;
//!
//! let store = SqliteStore::new(":memory:").unwrap();
//! // Store is now ready for content operations
//! ```

#![warn(missing_docs)]

pub mod secret;

pub use secret::{AdminGrant, GrantError, SecretProvider};

use quill_domain::{
    ActorId, ContentRepository, NewPost, OptionStore, Plugin, Post, PostId, PostQuery,
    PostStatus, PostUpdate, RepositoryError, Role, SiteInfo, StatusFilter,
};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;
use tracing::debug;

/// Option holding the site title
pub const OPTION_SITE_NAME: &str = "blogname";
/// Option holding the site tagline
pub const OPTION_SITE_DESCRIPTION: &str = "blogdescription";
/// Option holding the public home URL
pub const OPTION_HOME: &str = "home";

const POST_COLUMNS: &str =
    "id, title, content, excerpt, status, post_type, author_id, created_at";

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Record not found
    #[error("{0}")]
    NotFound(String),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A previous holder of the connection panicked
    #[error("Database connection poisoned")]
    Poisoned,
}

impl From<StoreError> for RepositoryError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(msg) => RepositoryError::NotFound(msg),
            StoreError::Database(rusqlite::Error::SqliteFailure(code, msg))
                if code.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                RepositoryError::Rejected(msg.unwrap_or_else(|| "Constraint violation".to_string()))
            }
            other => RepositoryError::Unavailable(other.to_string()),
        }
    }
}

/// SQLite-based implementation of the content backend
///
/// # Thread Safety
///
/// The connection sits behind a mutex so a single store can be shared by
/// concurrent request handlers through an `Arc`.
pub struct SqliteStore {
    conn: Mutex<Connection>,
    actor: Option<ActorId>,
}

impl SqliteStore {
    /// Create a new SqliteStore with the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(include_str!("schema.sql"))?;
        Ok(Self {
            conn: Mutex::new(conn),
            actor: None,
        })
    }

    /// Set the identity reported by [`ContentRepository::current_actor`]
    pub fn with_current_actor(mut self, actor: Option<ActorId>) -> Self {
        self.actor = actor;
        self
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    /// Create a user account
    pub fn add_user(&self, login: &str, role: Role) -> Result<ActorId, StoreError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO users (login, role) VALUES (?1, ?2)",
            params![login, role.as_str()],
        )?;
        Ok(ActorId::new(conn.last_insert_rowid()))
    }

    /// Register an installed plugin, replacing any entry with the same path
    pub fn install_plugin(&self, plugin: &Plugin) -> Result<(), StoreError> {
        self.conn()?.execute(
            "INSERT INTO extensions (path, name, version, active) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(path) DO UPDATE SET
             name = excluded.name, version = excluded.version, active = excluded.active",
            params![&plugin.path, &plugin.name, &plugin.version, plugin.active],
        )?;
        Ok(())
    }

    /// Set an option only if it has no value yet
    ///
    /// Returns `true` when the value was written.
    pub fn seed_option(&self, name: &str, value: &str) -> Result<bool, StoreError> {
        let inserted = self.conn()?.execute(
            "INSERT OR IGNORE INTO options (name, value) VALUES (?1, ?2)",
            params![name, value],
        )?;
        Ok(inserted > 0)
    }

    fn read_option(conn: &Connection, name: &str) -> Result<Option<String>, StoreError> {
        let value = conn
            .query_row(
                "SELECT value FROM options WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn home_url(conn: &Connection) -> Result<String, StoreError> {
        Ok(Self::read_option(conn, OPTION_HOME)?
            .map(|home| home.trim_end_matches('/').to_string())
            .unwrap_or_default())
    }

    /// Public URL of a record
    fn permalink(home: &str, post_type: &str, id: i64) -> String {
        match post_type {
            "page" => format!("{}/?page_id={}", home, id),
            _ => format!("{}/?p={}", home, id),
        }
    }

    fn row_to_post(row: &Row<'_>, home: &str) -> rusqlite::Result<Post> {
        let id: i64 = row.get(0)?;
        let status_str: String = row.get(4)?;
        let status = PostStatus::parse(&status_str).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                4,
                rusqlite::types::Type::Text,
                Box::new(StoreError::InvalidData(format!(
                    "Unknown post status: {}",
                    status_str
                ))),
            )
        })?;
        let post_type: String = row.get(5)?;
        let permalink = Self::permalink(home, &post_type, id);

        Ok(Post {
            id: PostId::from_value(id),
            title: row.get(1)?,
            content: row.get(2)?,
            excerpt: row.get(3)?,
            status,
            post_type,
            author: ActorId::new(row.get(6)?),
            date: row.get(7)?,
            permalink,
        })
    }

    fn fetch_post(conn: &Connection, id: PostId) -> Result<Option<Post>, StoreError> {
        let home = Self::home_url(conn)?;
        let post = conn
            .query_row(
                &format!("SELECT {} FROM posts WHERE id = ?1", POST_COLUMNS),
                params![id.value()],
                |row| Self::row_to_post(row, &home),
            )
            .optional()?;
        Ok(post)
    }

    fn not_found(id: PostId) -> StoreError {
        StoreError::NotFound(format!("Post {} not found", id))
    }
}

impl OptionStore for SqliteStore {
    fn get_option(&self, name: &str) -> Result<Option<String>, RepositoryError> {
        let conn = self.conn()?;
        Ok(Self::read_option(&conn, name)?)
    }

    fn set_option(&self, name: &str, value: &str) -> Result<(), RepositoryError> {
        self.conn()?
            .execute(
                "INSERT INTO options (name, value) VALUES (?1, ?2)
                 ON CONFLICT(name) DO UPDATE SET value = excluded.value",
                params![name, value],
            )
            .map_err(StoreError::from)?;
        Ok(())
    }
}

impl ContentRepository for SqliteStore {
    fn list_posts(&self, query: &PostQuery) -> Result<Vec<Post>, RepositoryError> {
        let conn = self.conn()?;
        let home = Self::home_url(&conn)?;

        let mut sql = format!("SELECT {} FROM posts WHERE post_type = ?", POST_COLUMNS);
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(query.post_type.clone())];

        match query.status {
            StatusFilter::Any => {
                sql.push_str(" AND status != ?");
                params.push(Box::new(PostStatus::Trash.as_str()));
            }
            StatusFilter::Only(status) => {
                sql.push_str(" AND status = ?");
                params.push(Box::new(status.as_str()));
            }
        }

        sql.push_str(" ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?");
        params.push(Box::new(i64::from(query.per_page)));
        params.push(Box::new(query.offset() as i64));

        debug!("Listing posts: {:?}", query);

        let mut stmt = conn.prepare(&sql).map_err(StoreError::from)?;
        let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

        let posts = stmt
            .query_map(&param_refs[..], |row| Self::row_to_post(row, &home))
            .and_then(|rows| rows.collect::<Result<Vec<_>, _>>())
            .map_err(StoreError::from)?;

        Ok(posts)
    }

    fn get_post(&self, id: PostId) -> Result<Option<Post>, RepositoryError> {
        let conn = self.conn()?;
        Ok(Self::fetch_post(&conn, id)?)
    }

    fn create_post(&self, post: NewPost) -> Result<Post, RepositoryError> {
        if post.title.is_empty() {
            return Err(RepositoryError::Rejected("Title required".to_string()));
        }

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO posts (title, content, status, post_type, author_id)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                &post.title,
                &post.content,
                post.status.as_str(),
                &post.post_type,
                post.author.value(),
            ],
        )
        .map_err(StoreError::from)?;

        let id = PostId::from_value(conn.last_insert_rowid());
        debug!("Created post {}", id);

        Ok(Self::fetch_post(&conn, id)?.ok_or_else(|| Self::not_found(id))?)
    }

    fn update_post(&self, update: PostUpdate) -> Result<Post, RepositoryError> {
        let conn = self.conn()?;

        if !update.is_empty() {
            let mut assignments = Vec::new();
            let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

            if let Some(title) = &update.title {
                assignments.push("title = ?");
                params.push(Box::new(title.clone()));
            }
            if let Some(content) = &update.content {
                assignments.push("content = ?");
                params.push(Box::new(content.clone()));
            }
            if let Some(status) = update.status {
                assignments.push("status = ?");
                params.push(Box::new(status.as_str()));
            }
            params.push(Box::new(update.id.value()));

            let sql = format!("UPDATE posts SET {} WHERE id = ?", assignments.join(", "));
            let param_refs: Vec<&dyn rusqlite::ToSql> =
                params.iter().map(|p| p.as_ref()).collect();

            let changed = conn
                .execute(&sql, &param_refs[..])
                .map_err(StoreError::from)?;
            if changed == 0 {
                return Err(Self::not_found(update.id).into());
            }
            debug!("Updated post {} ({} field(s))", update.id, assignments.len());
        }

        Ok(Self::fetch_post(&conn, update.id)?.ok_or_else(|| Self::not_found(update.id))?)
    }

    fn list_plugins(&self) -> Result<Vec<Plugin>, RepositoryError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare("SELECT path, name, version, active FROM extensions ORDER BY name, path")
            .map_err(StoreError::from)?;

        let plugins = stmt
            .query_map([], |row| {
                Ok(Plugin {
                    path: row.get(0)?,
                    name: row.get(1)?,
                    version: row.get(2)?,
                    active: row.get(3)?,
                })
            })
            .and_then(|rows| rows.collect::<Result<Vec<_>, _>>())
            .map_err(StoreError::from)?;

        Ok(plugins)
    }

    fn site_info(&self) -> Result<SiteInfo, RepositoryError> {
        let conn = self.conn()?;
        Ok(SiteInfo {
            name: Self::read_option(&conn, OPTION_SITE_NAME)?.unwrap_or_default(),
            description: Self::read_option(&conn, OPTION_SITE_DESCRIPTION)?.unwrap_or_default(),
            url: Self::home_url(&conn)?,
            version: env!("CARGO_PKG_VERSION").to_string(),
        })
    }

    fn current_actor(&self) -> Option<ActorId> {
        self.actor
    }

    fn find_administrator(&self) -> Result<Option<ActorId>, RepositoryError> {
        let conn = self.conn()?;
        let id: Option<i64> = conn
            .query_row(
                "SELECT id FROM users WHERE role = ?1 ORDER BY id LIMIT 1",
                params![Role::Administrator.as_str()],
                |row| row.get(0),
            )
            .optional()
            .map_err(StoreError::from)?;
        Ok(id.map(ActorId::new))
    }

    fn role_of(&self, actor: ActorId) -> Result<Option<Role>, RepositoryError> {
        let conn = self.conn()?;
        let role: Option<String> = conn
            .query_row(
                "SELECT role FROM users WHERE id = ?1",
                params![actor.value()],
                |row| row.get(0),
            )
            .optional()
            .map_err(StoreError::from)?;

        match role {
            None => Ok(None),
            Some(name) => Role::parse(&name)
                .map(Some)
                .ok_or_else(|| StoreError::InvalidData(format!("Unknown role: {}", name)).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permalink_by_type() {
        assert_eq!(SqliteStore::permalink("https://example.org", "post", 5), "https://example.org/?p=5");
        assert_eq!(
            SqliteStore::permalink("https://example.org", "page", 9),
            "https://example.org/?page_id=9"
        );
    }

    #[test]
    fn test_home_url_trailing_slash_trimmed() {
        let store = SqliteStore::new(":memory:").unwrap();
        store.set_option(OPTION_HOME, "https://example.org/").unwrap();
        let conn = store.conn().unwrap();
        assert_eq!(SqliteStore::home_url(&conn).unwrap(), "https://example.org");
    }

    #[test]
    fn test_seed_option_does_not_overwrite() {
        let store = SqliteStore::new(":memory:").unwrap();
        assert!(store.seed_option(OPTION_SITE_NAME, "First").unwrap());
        assert!(!store.seed_option(OPTION_SITE_NAME, "Second").unwrap());
        assert_eq!(
            store.get_option(OPTION_SITE_NAME).unwrap(),
            Some("First".to_string())
        );
    }

    #[test]
    fn test_not_found_maps_to_repository_not_found() {
        let err: RepositoryError = SqliteStore::not_found(PostId::from_value(4)).into();
        assert_eq!(err, RepositoryError::NotFound("Post 4 not found".to_string()));
    }
}
