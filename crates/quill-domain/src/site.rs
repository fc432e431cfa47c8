//! Site-level records: actors, installed plugins and site metadata

use std::fmt;

/// Identity of a user account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActorId(i64);

impl ActorId {
    /// Account used as author when neither a current actor nor an administrator exists
    pub const FALLBACK: ActorId = ActorId(1);

    /// Wrap a raw identifier
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Get the raw value
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Full control, including managing options and credentials
    Administrator,
    /// Publishes and manages posts of others
    Editor,
    /// Publishes own posts
    Author,
    /// Writes drafts only
    Contributor,
    /// Read-only
    Subscriber,
}

impl Role {
    /// Get the role name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Administrator => "administrator",
            Role::Editor => "editor",
            Role::Author => "author",
            Role::Contributor => "contributor",
            Role::Subscriber => "subscriber",
        }
    }

    /// Parse a role from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "administrator" => Some(Role::Administrator),
            "editor" => Some(Role::Editor),
            "author" => Some(Role::Author),
            "contributor" => Some(Role::Contributor),
            "subscriber" => Some(Role::Subscriber),
            _ => None,
        }
    }

    /// Whether this role may manage site options and credentials
    pub fn can_manage_options(&self) -> bool {
        matches!(self, Role::Administrator)
    }
}

/// An installed extension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plugin {
    /// Install path, unique per plugin (e.g. `akismet/akismet.php`)
    pub path: String,
    /// Display name
    pub name: String,
    /// Installed version
    pub version: String,
    /// Whether the plugin is currently active
    pub active: bool,
}

/// Site metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteInfo {
    /// Site title
    pub name: String,
    /// Tagline
    pub description: String,
    /// Public home URL
    pub url: String,
    /// Version of the content software
    pub version: String,
}
