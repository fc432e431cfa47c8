//! Post module - content records and the filters used to list them

use crate::site::ActorId;
use std::fmt;

/// Numeric identifier of a post, assigned by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PostId(i64);

impl PostId {
    /// Wrap a raw identifier
    ///
    /// Returns `None` for zero and negative values, which never address a record.
    ///
    /// # Examples
    ///
    /// ```
    /// use quill_domain::PostId;
    ///
    /// assert!(PostId::new(42).is_some());
    /// assert!(PostId::new(0).is_none());
    /// ```
    pub fn new(value: i64) -> Option<Self> {
        (value > 0).then_some(Self(value))
    }

    /// Create a PostId from a stored value without validation
    ///
    /// This is primarily for storage layer deserialization.
    pub fn from_value(value: i64) -> Self {
        Self(value)
    }

    /// Get the raw value
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Publication status of a post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostStatus {
    /// Work in progress, not visible to readers
    Draft,

    /// Awaiting review
    Pending,

    /// Visible only to logged-in editors
    Private,

    /// Publicly visible
    Publish,

    /// Scheduled for later publication
    Future,

    /// Moved to the trash
    Trash,
}

impl PostStatus {
    /// Every status, in declaration order
    pub const ALL: [PostStatus; 6] = [
        PostStatus::Draft,
        PostStatus::Pending,
        PostStatus::Private,
        PostStatus::Publish,
        PostStatus::Future,
        PostStatus::Trash,
    ];

    /// Get the status name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Pending => "pending",
            PostStatus::Private => "private",
            PostStatus::Publish => "publish",
            PostStatus::Future => "future",
            PostStatus::Trash => "trash",
        }
    }

    /// Parse a status from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Some(PostStatus::Draft),
            "pending" => Some(PostStatus::Pending),
            "private" => Some(PostStatus::Private),
            "publish" => Some(PostStatus::Publish),
            "future" => Some(PostStatus::Future),
            "trash" => Some(PostStatus::Trash),
            _ => None,
        }
    }
}

impl std::str::FromStr for PostStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid post status: {}", s))
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status filter for listing posts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    /// Every status except [`PostStatus::Trash`]
    Any,

    /// Exactly one status
    Only(PostStatus),
}

impl StatusFilter {
    /// Parse `any` or a single status name
    pub fn parse(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("any") {
            return Some(StatusFilter::Any);
        }
        PostStatus::parse(s).map(StatusFilter::Only)
    }

    /// Whether a post with `status` passes this filter
    pub fn matches(&self, status: PostStatus) -> bool {
        match self {
            StatusFilter::Any => status != PostStatus::Trash,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }
}

/// A stored content record
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    /// Backend-assigned identifier
    pub id: PostId,

    /// Title
    pub title: String,

    /// Full body
    pub content: String,

    /// Short summary, may be empty
    pub excerpt: String,

    /// Publication status
    pub status: PostStatus,

    /// Content type (`post`, `page` or a custom type)
    pub post_type: String,

    /// Author identity
    pub author: ActorId,

    /// Creation timestamp, `YYYY-MM-DD HH:MM:SS` in UTC
    pub date: String,

    /// Public URL of the record
    pub permalink: String,
}

/// Fields for creating a post
#[derive(Debug, Clone, PartialEq)]
pub struct NewPost {
    /// Title, must be non-empty
    pub title: String,

    /// Body
    pub content: String,

    /// Initial status
    pub status: PostStatus,

    /// Content type
    pub post_type: String,

    /// Author identity
    pub author: ActorId,
}

/// Partial update of an existing post
///
/// Only the fields that are `Some` are written; everything else is left as stored.
#[derive(Debug, Clone, PartialEq)]
pub struct PostUpdate {
    /// Post to update
    pub id: PostId,

    /// Replacement title
    pub title: Option<String>,

    /// Replacement body
    pub content: Option<String>,

    /// Replacement status
    pub status: Option<PostStatus>,
}

impl PostUpdate {
    /// An update touching nothing but the identifier
    pub fn new(id: PostId) -> Self {
        Self {
            id,
            title: None,
            content: None,
            status: None,
        }
    }

    /// Whether no field would change
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.status.is_none()
    }
}

/// Query criteria for listing posts
#[derive(Debug, Clone, PartialEq)]
pub struct PostQuery {
    /// Content type to list
    pub post_type: String,

    /// Status filter
    pub status: StatusFilter,

    /// Page size, at least 1
    pub per_page: u32,

    /// 1-based page number
    pub page: u32,
}

impl PostQuery {
    /// Number of records to skip for the requested page
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.per_page)
    }
}

impl Default for PostQuery {
    fn default() -> Self {
        Self {
            post_type: "post".to_string(),
            status: StatusFilter::Only(PostStatus::Publish),
            per_page: 10,
            page: 1,
        }
    }
}
