//! Post tools - list, read, create and update content records

use crate::catalog::{InputSchema, PropertySchema, Tool};
use crate::invoker::{Arguments, ToolError, ToolOutput};
use quill_domain::{
    ActorId, ContentRepository, NewPost, Post, PostId, PostQuery, PostStatus, PostUpdate,
    StatusFilter,
};
use serde::{Deserialize, Serialize};

/// Upper bound on `per_page`, whatever the caller asks for
pub const MAX_PER_PAGE: i64 = 50;

const LIST_STATUSES: &[&str] = &[
    "any", "draft", "pending", "private", "publish", "future", "trash",
];
const CREATE_STATUSES: &[&str] = &["draft", "publish", "private"];
const UPDATE_STATUSES: &[&str] = &["draft", "publish", "private", "trash"];

/// Parameters for listing posts
#[derive(Debug, Deserialize)]
pub struct ListPostsParams {
    /// Content type
    pub post_type: String,
    /// Status name or `any`
    pub status: String,
    /// Requested page size
    pub per_page: i64,
    /// Requested page
    pub page: i64,
}

/// Parameters addressing one post
#[derive(Debug, Deserialize)]
pub struct GetPostParams {
    /// Post ID
    pub id: i64,
}

/// Parameters for creating a post
#[derive(Debug, Deserialize)]
pub struct CreatePostParams {
    /// Title
    pub title: String,
    /// Body
    pub content: String,
    /// Initial status
    pub status: String,
    /// Content type
    pub post_type: String,
}

/// Parameters for updating a post
#[derive(Debug, Deserialize)]
pub struct UpdatePostParams {
    /// Post ID
    pub id: i64,
    /// Replacement title
    #[serde(default)]
    pub title: Option<String>,
    /// Replacement body
    #[serde(default)]
    pub content: Option<String>,
    /// Replacement status
    #[serde(default)]
    pub status: Option<String>,
}

/// Listing entry
#[derive(Debug, Serialize)]
pub struct PostSummary {
    /// Post ID
    pub id: i64,
    /// Title
    pub title: String,
    /// Creation date
    pub date: String,
    /// Status
    pub status: &'static str,
    /// Content type
    pub post_type: String,
    /// Public URL
    pub permalink: String,
}

impl From<Post> for PostSummary {
    fn from(post: Post) -> Self {
        Self {
            id: post.id.value(),
            title: post.title,
            date: post.date,
            status: post.status.as_str(),
            post_type: post.post_type,
            permalink: post.permalink,
        }
    }
}

/// Full post as returned by `get_post`
#[derive(Debug, Serialize)]
pub struct PostDetail {
    /// Post ID
    pub id: i64,
    /// Title
    pub title: String,
    /// Body
    pub content: String,
    /// Summary
    pub excerpt: String,
    /// Status
    pub status: &'static str,
    /// Creation date
    pub date: String,
    /// Content type
    pub post_type: String,
    /// Public URL
    pub permalink: String,
}

impl From<Post> for PostDetail {
    fn from(post: Post) -> Self {
        Self {
            id: post.id.value(),
            title: post.title,
            content: post.content,
            excerpt: post.excerpt,
            status: post.status.as_str(),
            date: post.date,
            post_type: post.post_type,
            permalink: post.permalink,
        }
    }
}

/// Clamp a requested page size into `1..=MAX_PER_PAGE`
pub fn clamp_per_page(requested: i64) -> u32 {
    requested.clamp(1, MAX_PER_PAGE) as u32
}

/// Floor a requested page number at 1
pub fn clamp_page(requested: i64) -> u32 {
    requested.clamp(1, i64::from(u32::MAX)) as u32
}

fn post_id(raw: i64) -> Result<PostId, ToolError> {
    PostId::new(raw).ok_or_else(|| ToolError::Invalid("Post ID required".to_string()))
}

fn parse_status(raw: &str) -> Result<PostStatus, ToolError> {
    PostStatus::parse(raw).ok_or_else(|| ToolError::Invalid(format!("Invalid status: {}", raw)))
}

fn not_found(id: PostId) -> ToolError {
    ToolError::NotFound(format!("Post {} not found", id))
}

/// Author for new posts: the current actor, else an administrator, else account 1
fn resolve_author(repository: &dyn ContentRepository) -> Result<ActorId, ToolError> {
    if let Some(actor) = repository.current_actor() {
        return Ok(actor);
    }
    Ok(repository
        .find_administrator()?
        .unwrap_or(ActorId::FALLBACK))
}

/// `list_posts` tool definition
pub fn list_posts_tool() -> Tool {
    Tool::new(
        "list_posts",
        "List recent posts. Optional: post_type, status, per_page, page.",
        InputSchema::new()
            .property(
                "post_type",
                PropertySchema::string()
                    .describe("post, page, or custom type")
                    .with_default("post"),
            )
            .property(
                "status",
                PropertySchema::string()
                    .with_default("publish")
                    .one_of(LIST_STATUSES),
            )
            .property(
                "per_page",
                PropertySchema::integer()
                    .describe("Results per page (max 50)")
                    .with_default(10),
            )
            .property("page", PropertySchema::integer().with_default(1)),
        handle_list_posts,
    )
}

fn handle_list_posts(
    repository: &dyn ContentRepository,
    arguments: Arguments,
) -> Result<ToolOutput, ToolError> {
    let params: ListPostsParams = arguments.parse()?;
    let status = StatusFilter::parse(&params.status)
        .ok_or_else(|| ToolError::Invalid(format!("Invalid status: {}", params.status)))?;

    let query = PostQuery {
        post_type: params.post_type,
        status,
        per_page: clamp_per_page(params.per_page),
        page: clamp_page(params.page),
    };

    let posts: Vec<PostSummary> = repository
        .list_posts(&query)?
        .into_iter()
        .map(PostSummary::from)
        .collect();

    ToolOutput::json(&posts)
}

/// `get_post` tool definition
pub fn get_post_tool() -> Tool {
    Tool::new(
        "get_post",
        "Get a single post or page by ID.",
        InputSchema::new().required("id", PropertySchema::integer().describe("Post ID")),
        handle_get_post,
    )
}

fn handle_get_post(
    repository: &dyn ContentRepository,
    arguments: Arguments,
) -> Result<ToolOutput, ToolError> {
    let params: GetPostParams = arguments.parse()?;
    let id = post_id(params.id)?;

    let post = repository.get_post(id)?.ok_or_else(|| not_found(id))?;
    ToolOutput::json(&PostDetail::from(post))
}

/// `create_post` tool definition
pub fn create_post_tool() -> Tool {
    Tool::new(
        "create_post",
        "Create a new post. Title and content required.",
        InputSchema::new()
            .required("title", PropertySchema::string())
            .required("content", PropertySchema::string())
            .property(
                "status",
                PropertySchema::string()
                    .with_default("draft")
                    .one_of(CREATE_STATUSES),
            )
            .property("post_type", PropertySchema::string().with_default("post")),
        handle_create_post,
    )
}

fn handle_create_post(
    repository: &dyn ContentRepository,
    arguments: Arguments,
) -> Result<ToolOutput, ToolError> {
    let params: CreatePostParams = arguments.parse()?;
    if params.title.trim().is_empty() {
        return Err(ToolError::Invalid("Title required".to_string()));
    }

    let post = repository.create_post(NewPost {
        title: params.title,
        content: params.content,
        status: parse_status(&params.status)?,
        post_type: params.post_type,
        author: resolve_author(repository)?,
    })?;

    Ok(ToolOutput::Text(format!(
        "Created post #{}: {}",
        post.id, post.permalink
    )))
}

/// `update_post` tool definition
pub fn update_post_tool() -> Tool {
    Tool::new(
        "update_post",
        "Update an existing post.",
        InputSchema::new()
            .required("id", PropertySchema::integer())
            .property("title", PropertySchema::string())
            .property("content", PropertySchema::string())
            .property("status", PropertySchema::string().one_of(UPDATE_STATUSES)),
        handle_update_post,
    )
}

fn handle_update_post(
    repository: &dyn ContentRepository,
    arguments: Arguments,
) -> Result<ToolOutput, ToolError> {
    let params: UpdatePostParams = arguments.parse()?;
    let id = post_id(params.id)?;

    if repository.get_post(id)?.is_none() {
        return Err(not_found(id));
    }

    let update = PostUpdate {
        id,
        title: params.title,
        content: params.content,
        status: params.status.as_deref().map(parse_status).transpose()?,
    };

    let post = repository.update_post(update)?;
    Ok(ToolOutput::Text(format!(
        "Updated post #{}: {}",
        post.id, post.permalink
    )))
}
