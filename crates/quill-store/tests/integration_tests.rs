//! Integration tests for quill-store
//!
//! These tests verify the full CRUD cycle for posts, options, plugins and the
//! bearer token lifecycle.

use quill_domain::{
    ActorId, ContentRepository, NewPost, OptionStore, Plugin, PostQuery, PostStatus, PostUpdate,
    RepositoryError, Role, StatusFilter,
};
use quill_store::secret::{tokens_match, TOKEN_OPTION};
use quill_store::{AdminGrant, GrantError, SecretProvider, SqliteStore, OPTION_HOME};
use std::sync::Arc;

fn new_post(title: &str, status: PostStatus) -> NewPost {
    NewPost {
        title: title.to_string(),
        content: format!("Body of {}", title),
        status,
        post_type: "post".to_string(),
        author: ActorId::FALLBACK,
    }
}

#[test]
fn test_store_initialization() {
    let store = SqliteStore::new(":memory:");
    assert!(store.is_ok(), "Store should initialize successfully");
}

#[test]
fn test_create_and_get_post() {
    let store = SqliteStore::new(":memory:").unwrap();
    store.set_option(OPTION_HOME, "https://example.org").unwrap();

    let created = store.create_post(new_post("Hello", PostStatus::Draft)).unwrap();
    assert_eq!(created.title, "Hello");
    assert_eq!(created.status, PostStatus::Draft);
    assert_eq!(created.permalink, format!("https://example.org/?p={}", created.id));
    assert!(!created.date.is_empty());

    let fetched = store.get_post(created.id).unwrap().unwrap();
    assert_eq!(fetched, created);
}

#[test]
fn test_get_missing_post() {
    let store = SqliteStore::new(":memory:").unwrap();
    let missing = quill_domain::PostId::new(999).unwrap();
    assert!(store.get_post(missing).unwrap().is_none());
}

#[test]
fn test_create_post_rejects_empty_title() {
    let store = SqliteStore::new(":memory:").unwrap();
    let result = store.create_post(new_post("", PostStatus::Draft));
    assert!(matches!(result, Err(RepositoryError::Rejected(_))));
}

#[test]
fn test_list_posts_filters_and_paginates() {
    let store = SqliteStore::new(":memory:").unwrap();
    for i in 0..5 {
        store
            .create_post(new_post(&format!("Published {}", i), PostStatus::Publish))
            .unwrap();
    }
    store.create_post(new_post("Draft", PostStatus::Draft)).unwrap();
    store.create_post(new_post("Binned", PostStatus::Trash)).unwrap();

    let first_page = store
        .list_posts(&PostQuery {
            per_page: 2,
            ..PostQuery::default()
        })
        .unwrap();
    assert_eq!(first_page.len(), 2);
    // Newest first
    assert_eq!(first_page[0].title, "Published 4");
    assert_eq!(first_page[1].title, "Published 3");

    let third_page = store
        .list_posts(&PostQuery {
            per_page: 2,
            page: 3,
            ..PostQuery::default()
        })
        .unwrap();
    assert_eq!(third_page.len(), 1);
    assert_eq!(third_page[0].title, "Published 0");

    let any = store
        .list_posts(&PostQuery {
            status: StatusFilter::Any,
            per_page: 50,
            ..PostQuery::default()
        })
        .unwrap();
    assert_eq!(any.len(), 6, "any excludes trashed posts");

    let pages = store
        .list_posts(&PostQuery {
            post_type: "page".to_string(),
            ..PostQuery::default()
        })
        .unwrap();
    assert!(pages.is_empty());
}

#[test]
fn test_partial_update_keeps_other_fields() {
    let store = SqliteStore::new(":memory:").unwrap();
    let created = store.create_post(new_post("Original", PostStatus::Draft)).unwrap();

    let mut update = PostUpdate::new(created.id);
    update.status = Some(PostStatus::Publish);
    let updated = store.update_post(update).unwrap();

    assert_eq!(updated.status, PostStatus::Publish);
    assert_eq!(updated.title, created.title);
    assert_eq!(updated.content, created.content);
}

#[test]
fn test_update_missing_post() {
    let store = SqliteStore::new(":memory:").unwrap();
    let mut update = PostUpdate::new(quill_domain::PostId::new(77).unwrap());
    update.title = Some("Nope".to_string());

    let result = store.update_post(update);
    assert!(matches!(result, Err(RepositoryError::NotFound(_))));
}

#[test]
fn test_options_roundtrip() {
    let store = SqliteStore::new(":memory:").unwrap();
    assert_eq!(store.get_option("blogname").unwrap(), None);

    store.set_option("blogname", "My Site").unwrap();
    store.set_option("blogname", "Renamed").unwrap();
    assert_eq!(store.get_option("blogname").unwrap(), Some("Renamed".to_string()));
}

#[test]
fn test_plugins_and_site_info() {
    let store = SqliteStore::new(":memory:").unwrap();
    store
        .install_plugin(&Plugin {
            path: "akismet/akismet.php".to_string(),
            name: "Akismet".to_string(),
            version: "5.3".to_string(),
            active: true,
        })
        .unwrap();
    store
        .install_plugin(&Plugin {
            path: "hello.php".to_string(),
            name: "Hello Dolly".to_string(),
            version: "1.7.2".to_string(),
            active: false,
        })
        .unwrap();

    let plugins = store.list_plugins().unwrap();
    assert_eq!(plugins.len(), 2);
    assert_eq!(plugins[0].name, "Akismet");
    assert!(plugins[0].active);
    assert!(!plugins[1].active);

    store.set_option("blogname", "Quill").unwrap();
    store.set_option("blogdescription", "Just another site").unwrap();
    store.set_option(OPTION_HOME, "https://quill.test/").unwrap();

    let info = store.site_info().unwrap();
    assert_eq!(info.name, "Quill");
    assert_eq!(info.description, "Just another site");
    assert_eq!(info.url, "https://quill.test");
    assert!(!info.version.is_empty());
}

#[test]
fn test_administrator_lookup() {
    let store = SqliteStore::new(":memory:").unwrap();
    assert_eq!(store.find_administrator().unwrap(), None);

    let editor = store.add_user("ed", Role::Editor).unwrap();
    let admin = store.add_user("root", Role::Administrator).unwrap();

    assert_eq!(store.find_administrator().unwrap(), Some(admin));
    assert_eq!(store.role_of(editor).unwrap(), Some(Role::Editor));
    assert_eq!(store.role_of(ActorId::new(1234)).unwrap(), None);
}

#[test]
fn test_current_actor_is_configurable() {
    let store = SqliteStore::new(":memory:").unwrap();
    assert_eq!(store.current_actor(), None);

    let store = store.with_current_actor(Some(ActorId::new(3)));
    assert_eq!(store.current_actor(), Some(ActorId::new(3)));
}

#[test]
fn test_ensure_token_is_stable() {
    let store = Arc::new(SqliteStore::new(":memory:").unwrap());
    let secrets = SecretProvider::new(store.clone());

    assert_eq!(secrets.current_token().unwrap(), None);
    let first = secrets.ensure_token().unwrap();
    let second = secrets.ensure_token().unwrap();
    assert_eq!(first, second);
    assert_eq!(store.get_option(TOKEN_OPTION).unwrap(), Some(first));
}

#[test]
fn test_regenerate_requires_administrator() {
    let store = Arc::new(SqliteStore::new(":memory:").unwrap());
    let secrets = SecretProvider::new(store.clone());
    let editor = store.add_user("ed", Role::Editor).unwrap();
    let admin = store.add_user("root", Role::Administrator).unwrap();

    assert!(matches!(
        AdminGrant::verify(store.as_ref(), editor),
        Err(GrantError::NotAdministrator(_))
    ));
    assert!(matches!(
        AdminGrant::verify(store.as_ref(), ActorId::new(99)),
        Err(GrantError::UnknownActor(_))
    ));

    let old = secrets.ensure_token().unwrap();
    let grant = AdminGrant::verify(store.as_ref(), admin).unwrap();
    let new = secrets.regenerate(&grant).unwrap();

    assert_ne!(old, new);
    let stored = secrets.current_token().unwrap().unwrap();
    assert!(tokens_match(&stored, &new));
    assert!(!tokens_match(&stored, &old));
}

#[test]
fn test_token_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("quill.db");

    let token = {
        let store = Arc::new(SqliteStore::new(&path).unwrap());
        SecretProvider::new(store).ensure_token().unwrap()
    };

    let reopened = Arc::new(SqliteStore::new(&path).unwrap());
    let secrets = SecretProvider::new(reopened);
    assert_eq!(secrets.current_token().unwrap(), Some(token));
}
