//! Integration tests for the MCP HTTP endpoint

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use quill_domain::{OptionStore, Role};
use quill_server::{
    build_state,
    config::{ServerConfig, SiteConfig},
    handlers::create_router,
    open_store,
};
use quill_store::secret::TOKEN_OPTION;
use quill_store::{AdminGrant, SecretProvider, SqliteStore};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt; // for oneshot

const ENDPOINT: &str = "/quill-mcp/v1/mcp";

struct TestApp {
    app: Router,
    store: Arc<SqliteStore>,
    token: String,
}

impl TestApp {
    fn new() -> Self {
        let mut config = ServerConfig::default_test_config();
        config.site = Some(SiteConfig {
            name: Some("Quill Test".to_string()),
            description: Some("Testing".to_string()),
            url: Some("https://quill.test".to_string()),
        });
        Self::from_config(config)
    }

    fn from_config(config: ServerConfig) -> Self {
        let store = open_store(&config).unwrap();
        let state = build_state(&config, store.clone()).unwrap();
        let token = store.get_option(TOKEN_OPTION).unwrap().unwrap_or_default();
        Self {
            app: create_router(state, &config.endpoint_path()),
            store,
            token,
        }
    }

    async fn post(&self, authorization: Option<&str>, body: &str) -> (StatusCode, Vec<u8>) {
        let mut request = Request::builder()
            .method("POST")
            .uri(ENDPOINT)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(value) = authorization {
            request = request.header(header::AUTHORIZATION, value);
        }
        let request = request.body(Body::from(body.to_string())).unwrap();

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    async fn rpc(&self, body: Value) -> (StatusCode, Value) {
        let bearer = format!("Bearer {}", self.token);
        let (status, bytes) = self.post(Some(&bearer), &body.to_string()).await;
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }
}

fn ping() -> &'static str {
    r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#
}

#[tokio::test]
async fn test_ping_scenario() {
    let app = TestApp::new();
    let (status, body) = app
        .rpc(json!({"jsonrpc": "2.0", "id": 1, "method": "ping"}))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"jsonrpc": "2.0", "id": 1, "result": {}}));
}

#[tokio::test]
async fn test_get_option_scenario() {
    let app = TestApp::new();
    let (status, body) = app
        .rpc(json!({
            "jsonrpc": "2.0",
            "id": 2,
            "method": "tools/call",
            "params": {"name": "get_option", "arguments": {"option": "blogname"}}
        }))
        .await;

    assert_eq!(status, StatusCode::OK);
    let text = body["result"]["content"][0]["text"].as_str().unwrap();
    let payload: Value = serde_json::from_str(text).unwrap();
    assert_eq!(payload, json!({"option": "blogname", "value": "Quill Test"}));
}

#[tokio::test]
async fn test_missing_header_is_401() {
    let app = TestApp::new();
    let request = Request::builder()
        .method("POST")
        .uri(ENDPOINT)
        .body(Body::from(ping()))
        .unwrap();

    let response = app.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers()[header::WWW_AUTHENTICATE], "Bearer");

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["error"]["code"], -32001);
    assert!(body.get("id").is_none());
}

#[tokio::test]
async fn test_malformed_header_is_401() {
    let app = TestApp::new();
    let basic = format!("Basic {}", app.token);
    let (status, _) = app.post(Some(&basic), ping()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.post(Some("Bearer"), ping()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_wrong_token_is_403() {
    let app = TestApp::new();
    let (status, body) = app.post(Some("Bearer not-the-token"), ping()).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["error"]["code"], -32003);
}

#[tokio::test]
async fn test_no_token_is_503() {
    let mut config = ServerConfig::default_test_config();
    config.generate_token_on_start = false;
    let app = TestApp::from_config(config);
    assert!(app.token.is_empty());

    let (status, body) = app.post(Some("Bearer anything"), ping()).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["error"]["code"], -32002);

    // Auth happens before parsing
    let (status, _) = app.post(None, "{not json").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_auth_runs_before_parsing() {
    let app = TestApp::new();
    let (status, _) = app.post(Some("Bearer wrong"), "{not json").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_scheme_is_case_insensitive() {
    let app = TestApp::new();
    let lower = format!("bearer   {}  ", app.token);
    let (status, _) = app.post(Some(&lower), ping()).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_get_is_405() {
    let app = TestApp::new();
    let request = Request::builder()
        .method("GET")
        .uri(ENDPOINT)
        .header(header::AUTHORIZATION, format!("Bearer {}", app.token))
        .body(Body::empty())
        .unwrap();

    let response = app.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["error"]["code"], -32000);
}

#[tokio::test]
async fn test_parse_error_is_400() {
    let app = TestApp::new();
    let bearer = format!("Bearer {}", app.token);
    let (status, body) = app.post(Some(&bearer), "{not json").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(
        body,
        json!({"jsonrpc": "2.0", "error": {"code": -32700, "message": "Parse error: invalid JSON"}})
    );
}

#[tokio::test]
async fn test_notification_is_202_with_empty_body() {
    let app = TestApp::new();
    let bearer = format!("Bearer {}", app.token);
    let (status, body) = app
        .post(
            Some(&bearer),
            r#"{"jsonrpc":"2.0","method":"notifications/initialized","params":{"anything":[1,2]}}"#,
        )
        .await;

    assert_eq!(status, StatusCode::ACCEPTED);
    assert!(body.is_empty());
}

#[tokio::test]
async fn test_null_id_is_answered() {
    let app = TestApp::new();
    let (status, body) = app
        .rpc(json!({"jsonrpc": "2.0", "id": null, "method": "ping"}))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"jsonrpc": "2.0", "id": null, "result": {}}));

    let (status, body) = app
        .rpc(json!({"jsonrpc": "2.0", "id": 1, "method": "notifications/bogus"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], -32601);
}

#[tokio::test]
async fn test_unknown_method_and_tool_are_400() {
    let app = TestApp::new();

    let (status, body) = app
        .rpc(json!({"jsonrpc": "2.0", "id": 7, "method": "resources/list"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["id"], 7);
    assert_eq!(body["error"]["code"], -32601);

    let (status, body) = app
        .rpc(json!({
            "jsonrpc": "2.0",
            "id": 8,
            "method": "tools/call",
            "params": {"name": "delete_everything"}
        }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("delete_everything"));
}

#[tokio::test]
async fn test_tool_failure_is_200() {
    let app = TestApp::new();
    let (status, body) = app
        .rpc(json!({
            "jsonrpc": "2.0",
            "id": 9,
            "method": "tools/call",
            "params": {"name": "get_post", "arguments": {"id": 12345}}
        }))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["isError"], true);
}

#[tokio::test]
async fn test_create_post_end_to_end() {
    let app = TestApp::new();
    let (_, body) = app
        .rpc(json!({
            "jsonrpc": "2.0",
            "id": 10,
            "method": "tools/call",
            "params": {"name": "create_post", "arguments": {"title": "Hi", "content": "There"}}
        }))
        .await;

    assert_eq!(
        body["result"]["content"][0]["text"],
        "Created post #1: https://quill.test/?p=1"
    );
}

#[tokio::test]
async fn test_regenerated_token_takes_effect_immediately() {
    let app = TestApp::new();
    let admin = app.store.add_user("root", Role::Administrator).unwrap();

    let old = format!("Bearer {}", app.token);
    let (status, _) = app.post(Some(&old), ping()).await;
    assert_eq!(status, StatusCode::OK);

    let grant = AdminGrant::verify(app.store.as_ref(), admin).unwrap();
    let fresh = SecretProvider::new(app.store.clone())
        .regenerate(&grant)
        .unwrap();

    let (status, _) = app.post(Some(&old), ping()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.post(Some(&format!("Bearer {}", fresh)), ping()).await;
    assert_eq!(status, StatusCode::OK);
}

mod bearer_properties {
    use proptest::prelude::*;
    use quill_server::auth::parse_bearer;

    proptest! {
        #[test]
        fn prop_bearer_token_round_trips(
            token in "[!-~]{1,64}",
            scheme in prop::sample::select(vec!["Bearer", "bearer", "BEARER", "bEaReR"]),
            gap in "[ \t]{1,4}",
        ) {
            let header = format!("{}{}{}", scheme, gap, token);
            prop_assert_eq!(parse_bearer(&header), Some(token.as_str()));
        }

        #[test]
        fn prop_other_schemes_rejected(token in "[!-~]{1,32}") {
            let basic = format!("Basic {}", token);
            prop_assert_eq!(parse_bearer(&basic), None);
        }
    }
}
