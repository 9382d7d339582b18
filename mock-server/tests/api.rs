use axum::http::{self, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use mock_server::{app, app_with, AppConfig, RATE_LIMIT_RESET};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

async fn create(app: &Router, uri: &str, body: Value) -> Value {
    let resp = app.clone().oneshot(json_request("POST", uri, body)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    body_json(resp).await
}

// --- list ---

#[tokio::test]
async fn list_is_bare_array_by_default() {
    let resp = app().oneshot(get("/tools")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, json!([]));
}

#[tokio::test]
async fn list_with_pagination_uses_envelope_and_body_cursor() {
    let app = app();
    for name in ["a", "b", "c"] {
        create(&app, "/tools", json!({"tool": {"name": name}})).await;
    }

    let resp = app
        .clone()
        .oneshot(get("/tools?include_pagination=true&limit=2"))
        .await
        .unwrap();
    let page = body_json(resp).await;
    assert_eq!(page["tools"].as_array().unwrap().len(), 2);
    assert_eq!(page["nextCursor"], "2");

    let resp = app
        .oneshot(get("/tools?include_pagination=true&limit=2&cursor=2"))
        .await
        .unwrap();
    let page = body_json(resp).await;
    assert_eq!(page["tools"][0]["name"], "c");
    assert!(page.get("nextCursor").is_none());
}

#[tokio::test]
async fn bare_list_reports_cursor_in_header() {
    let app = app();
    for name in ["a", "b"] {
        create(&app, "/gateways", json!({"name": name, "url": "http://x"})).await;
    }

    let resp = app.oneshot(get("/gateways?limit=1")).await.unwrap();
    assert_eq!(resp.headers()["x-next-cursor"], "1");
    assert_eq!(body_json(resp).await.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn inactive_items_hidden_unless_requested() {
    let app = app();
    let tool = create(&app, "/tools", json!({"tool": {"name": "t"}})).await;
    let id = tool["id"].as_str().unwrap();
    let resp = app
        .clone()
        .oneshot(json_request("POST", &format!("/tools/{id}/toggle?activate=false"), json!({})))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app.clone().oneshot(get("/tools")).await.unwrap();
    assert_eq!(body_json(resp).await, json!([]));

    let resp = app.oneshot(get("/tools?include_inactive=true")).await.unwrap();
    assert_eq!(body_json(resp).await.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn teams_list_always_enveloped() {
    let app = app();
    create(&app, "/teams", json!({"name": "Platform"})).await;

    let resp = app.oneshot(get("/teams")).await.unwrap();
    let page = body_json(resp).await;
    assert_eq!(page["total"], 1);
    assert_eq!(page["teams"][0]["is_active"], true);
}

// --- create ---

#[tokio::test]
async fn wrapped_create_stores_camel_case_with_team() {
    let tool = create(
        &app(),
        "/tools",
        json!({
            "tool": {"name": "echo", "input_schema": {"type": "object"}, "tags": ["util"]},
            "team_id": "team-1",
            "visibility": "public"
        }),
    )
    .await;

    assert_eq!(tool["inputSchema"], json!({"type": "object"}));
    assert_eq!(tool["teamId"], "team-1");
    assert_eq!(tool["visibility"], "public");
    assert_eq!(tool["tags"], json!([{"id": "util", "label": "Util"}]));
    assert_eq!(tool["createdAt"], "2025-01-15T10:30:00.123456");
}

#[tokio::test]
async fn prompts_get_integer_ids() {
    let app = app();
    let first = create(&app, "/prompts", json!({"prompt": {"name": "p1", "template": "hi"}})).await;
    let second = create(&app, "/prompts", json!({"prompt": {"name": "p2", "template": "yo"}})).await;
    assert_eq!(first["id"], 1);
    assert_eq!(second["id"], 2);

    let resp = app.oneshot(get("/prompts/2")).await.unwrap();
    assert_eq!(body_json(resp).await["name"], "p2");
}

#[tokio::test]
async fn create_without_name_is_fastapi_validation_error() {
    let resp = app()
        .oneshot(json_request("POST", "/tools", json!({"tool": {}})))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(resp).await;
    assert_eq!(body["detail"][0]["loc"], json!(["body", "tool", "name"]));
    assert_eq!(body["detail"][0]["msg"], "field required");
}

// --- get / update / delete ---

#[tokio::test]
async fn missing_item_returns_404_message() {
    let resp = app().oneshot(get("/gateways/nope")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(resp).await, json!({"message": "Gateway not found: nope"}));
}

#[tokio::test]
async fn update_merges_fields() {
    let app = app();
    let gw = create(&app, "/gateways", json!({"name": "gw", "url": "http://a"})).await;
    let id = gw["id"].as_str().unwrap();

    let resp = app
        .oneshot(json_request(
            "PUT",
            &format!("/gateways/{id}"),
            json!({"description": "edge", "url": "http://b"}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["name"], "gw");
    assert_eq!(body["url"], "http://b");
    assert_eq!(body["description"], "edge");
}

#[tokio::test]
async fn delete_returns_204_then_404() {
    let app = app();
    let team = create(&app, "/teams", json!({"name": "t"})).await;
    let uri = format!("/teams/{}", team["id"].as_str().unwrap());

    let delete = || Request::builder().method("DELETE").uri(&uri).body(String::new()).unwrap();
    let resp = app.clone().oneshot(delete()).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());

    let resp = app.oneshot(delete()).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- toggle and sub-resources ---

#[tokio::test]
async fn toggle_shapes_differ_by_kind() {
    let app = app();
    let tool = create(&app, "/tools", json!({"tool": {"name": "t"}})).await;
    let resource = create(&app, "/resources", json!({"resource": {"name": "r", "uri": "file:///r"}})).await;

    let uri = format!("/tools/{}/toggle?activate=false", tool["id"].as_str().unwrap());
    let body = body_json(app.clone().oneshot(json_request("POST", &uri, json!({}))).await.unwrap()).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["tool"]["enabled"], false);

    let uri = format!("/resources/{}/toggle?activate=false", resource["id"].as_str().unwrap());
    let body = body_json(app.oneshot(json_request("POST", &uri, json!({}))).await.unwrap()).await;
    assert_eq!(body["isActive"], false);
}

#[tokio::test]
async fn server_lists_associated_tools() {
    let app = app();
    let a = create(&app, "/tools", json!({"tool": {"name": "a"}})).await;
    create(&app, "/tools", json!({"tool": {"name": "b"}})).await;
    let server = create(
        &app,
        "/servers",
        json!({"server": {"name": "s", "associated_tools": [a["id"]]}}),
    )
    .await;
    assert_eq!(server["isActive"], false);
    assert_eq!(server["enabled"], true);

    let uri = format!("/servers/{}/tools", server["id"].as_str().unwrap());
    let body = body_json(app.oneshot(get(&uri)).await.unwrap()).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["name"], "a");
}

#[tokio::test]
async fn agent_invoke_echoes_parameters() {
    let app = app();
    create(&app, "/a2a", json!({"agent": {"name": "helper", "endpoint_url": "http://agent"}})).await;

    let resp = app
        .oneshot(json_request(
            "POST",
            "/a2a/helper/invoke",
            json!({"parameters": {"q": 1}, "interaction_type": "query"}),
        ))
        .await
        .unwrap();
    assert_eq!(body_json(resp).await, json!({"agent": "helper", "result": {"q": 1}}));
}

// --- cancellation ---

#[tokio::test]
async fn cancellation_round_trip() {
    let app = app();
    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/cancellation/cancel",
            json!({"requestId": "req-9", "reason": "stop"}),
        ))
        .await
        .unwrap();
    assert_eq!(body_json(resp).await["status"], "cancelled");

    let body = body_json(app.clone().oneshot(get("/cancellation/status/req-9")).await.unwrap()).await;
    assert_eq!(body["cancelled"], true);
    assert_eq!(body["cancel_reason"], "stop");

    let resp = app.oneshot(get("/cancellation/status/other")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- auth and rate limiting ---

#[tokio::test]
async fn bearer_token_is_enforced() {
    let app = app_with(AppConfig {
        token: Some("secret".into()),
        ..AppConfig::default()
    });

    let resp = app.clone().oneshot(get("/tools")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(resp).await, json!({"detail": "Not authenticated"}));

    let authed = Request::builder()
        .uri("/tools")
        .header(http::header::AUTHORIZATION, "Bearer secret")
        .body(String::new())
        .unwrap();
    assert_eq!(app.oneshot(authed).await.unwrap().status(), StatusCode::OK);
}

#[tokio::test]
async fn rate_limit_headers_and_exhaustion() {
    let app = app_with(AppConfig {
        rate_limit: 2,
        ..AppConfig::default()
    });

    let resp = app.clone().oneshot(get("/tools")).await.unwrap();
    assert_eq!(resp.headers()["x-ratelimit-limit"], "2");
    assert_eq!(resp.headers()["x-ratelimit-remaining"], "1");
    assert_eq!(resp.headers()["x-ratelimit-reset"], RATE_LIMIT_RESET);

    let resp = app.clone().oneshot(get("/tools")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["x-ratelimit-remaining"], "0");

    let resp = app.oneshot(get("/tools")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(resp.headers()["x-ratelimit-remaining"], "0");
}
