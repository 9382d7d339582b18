//! Dispatcher behavior over the default reqwest transport, against wiremock.

use std::time::Duration;

use forge_core::{Context, Error, ForgeClient, HttpMethod, ListOptions, ToolUpdate};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn client_for(server: &MockServer) -> ForgeClient {
    ForgeClient::new(&format!("{}/", server.uri()))
        .with_token("tok")
        .with_user_agent("dispatch-test")
}

#[tokio::test]
async fn sends_standard_headers() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/tools/t1"))
        .and(header("accept", "application/json"))
        .and(header("content-type", "application/json"))
        .and(header("user-agent", "dispatch-test"))
        .and(header("authorization", "Bearer tok"))
        .and(body_json(json!({"name": "renamed"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "t1", "name": "renamed"})))
        .expect(1)
        .mount(&server)
        .await;

    let update = ToolUpdate {
        name: "renamed".to_string().into(),
        ..ToolUpdate::default()
    };
    let (tool, response) = client_for(&server)
        .await
        .tools()
        .update(&Context::background(), "t1", &update)
        .await
        .unwrap();
    assert_eq!(tool.name, "renamed");
    assert_eq!(response.status, 200);
}

#[tokio::test]
async fn header_cursor_and_rate_are_exposed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gateways"))
        .and(query_param("limit", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{"id": "g1", "name": "edge", "url": "http://edge"}]))
                .insert_header("X-Next-Cursor", "next-1")
                .insert_header("X-Ratelimit-Limit", "100")
                .insert_header("X-Ratelimit-Remaining", "99")
                .insert_header("X-Ratelimit-Reset", "2024-01-01T12:00:00Z"),
        )
        .mount(&server)
        .await;

    let options = ListOptions {
        limit: Some(1),
        ..ListOptions::default()
    };
    let (gateways, response) = client_for(&server)
        .await
        .gateways()
        .list(&Context::background(), &options)
        .await
        .unwrap();
    assert_eq!(gateways.len(), 1);
    assert_eq!(response.next_cursor.as_deref(), Some("next-1"));
    assert_eq!(response.rate.limit, 100);
    assert_eq!(response.rate.remaining, 99);
    assert_eq!(response.rate.reset.to_string(), "2024-01-01 12:00:00 +0000 UTC");
}

#[tokio::test]
async fn body_cursor_overrides_header_cursor() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tools"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"tools": [], "nextCursor": "from-body"}))
                .insert_header("X-Next-Cursor", "from-header"),
        )
        .mount(&server)
        .await;

    let (_, response) = client_for(&server)
        .await
        .tools()
        .list(&Context::background(), &ListOptions::default().paginated())
        .await
        .unwrap();
    assert_eq!(response.next_cursor.as_deref(), Some("from-body"));
}

#[tokio::test]
async fn rate_limit_error_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tools"))
        .respond_with(
            ResponseTemplate::new(429)
                .set_body_json(json!({"message": "API rate limit exceeded"}))
                .insert_header("X-Ratelimit-Limit", "100")
                .insert_header("X-Ratelimit-Remaining", "0")
                .insert_header("X-Ratelimit-Reset", "2024-01-01T12:00:00Z"),
        )
        .mount(&server)
        .await;

    let err = client_for(&server)
        .await
        .tools()
        .list(&Context::background(), &ListOptions::default())
        .await
        .unwrap_err();
    assert!(err.is_rate_limited());
    assert_eq!(
        err.to_string(),
        format!(
            "GET {}/tools; 429 API rate limit exceeded (rate limit; 0/100, reset at 2024-01-01 12:00:00 +0000 UTC)",
            server.uri()
        )
    );
}

#[tokio::test]
async fn api_error_keeps_rate_counters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tools/x"))
        .respond_with(
            ResponseTemplate::new(503)
                .insert_header("X-Ratelimit-Limit", "100")
                .insert_header("X-Ratelimit-Remaining", "3")
                .insert_header("X-Ratelimit-Reset", "2024-01-01T12:00:00Z"),
        )
        .mount(&server)
        .await;

    let err = client_for(&server)
        .await
        .tools()
        .get(&Context::background(), "x")
        .await
        .unwrap_err();
    assert!(!err.is_rate_limited());
    let Error::Api(api) = &err else {
        panic!("expected ApiError, got {err:?}");
    };
    assert_eq!(api.status, 503);
    assert_eq!(api.rate.limit, 100);
    assert_eq!(api.rate.remaining, 3);
    assert_eq!(api.rate.reset.to_string(), "2024-01-01 12:00:00 +0000 UTC");
    assert_eq!(err.rate(), Some(api.rate));
}

#[tokio::test]
async fn error_url_is_redacted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tools/x"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let address = server.address();
    let client = ForgeClient::new(&format!("http://admin:hunter2@{address}/"));
    let err = client
        .tools()
        .get(&Context::background(), "x")
        .await
        .unwrap_err();
    let Error::Api(api) = &err else {
        panic!("expected ApiError, got {err:?}");
    };
    assert_eq!(api.status, 500);
    assert_eq!(api.message, "no message");
    assert_eq!(api.url, format!("http://REDACTED:REDACTED@{address}/tools/x"));
    assert!(!err.to_string().contains("hunter2"));
}

#[tokio::test]
async fn delete_discards_empty_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/teams/t%201"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let response = client_for(&server)
        .await
        .teams()
        .delete(&Context::background(), "t 1")
        .await
        .unwrap();
    assert_eq!(response.status, 204);
}

#[tokio::test]
async fn undecodable_success_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/servers/s1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .await
        .servers()
        .get(&Context::background(), "s1")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Decode(_)), "got {err:?}");
}

#[tokio::test]
async fn cancel_aborts_in_flight_call() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tools"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])).set_delay(Duration::from_secs(10)))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let ctx = Context::background().with_cancel();
    let canceller = ctx.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        canceller.cancel();
    });

    let err = client.tools().list(&ctx, &ListOptions::default()).await.unwrap_err();
    assert!(matches!(err, Error::Cancelled), "got {err:?}");
    assert!(err.is_cancelled());
    assert_eq!(err.to_string(), "context canceled");
}

#[tokio::test]
async fn deadline_aborts_slow_call() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/prompts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])).set_delay(Duration::from_secs(10)))
        .mount(&server)
        .await;

    let ctx = Context::background().with_timeout(Duration::from_millis(100));
    let err = client_for(&server)
        .await
        .prompts()
        .list(&ctx, &ListOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::DeadlineExceeded), "got {err:?}");
}

#[tokio::test]
async fn unreachable_host_is_transport_error() {
    let client = ForgeClient::new("http://127.0.0.1:1/");
    let request = client.new_request(HttpMethod::Get, "health").unwrap();
    let err = client
        .dispatch(Some(&Context::background()), request)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Transport(_)), "got {err:?}");
}
