//! In-memory stand-in for the forge management API.
//!
//! Reproduces the upstream quirks the client has to absorb: camelCase reads
//! with snake_case writes, wrapped and bare create bodies, integer prompt
//! ids, object tags on tools, naive timestamps, bare vs. enveloped listings,
//! header and body cursors, rate-limit headers and FastAPI-style errors.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const RATE_LIMIT_RESET: &str = "2030-01-01T00:00:00Z";
pub const TIMESTAMP: &str = "2025-01-15T10:30:00.123456";

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Required bearer token; `None` disables the check.
    pub token: Option<String>,
    /// Requests allowed before every response becomes 429.
    pub rate_limit: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            token: None,
            rate_limit: 10_000,
        }
    }
}

/// Per-kind wire conventions.
struct Kind {
    path: &'static str,
    singular: &'static str,
    list_field: &'static str,
    wrapped_create: bool,
    wrapped_toggle: bool,
    camel_case: bool,
    integer_ids: bool,
    object_tags: bool,
    active_keys: &'static [&'static str],
}

const KINDS: &[Kind] = &[
    Kind {
        path: "tools",
        singular: "tool",
        list_field: "tools",
        wrapped_create: true,
        wrapped_toggle: true,
        camel_case: true,
        integer_ids: false,
        object_tags: true,
        active_keys: &["enabled"],
    },
    Kind {
        path: "resources",
        singular: "resource",
        list_field: "resources",
        wrapped_create: true,
        wrapped_toggle: false,
        camel_case: true,
        integer_ids: false,
        object_tags: false,
        active_keys: &["isActive"],
    },
    Kind {
        path: "gateways",
        singular: "gateway",
        list_field: "gateways",
        wrapped_create: false,
        wrapped_toggle: false,
        camel_case: true,
        integer_ids: false,
        object_tags: false,
        active_keys: &["enabled"],
    },
    Kind {
        path: "servers",
        singular: "server",
        list_field: "servers",
        wrapped_create: true,
        wrapped_toggle: false,
        camel_case: true,
        integer_ids: false,
        object_tags: false,
        active_keys: &["isActive", "enabled"],
    },
    Kind {
        path: "prompts",
        singular: "prompt",
        list_field: "prompts",
        wrapped_create: true,
        wrapped_toggle: false,
        camel_case: true,
        integer_ids: true,
        object_tags: false,
        active_keys: &["isActive"],
    },
    Kind {
        path: "a2a",
        singular: "agent",
        list_field: "agents",
        wrapped_create: true,
        wrapped_toggle: true,
        camel_case: true,
        integer_ids: false,
        object_tags: false,
        active_keys: &["enabled"],
    },
    Kind {
        path: "teams",
        singular: "team",
        list_field: "teams",
        wrapped_create: false,
        wrapped_toggle: false,
        camel_case: false,
        integer_ids: false,
        object_tags: false,
        active_keys: &["is_active"],
    },
];

fn kind(path: &str) -> Option<&'static Kind> {
    KINDS.iter().find(|kind| kind.path == path)
}

pub struct AppState {
    config: AppConfig,
    db: RwLock<HashMap<&'static str, Vec<Value>>>,
    cancellations: RwLock<HashMap<String, Value>>,
    remaining: AtomicU64,
    next_integer_id: AtomicU64,
}

pub type Db = Arc<AppState>;

pub fn app() -> Router {
    app_with(AppConfig::default())
}

pub fn app_with(config: AppConfig) -> Router {
    let state: Db = Arc::new(AppState {
        remaining: AtomicU64::new(config.rate_limit),
        config,
        db: RwLock::new(HashMap::new()),
        cancellations: RwLock::new(HashMap::new()),
        next_integer_id: AtomicU64::new(1),
    });
    Router::new()
        .route("/cancellation/cancel", post(cancel_request))
        .route("/cancellation/status/{id}", get(cancellation_status))
        .route("/{kind}", get(list_items).post(create_item))
        .route(
            "/{kind}/{id}",
            get(get_item).put(update_item).delete(delete_item),
        )
        .route("/{kind}/{id}/{action}", get(item_view).post(item_action))
        .layer(middleware::from_fn_with_state(state.clone(), gatekeeper))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with(listener, AppConfig::default()).await
}

pub async fn run_with(listener: TcpListener, config: AppConfig) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(config)).await
}

// ---------------------------------------------------------------------------
// Auth and rate limiting
// ---------------------------------------------------------------------------

async fn gatekeeper(State(state): State<Db>, request: Request, next: Next) -> Response {
    tracing::debug!(method = %request.method(), uri = %request.uri(), "request");
    let limit = state.config.rate_limit;
    let remaining = state
        .remaining
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .map(|previous| previous - 1);

    let mut response = match remaining {
        Err(_) => {
            tracing::warn!(limit, "rate limit exhausted");
            (
                StatusCode::TOO_MANY_REQUESTS,
                Json(json!({"message": "API rate limit exceeded"})),
            )
                .into_response()
        }
        Ok(_) if !authorized(&state.config, &request) => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Not authenticated"})),
        )
            .into_response(),
        Ok(_) => next.run(request).await,
    };

    let headers = response.headers_mut();
    headers.insert("x-ratelimit-limit", HeaderValue::from(limit));
    headers.insert("x-ratelimit-remaining", HeaderValue::from(remaining.unwrap_or(0)));
    headers.insert("x-ratelimit-reset", HeaderValue::from_static(RATE_LIMIT_RESET));
    response
}

fn authorized(config: &AppConfig, request: &Request) -> bool {
    let Some(token) = &config.token else {
        return true;
    };
    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == format!("Bearer {token}"))
}

// ---------------------------------------------------------------------------
// Generic CRUD
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub include_pagination: Option<bool>,
    pub include_inactive: Option<bool>,
    pub limit: Option<usize>,
    pub cursor: Option<String>,
    pub tags: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ToggleParams {
    pub activate: Option<bool>,
}

async fn list_items(
    State(db): State<Db>,
    Path(kind_path): Path<String>,
    Query(params): Query<ListParams>,
) -> Response {
    let Some(kind) = kind(&kind_path) else {
        return unknown_route(&kind_path);
    };
    let items = db.db.read().await.get(kind.path).cloned().unwrap_or_default();
    let wanted_tags: Vec<&str> = params
        .tags
        .as_deref()
        .map(|tags| tags.split(',').filter(|t| !t.is_empty()).collect())
        .unwrap_or_default();

    let visible: Vec<Value> = items
        .into_iter()
        .filter(|item| params.include_inactive.unwrap_or(false) || is_active(kind, item))
        .filter(|item| wanted_tags.iter().all(|tag| has_tag(item, tag)))
        .collect();

    let offset = params
        .cursor
        .as_deref()
        .and_then(|cursor| cursor.parse::<usize>().ok())
        .unwrap_or(0);
    let limit = params.limit.unwrap_or(usize::MAX);
    let page: Vec<Value> = visible.iter().skip(offset).take(limit).cloned().collect();
    let next = offset.saturating_add(limit);
    let next_cursor = (next < visible.len()).then(|| next.to_string());

    if params.include_pagination.unwrap_or(false) || kind.path == "teams" {
        let mut envelope = Map::new();
        envelope.insert(kind.list_field.to_string(), Value::Array(page));
        if let Some(cursor) = next_cursor {
            envelope.insert("nextCursor".to_string(), Value::String(cursor));
        }
        if kind.path == "teams" {
            envelope.insert("total".to_string(), json!(visible.len()));
        }
        return Json(Value::Object(envelope)).into_response();
    }

    let mut response = Json(Value::Array(page)).into_response();
    if let Some(cursor) = next_cursor {
        if let Ok(value) = HeaderValue::from_str(&cursor) {
            response.headers_mut().insert("x-next-cursor", value);
        }
    }
    response
}

async fn create_item(
    State(db): State<Db>,
    Path(kind_path): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let Some(kind) = kind(&kind_path) else {
        return unknown_route(&kind_path);
    };
    let (input, team_id, visibility) = if kind.wrapped_create {
        (
            body.get(kind.singular).cloned(),
            body.get("team_id").cloned(),
            body.get("visibility").cloned(),
        )
    } else {
        (Some(body.clone()), None, None)
    };
    let Some(Value::Object(input)) = input else {
        let loc = if kind.wrapped_create {
            json!(["body", kind.singular])
        } else {
            json!(["body"])
        };
        return validation_error(loc, "field required");
    };
    if !input.get("name").is_some_and(Value::is_string) {
        let loc = if kind.wrapped_create {
            json!(["body", kind.singular, "name"])
        } else {
            json!(["body", "name"])
        };
        return validation_error(loc, "field required");
    }

    let id = if kind.integer_ids {
        json!(db.next_integer_id.fetch_add(1, Ordering::SeqCst))
    } else {
        json!(Uuid::new_v4().simple().to_string())
    };

    let mut item = Map::new();
    item.insert("id".to_string(), id);
    for (key, value) in input {
        item.insert(wire_key(kind, &key), value);
    }
    if let Some(team_id) = team_id {
        item.insert(wire_key(kind, "team_id"), team_id);
    }
    if let Some(visibility) = visibility {
        item.insert("visibility".to_string(), visibility);
    }
    for key in kind.active_keys {
        item.insert(key.to_string(), Value::Bool(true));
    }
    if kind.path == "servers" {
        // Newer builds only maintain `enabled`.
        item.insert("isActive".to_string(), Value::Bool(false));
    }
    item.insert(wire_key(kind, "created_at"), json!(TIMESTAMP));
    item.insert(wire_key(kind, "updated_at"), json!(TIMESTAMP));
    let mut item = Value::Object(item);
    shape_tags(kind, &mut item);

    db.db
        .write()
        .await
        .entry(kind.path)
        .or_default()
        .push(item.clone());
    (StatusCode::CREATED, Json(item)).into_response()
}

async fn get_item(State(db): State<Db>, Path((kind_path, id)): Path<(String, String)>) -> Response {
    let Some(kind) = kind(&kind_path) else {
        return unknown_route(&kind_path);
    };
    match find(&db, kind, &id).await {
        Some(item) => Json(item).into_response(),
        None => not_found(kind, &id),
    }
}

async fn update_item(
    State(db): State<Db>,
    Path((kind_path, id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Response {
    let Some(kind) = kind(&kind_path) else {
        return unknown_route(&kind_path);
    };
    let Value::Object(changes) = body else {
        return validation_error(json!(["body"]), "value is not a valid dict");
    };
    let mut db_guard = db.db.write().await;
    let Some(item) = db_guard
        .get_mut(kind.path)
        .and_then(|items| items.iter_mut().find(|item| id_matches(item, &id)))
    else {
        return not_found(kind, &id);
    };
    if let Value::Object(fields) = &mut *item {
        for (key, value) in changes {
            fields.insert(wire_key(kind, &key), value);
        }
        fields.insert(wire_key(kind, "updated_at"), json!(TIMESTAMP));
    }
    shape_tags(kind, item);
    Json(item.clone()).into_response()
}

async fn delete_item(
    State(db): State<Db>,
    Path((kind_path, id)): Path<(String, String)>,
) -> Response {
    let Some(kind) = kind(&kind_path) else {
        return unknown_route(&kind_path);
    };
    let mut db_guard = db.db.write().await;
    let items = db_guard.entry(kind.path).or_default();
    match items.iter().position(|item| id_matches(item, &id)) {
        Some(index) => {
            items.remove(index);
            StatusCode::NO_CONTENT.into_response()
        }
        None => not_found(kind, &id),
    }
}

/// `GET /{kind}/{id}/{action}`: resource info, server associations, team members.
async fn item_view(
    State(db): State<Db>,
    Path((kind_path, id, action)): Path<(String, String, String)>,
) -> Response {
    let Some(kind) = kind(&kind_path) else {
        return unknown_route(&kind_path);
    };
    let Some(item) = find(&db, kind, &id).await else {
        return not_found(kind, &id);
    };
    match (kind.path, action.as_str()) {
        ("resources", "info") => Json(item).into_response(),
        ("servers", "tools" | "resources" | "prompts") => {
            let key = match action.as_str() {
                "tools" => "associatedTools",
                "resources" => "associatedResources",
                _ => "associatedPrompts",
            };
            let wanted: Vec<String> = item
                .get(key)
                .and_then(Value::as_array)
                .map(|ids| ids.iter().map(id_text).collect())
                .unwrap_or_default();
            let items = db.db.read().await.get(action.as_str()).cloned().unwrap_or_default();
            let matched: Vec<Value> = items
                .into_iter()
                .filter(|candidate| wanted.contains(&id_text(&candidate["id"])))
                .collect();
            Json(Value::Array(matched)).into_response()
        }
        ("teams", "members") => Json(json!([{
            "id": 1,
            "team_id": item["id"],
            "user_email": "admin@example.com",
            "role": "owner",
            "joined_at": TIMESTAMP,
            "is_active": true
        }]))
        .into_response(),
        _ => unknown_route(&action),
    }
}

/// `POST /{kind}/{id}/{action}`: toggle, agent invoke.
async fn item_action(
    State(db): State<Db>,
    Path((kind_path, id, action)): Path<(String, String, String)>,
    Query(params): Query<ToggleParams>,
    body: Bytes,
) -> Response {
    let Some(kind) = kind(&kind_path) else {
        return unknown_route(&kind_path);
    };
    match action.as_str() {
        "toggle" => {
            let activate = params.activate.unwrap_or(true);
            let mut db_guard = db.db.write().await;
            let Some(item) = db_guard
                .get_mut(kind.path)
                .and_then(|items| items.iter_mut().find(|item| id_matches(item, &id)))
            else {
                return not_found(kind, &id);
            };
            if let Value::Object(fields) = &mut *item {
                for key in kind.active_keys {
                    fields.insert(key.to_string(), Value::Bool(activate));
                }
            }
            let item = item.clone();
            if kind.wrapped_toggle {
                let state = if activate { "activated" } else { "deactivated" };
                let mut wrapped = Map::new();
                wrapped.insert("status".to_string(), json!("success"));
                wrapped.insert(
                    "message".to_string(),
                    json!(format!("{} {id} {state}", kind.singular)),
                );
                wrapped.insert(kind.singular.to_string(), item);
                return Json(Value::Object(wrapped)).into_response();
            }
            Json(item).into_response()
        }
        "invoke" if kind.path == "a2a" => {
            let agents = db.db.read().await.get("a2a").cloned().unwrap_or_default();
            let known = agents
                .iter()
                .any(|agent| agent["name"].as_str() == Some(id.as_str()));
            if !known {
                return not_found(kind, &id);
            }
            let parameters = serde_json::from_slice::<Value>(&body)
                .ok()
                .and_then(|body| body.get("parameters").cloned())
                .unwrap_or(Value::Null);
            Json(json!({"agent": id, "result": parameters})).into_response()
        }
        _ => unknown_route(&action),
    }
}

// ---------------------------------------------------------------------------
// Cancellation
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelBody {
    pub request_id: String,
    pub reason: Option<String>,
}

async fn cancel_request(State(db): State<Db>, Json(body): Json<CancelBody>) -> Response {
    let status = json!({
        "name": null,
        "registered_at": TIMESTAMP,
        "cancelled": true,
        "cancelled_at": TIMESTAMP,
        "cancel_reason": body.reason,
    });
    db.cancellations
        .write()
        .await
        .insert(body.request_id.clone(), status);
    Json(json!({
        "status": "cancelled",
        "request_id": body.request_id,
        "reason": body.reason,
    }))
    .into_response()
}

async fn cancellation_status(State(db): State<Db>, Path(id): Path<String>) -> Response {
    match db.cancellations.read().await.get(&id) {
        Some(status) => Json(status.clone()).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"message": format!("Request not found: {id}")})),
        )
            .into_response(),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find(db: &Db, kind: &Kind, id: &str) -> Option<Value> {
    db.db
        .read()
        .await
        .get(kind.path)
        .and_then(|items| items.iter().find(|item| id_matches(item, id)).cloned())
}

fn id_text(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn id_matches(item: &Value, id: &str) -> bool {
    id_text(&item["id"]) == id
}

fn is_active(kind: &Kind, item: &Value) -> bool {
    kind.active_keys
        .iter()
        .any(|key| item.get(*key).and_then(Value::as_bool).unwrap_or(false))
}

fn has_tag(item: &Value, tag: &str) -> bool {
    item.get("tags")
        .and_then(Value::as_array)
        .is_some_and(|tags| {
            tags.iter().any(|t| match t {
                Value::String(s) => s == tag,
                other => other["id"].as_str() == Some(tag),
            })
        })
}

/// Tools report tags as `{"id", "label"}` objects; everything else as strings.
fn shape_tags(kind: &Kind, item: &mut Value) {
    let Some(tags) = item.get_mut("tags").and_then(Value::as_array_mut) else {
        return;
    };
    for tag in tags.iter_mut() {
        let name = match &*tag {
            Value::String(s) => s.clone(),
            other => id_text(&other["id"]),
        };
        *tag = if kind.object_tags {
            let mut label = name.clone();
            if let Some(first) = label.get_mut(0..1) {
                first.make_ascii_uppercase();
            }
            json!({"id": name, "label": label})
        } else {
            json!(name)
        };
    }
}

/// Stored key for an incoming snake_case field.
fn wire_key(kind: &Kind, key: &str) -> String {
    if !kind.camel_case {
        return key.to_string();
    }
    let mut out = String::with_capacity(key.len());
    let mut upper = false;
    for c in key.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

fn not_found(kind: &Kind, id: &str) -> Response {
    let mut name = kind.singular.to_string();
    if let Some(first) = name.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    (
        StatusCode::NOT_FOUND,
        Json(json!({"message": format!("{name} not found: {id}")})),
    )
        .into_response()
}

fn unknown_route(segment: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"detail": format!("Not Found: {segment}")})),
    )
        .into_response()
}

fn validation_error(loc: Value, msg: &str) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({"detail": [{"loc": loc, "msg": msg, "type": "value_error.missing"}]})),
    )
        .into_response()
}
