//! Per-resource services.
//!
//! Each service borrows a `ForgeClient` (`client.tools()`, `client.teams()`,
//! ...) and turns typed inputs into calls on the shared request builder and
//! dispatcher. Reads accept both camelCase and snake_case field names;
//! create and update bodies are written in snake_case.

pub mod agents;
pub mod cancellation;
pub mod gateways;
pub mod prompts;
pub mod resources;
pub mod servers;
pub mod teams;
pub mod tools;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::client::ForgeClient;
use crate::context::Context;
use crate::error::{Error, Result};
use crate::http::HttpMethod;
use crate::list::decode_item;
use crate::response::Response;
use crate::types::CreateOptions;

pub(crate) async fn get<T: DeserializeOwned>(
    client: &ForgeClient,
    ctx: &Context,
    path: &str,
) -> Result<(T, Response)> {
    let request = client.new_request(HttpMethod::Get, path)?;
    client.send(Some(ctx), request).await
}

pub(crate) async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
    client: &ForgeClient,
    ctx: &Context,
    method: HttpMethod,
    path: &str,
    body: &B,
) -> Result<(T, Response)> {
    let request = client.new_json_request(method, path, body)?;
    client.send(Some(ctx), request).await
}

pub(crate) async fn delete(client: &ForgeClient, ctx: &Context, path: &str) -> Result<Response> {
    let request = client.new_request(HttpMethod::Delete, path)?;
    client.send_discard(Some(ctx), request).await
}

/// `POST <path>/toggle?activate=<bool>`; the item may come back bare or
/// wrapped under `field`.
pub(crate) async fn toggle<T: DeserializeOwned>(
    client: &ForgeClient,
    ctx: &Context,
    path: &str,
    activate: bool,
    field: &str,
) -> Result<(T, Response)> {
    let request = client.new_request(
        HttpMethod::Post,
        &format!("{path}/toggle?activate={activate}"),
    )?;
    let (response, body) = client.dispatch(Some(ctx), request).await?;
    let item = decode_item(&body, field).map_err(Error::Decode)?;
    Ok((item, response))
}

/// `{ "<field>": input, "team_id": ..., "visibility": ... }`
pub(crate) fn wrap_create<B: Serialize>(
    field: &str,
    input: &B,
    options: &CreateOptions,
) -> Result<Value> {
    let mut body = Map::new();
    body.insert(
        field.to_string(),
        serde_json::to_value(input).map_err(Error::Encode)?,
    );
    if let Some(team_id) = &options.team_id {
        body.insert("team_id".to_string(), Value::String(team_id.clone()));
    }
    if let Some(visibility) = &options.visibility {
        body.insert("visibility".to_string(), Value::String(visibility.clone()));
    }
    Ok(Value::Object(body))
}

/// Some kinds report activity as `isActive`, newer builds as `enabled`.
/// Either one being true means active.
pub(crate) fn merge_active(is_active: &mut bool, enabled: Option<bool>) {
    *is_active = *is_active || enabled.unwrap_or(false);
}
