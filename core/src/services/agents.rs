//! A2A agents: `/a2a`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{delete, get, send_json, toggle, wrap_create};
use crate::client::ForgeClient;
use crate::context::Context;
use crate::error::Result;
use crate::http::HttpMethod;
use crate::patch::Patch;
use crate::response::Response;
use crate::scalar::{FlexibleId, Tag, Timestamp};
use crate::types::{item_path, CreateOptions, ListOptions};

const PATH: &str = "a2a";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Agent {
    pub id: FlexibleId,
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    #[serde(alias = "endpoint_url")]
    pub endpoint_url: String,
    #[serde(alias = "agent_type")]
    pub agent_type: Option<String>,
    #[serde(alias = "protocol_version")]
    pub protocol_version: Option<String>,
    pub capabilities: Option<Value>,
    pub config: Option<Value>,
    #[serde(alias = "auth_type")]
    pub auth_type: Option<String>,
    pub enabled: bool,
    pub reachable: bool,
    pub tags: Vec<Tag>,
    #[serde(alias = "team_id")]
    pub team_id: Option<String>,
    pub visibility: Option<String>,
    #[serde(alias = "owner_email")]
    pub owner_email: Option<String>,
    #[serde(alias = "created_at")]
    pub created_at: Timestamp,
    #[serde(alias = "updated_at")]
    pub updated_at: Timestamp,
    #[serde(alias = "last_interaction")]
    pub last_interaction: Timestamp,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentCreate {
    pub name: String,
    pub endpoint_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capabilities: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_type: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentUpdate {
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub name: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub description: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub endpoint_url: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub agent_type: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub protocol_version: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub capabilities: Patch<Map<String, Value>>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub config: Patch<Map<String, Value>>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub tags: Patch<Vec<Tag>>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub visibility: Patch<String>,
}

/// Body of `POST /a2a/{name}/invoke`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentInvocation {
    pub parameters: Value,
    pub interaction_type: String,
}

impl Default for AgentInvocation {
    fn default() -> Self {
        Self {
            parameters: Value::Object(Default::default()),
            interaction_type: "query".to_string(),
        }
    }
}

pub struct AgentsService<'a> {
    client: &'a ForgeClient,
}

impl ForgeClient {
    pub fn agents(&self) -> AgentsService<'_> {
        AgentsService { client: self }
    }
}

impl AgentsService<'_> {
    pub async fn list(&self, ctx: &Context, options: &ListOptions) -> Result<(Vec<Agent>, Response)> {
        self.client.list(ctx, PATH, options, "agents").await
    }

    pub async fn get(&self, ctx: &Context, id: &str) -> Result<(Agent, Response)> {
        get(self.client, ctx, &item_path(PATH, id)).await
    }

    /// Sent as `{"agent": {...}, "team_id": ..., "visibility": ...}`.
    pub async fn create(
        &self,
        ctx: &Context,
        input: &AgentCreate,
        options: &CreateOptions,
    ) -> Result<(Agent, Response)> {
        let body = wrap_create("agent", input, options)?;
        send_json(self.client, ctx, HttpMethod::Post, PATH, &body).await
    }

    pub async fn update(&self, ctx: &Context, id: &str, input: &AgentUpdate) -> Result<(Agent, Response)> {
        send_json(self.client, ctx, HttpMethod::Put, &item_path(PATH, id), input).await
    }

    pub async fn delete(&self, ctx: &Context, id: &str) -> Result<Response> {
        delete(self.client, ctx, &item_path(PATH, id)).await
    }

    pub async fn toggle(&self, ctx: &Context, id: &str, activate: bool) -> Result<(Agent, Response)> {
        toggle(self.client, ctx, &item_path(PATH, id), activate, "agent").await
    }

    /// Invoke an agent by name. The result shape is agent-defined.
    pub async fn invoke(
        &self,
        ctx: &Context,
        name: &str,
        invocation: &AgentInvocation,
    ) -> Result<(Value, Response)> {
        let path = format!("{}/invoke", item_path(PATH, name));
        send_json(self.client, ctx, HttpMethod::Post, &path, invocation).await
    }
}
