//! Tools: `/tools`.

use std::collections::HashMap;

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

const PATH: &str = "tools";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Tool {
    pub id: FlexibleId,
    pub name: String,
    #[serde(alias = "original_name")]
    pub original_name: String,
    #[serde(alias = "display_name")]
    pub display_name: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    #[serde(alias = "integration_type")]
    pub integration_type: Option<String>,
    #[serde(alias = "request_type")]
    pub request_type: Option<String>,
    pub headers: Option<HashMap<String, String>>,
    #[serde(alias = "input_schema")]
    pub input_schema: Option<Value>,
    pub annotations: Option<Value>,
    #[serde(alias = "gateway_id")]
    pub gateway_id: Option<FlexibleId>,
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
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolCreate {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub integration_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<HashMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_schema: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolUpdate {
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub name: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub url: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub description: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub integration_type: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub request_type: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub headers: Patch<HashMap<String, String>>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub input_schema: Patch<Map<String, Value>>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub annotations: Patch<Map<String, Value>>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub tags: Patch<Vec<Tag>>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub visibility: Patch<String>,
}

pub struct ToolsService<'a> {
    client: &'a ForgeClient,
}

impl ForgeClient {
    pub fn tools(&self) -> ToolsService<'_> {
        ToolsService { client: self }
    }
}

impl ToolsService<'_> {
    pub async fn list(&self, ctx: &Context, options: &ListOptions) -> Result<(Vec<Tool>, Response)> {
        self.client.list(ctx, PATH, options, "tools").await
    }

    pub async fn get(&self, ctx: &Context, id: &str) -> Result<(Tool, Response)> {
        get(self.client, ctx, &item_path(PATH, id)).await
    }

    /// Sent as `{"tool": {...}, "team_id": ..., "visibility": ...}`.
    pub async fn create(
        &self,
        ctx: &Context,
        input: &ToolCreate,
        options: &CreateOptions,
    ) -> Result<(Tool, Response)> {
        let body = wrap_create("tool", input, options)?;
        send_json(self.client, ctx, HttpMethod::Post, PATH, &body).await
    }

    pub async fn update(&self, ctx: &Context, id: &str, input: &ToolUpdate) -> Result<(Tool, Response)> {
        send_json(self.client, ctx, HttpMethod::Put, &item_path(PATH, id), input).await
    }

    pub async fn delete(&self, ctx: &Context, id: &str) -> Result<Response> {
        delete(self.client, ctx, &item_path(PATH, id)).await
    }

    pub async fn toggle(&self, ctx: &Context, id: &str, activate: bool) -> Result<(Tool, Response)> {
        toggle(self.client, ctx, &item_path(PATH, id), activate, "tool").await
    }
}
