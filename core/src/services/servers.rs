//! Virtual servers: `/servers`.
//!
//! A server bundles tools, resources and prompts by id; the association
//! listings hang off `/servers/{id}/...`.

use serde::{Deserialize, Serialize};

use super::prompts::Prompt;
use super::resources::Resource;
use super::tools::Tool;
use super::{delete, get, merge_active, send_json, toggle, wrap_create};
use crate::client::ForgeClient;
use crate::context::Context;
use crate::error::Result;
use crate::http::HttpMethod;
use crate::patch::Patch;
use crate::response::Response;
use crate::scalar::{FlexibleId, Tag, Timestamp};
use crate::types::{item_path, CreateOptions, ListOptions};

const PATH: &str = "servers";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Server {
    pub id: FlexibleId,
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    #[serde(alias = "associated_tools")]
    pub associated_tools: Vec<FlexibleId>,
    #[serde(alias = "associated_resources")]
    pub associated_resources: Vec<FlexibleId>,
    #[serde(alias = "associated_prompts")]
    pub associated_prompts: Vec<FlexibleId>,
    /// True when `isActive`, `is_active` or `enabled` was true on the wire.
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    // Some builds send both spellings in one body.
    #[serde(rename = "is_active", skip_serializing)]
    is_active_snake: Option<bool>,
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

impl Server {
    fn normalized(mut self) -> Self {
        merge_active(&mut self.is_active, self.enabled);
        merge_active(&mut self.is_active, self.is_active_snake.take());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerCreate {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub associated_tools: Vec<FlexibleId>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub associated_resources: Vec<FlexibleId>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub associated_prompts: Vec<FlexibleId>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerUpdate {
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub name: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub description: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub icon: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub associated_tools: Patch<Vec<FlexibleId>>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub associated_resources: Patch<Vec<FlexibleId>>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub associated_prompts: Patch<Vec<FlexibleId>>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub tags: Patch<Vec<Tag>>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub visibility: Patch<String>,
}

pub struct ServersService<'a> {
    client: &'a ForgeClient,
}

impl ForgeClient {
    pub fn servers(&self) -> ServersService<'_> {
        ServersService { client: self }
    }
}

impl ServersService<'_> {
    pub async fn list(&self, ctx: &Context, options: &ListOptions) -> Result<(Vec<Server>, Response)> {
        let (items, response) = self
            .client
            .list::<Server>(ctx, PATH, options, "servers")
            .await?;
        Ok((items.into_iter().map(Server::normalized).collect(), response))
    }

    pub async fn get(&self, ctx: &Context, id: &str) -> Result<(Server, Response)> {
        let (server, response) = get::<Server>(self.client, ctx, &item_path(PATH, id)).await?;
        Ok((server.normalized(), response))
    }

    /// Sent as `{"server": {...}, "team_id": ..., "visibility": ...}`.
    pub async fn create(
        &self,
        ctx: &Context,
        input: &ServerCreate,
        options: &CreateOptions,
    ) -> Result<(Server, Response)> {
        let body = wrap_create("server", input, options)?;
        let (server, response) =
            send_json::<_, Server>(self.client, ctx, HttpMethod::Post, PATH, &body).await?;
        Ok((server.normalized(), response))
    }

    pub async fn update(
        &self,
        ctx: &Context,
        id: &str,
        input: &ServerUpdate,
    ) -> Result<(Server, Response)> {
        let (server, response) = send_json::<_, Server>(
            self.client,
            ctx,
            HttpMethod::Put,
            &item_path(PATH, id),
            input,
        )
        .await?;
        Ok((server.normalized(), response))
    }

    pub async fn delete(&self, ctx: &Context, id: &str) -> Result<Response> {
        delete(self.client, ctx, &item_path(PATH, id)).await
    }

    pub async fn toggle(
        &self,
        ctx: &Context,
        id: &str,
        activate: bool,
    ) -> Result<(Server, Response)> {
        let (server, response) =
            toggle::<Server>(self.client, ctx, &item_path(PATH, id), activate, "server").await?;
        Ok((server.normalized(), response))
    }

    pub async fn list_tools(
        &self,
        ctx: &Context,
        id: &str,
        options: &ListOptions,
    ) -> Result<(Vec<Tool>, Response)> {
        let path = format!("{}/tools", item_path(PATH, id));
        self.client.list(ctx, &path, options, "tools").await
    }

    pub async fn list_resources(
        &self,
        ctx: &Context,
        id: &str,
        options: &ListOptions,
    ) -> Result<(Vec<Resource>, Response)> {
        let path = format!("{}/resources", item_path(PATH, id));
        let (items, response) = self
            .client
            .list::<Resource>(ctx, &path, options, "resources")
            .await?;
        Ok((items.into_iter().map(Resource::normalized).collect(), response))
    }

    pub async fn list_prompts(
        &self,
        ctx: &Context,
        id: &str,
        options: &ListOptions,
    ) -> Result<(Vec<Prompt>, Response)> {
        let path = format!("{}/prompts", item_path(PATH, id));
        let (items, response) = self
            .client
            .list::<Prompt>(ctx, &path, options, "prompts")
            .await?;
        Ok((items.into_iter().map(Prompt::normalized).collect(), response))
    }
}
