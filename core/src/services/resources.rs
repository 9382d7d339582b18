//! Resources: `/resources`.

use serde::{Deserialize, Serialize};

use super::{delete, get, merge_active, send_json, toggle, wrap_create};
use crate::client::ForgeClient;
use crate::context::Context;
use crate::error::Result;
use crate::http::HttpMethod;
use crate::patch::Patch;
use crate::response::Response;
use crate::scalar::{FlexibleId, Tag, Timestamp};
use crate::types::{item_path, CreateOptions, ListOptions};

const PATH: &str = "resources";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Resource {
    pub id: FlexibleId,
    pub uri: String,
    pub name: String,
    pub description: Option<String>,
    #[serde(alias = "mime_type")]
    pub mime_type: Option<String>,
    pub size: Option<u64>,
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

impl Resource {
    pub(crate) fn normalized(mut self) -> Self {
        merge_active(&mut self.is_active, self.enabled);
        merge_active(&mut self.is_active, self.is_active_snake.take());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceCreate {
    pub uri: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceUpdate {
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub name: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub description: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub mime_type: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub template: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub content: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub tags: Patch<Vec<Tag>>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub visibility: Patch<String>,
}

pub struct ResourcesService<'a> {
    client: &'a ForgeClient,
}

impl ForgeClient {
    pub fn resources(&self) -> ResourcesService<'_> {
        ResourcesService { client: self }
    }
}

impl ResourcesService<'_> {
    pub async fn list(
        &self,
        ctx: &Context,
        options: &ListOptions,
    ) -> Result<(Vec<Resource>, Response)> {
        let (items, response) = self
            .client
            .list::<Resource>(ctx, PATH, options, "resources")
            .await?;
        Ok((items.into_iter().map(Resource::normalized).collect(), response))
    }

    /// Metadata only (`/resources/{id}/info`); the content endpoint is separate.
    pub async fn get(&self, ctx: &Context, id: &str) -> Result<(Resource, Response)> {
        let path = format!("{}/info", item_path(PATH, id));
        let (resource, response) = get::<Resource>(self.client, ctx, &path).await?;
        Ok((resource.normalized(), response))
    }

    /// Sent as `{"resource": {...}, "team_id": ..., "visibility": ...}`.
    pub async fn create(
        &self,
        ctx: &Context,
        input: &ResourceCreate,
        options: &CreateOptions,
    ) -> Result<(Resource, Response)> {
        let body = wrap_create("resource", input, options)?;
        let (resource, response) =
            send_json::<_, Resource>(self.client, ctx, HttpMethod::Post, PATH, &body).await?;
        Ok((resource.normalized(), response))
    }

    pub async fn update(
        &self,
        ctx: &Context,
        id: &str,
        input: &ResourceUpdate,
    ) -> Result<(Resource, Response)> {
        let (resource, response) = send_json::<_, Resource>(
            self.client,
            ctx,
            HttpMethod::Put,
            &item_path(PATH, id),
            input,
        )
        .await?;
        Ok((resource.normalized(), response))
    }

    pub async fn delete(&self, ctx: &Context, id: &str) -> Result<Response> {
        delete(self.client, ctx, &item_path(PATH, id)).await
    }

    pub async fn toggle(
        &self,
        ctx: &Context,
        id: &str,
        activate: bool,
    ) -> Result<(Resource, Response)> {
        let (resource, response) =
            toggle::<Resource>(self.client, ctx, &item_path(PATH, id), activate, "resource")
                .await?;
        Ok((resource.normalized(), response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn enabled_counts_as_active() {
        let resource: Resource = serde_json::from_value(json!({
            "id": "r1",
            "uri": "file:///a",
            "name": "a",
            "isActive": false,
            "enabled": true
        }))
        .unwrap();
        assert!(resource.normalized().is_active);
    }

    #[test]
    fn snake_case_is_active_is_read() {
        let resource: Resource = serde_json::from_value(json!({
            "id": 3,
            "uri": "file:///b",
            "name": "b",
            "is_active": true,
            "mime_type": "text/plain"
        }))
        .unwrap();
        let resource = resource.normalized();
        assert!(resource.is_active);
        assert_eq!(resource.id, "3");
        assert_eq!(resource.mime_type.as_deref(), Some("text/plain"));
    }

    #[test]
    fn both_active_spellings_in_one_body() {
        let resource: Resource = serde_json::from_value(json!({
            "id": "r2",
            "uri": "file:///c",
            "name": "c",
            "isActive": false,
            "is_active": true
        }))
        .unwrap();
        let resource = resource.normalized();
        assert!(resource.is_active);
        assert_eq!(serde_json::to_value(&resource).unwrap()["isActive"], json!(true));
        assert!(serde_json::to_value(&resource).unwrap().get("is_active").is_none());
    }
}
