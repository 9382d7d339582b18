//! Prompts: `/prompts`.
//!
//! Older servers number prompts with integers; `FlexibleId` absorbs that.

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

const PATH: &str = "prompts";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptArgument {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub required: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Prompt {
    pub id: FlexibleId,
    pub name: String,
    pub description: Option<String>,
    pub template: String,
    pub arguments: Vec<PromptArgument>,
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

impl Prompt {
    pub(crate) fn normalized(mut self) -> Self {
        merge_active(&mut self.is_active, self.enabled);
        merge_active(&mut self.is_active, self.is_active_snake.take());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptCreate {
    pub name: String,
    pub template: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<PromptArgument>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptUpdate {
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub name: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub description: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub template: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub arguments: Patch<Vec<PromptArgument>>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub tags: Patch<Vec<Tag>>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub visibility: Patch<String>,
}

pub struct PromptsService<'a> {
    client: &'a ForgeClient,
}

impl ForgeClient {
    pub fn prompts(&self) -> PromptsService<'_> {
        PromptsService { client: self }
    }
}

impl PromptsService<'_> {
    pub async fn list(&self, ctx: &Context, options: &ListOptions) -> Result<(Vec<Prompt>, Response)> {
        let (items, response) = self
            .client
            .list::<Prompt>(ctx, PATH, options, "prompts")
            .await?;
        Ok((items.into_iter().map(Prompt::normalized).collect(), response))
    }

    pub async fn get(&self, ctx: &Context, id: &str) -> Result<(Prompt, Response)> {
        let (prompt, response) = get::<Prompt>(self.client, ctx, &item_path(PATH, id)).await?;
        Ok((prompt.normalized(), response))
    }

    /// Sent as `{"prompt": {...}, "team_id": ..., "visibility": ...}`.
    pub async fn create(
        &self,
        ctx: &Context,
        input: &PromptCreate,
        options: &CreateOptions,
    ) -> Result<(Prompt, Response)> {
        let body = wrap_create("prompt", input, options)?;
        let (prompt, response) =
            send_json::<_, Prompt>(self.client, ctx, HttpMethod::Post, PATH, &body).await?;
        Ok((prompt.normalized(), response))
    }

    pub async fn update(
        &self,
        ctx: &Context,
        id: &str,
        input: &PromptUpdate,
    ) -> Result<(Prompt, Response)> {
        let (prompt, response) = send_json::<_, Prompt>(
            self.client,
            ctx,
            HttpMethod::Put,
            &item_path(PATH, id),
            input,
        )
        .await?;
        Ok((prompt.normalized(), response))
    }

    pub async fn delete(&self, ctx: &Context, id: &str) -> Result<Response> {
        delete(self.client, ctx, &item_path(PATH, id)).await
    }

    pub async fn toggle(
        &self,
        ctx: &Context,
        id: &str,
        activate: bool,
    ) -> Result<(Prompt, Response)> {
        let (prompt, response) =
            toggle::<Prompt>(self.client, ctx, &item_path(PATH, id), activate, "prompt").await?;
        Ok((prompt.normalized(), response))
    }
}
