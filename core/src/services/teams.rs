//! Teams: `/teams`.
//!
//! The team listing always answers with the `{"teams": [...], "total": n}`
//! envelope; member listings are bare arrays.

use serde::{Deserialize, Serialize};

use super::{delete, get, send_json};
use crate::client::ForgeClient;
use crate::context::Context;
use crate::error::Result;
use crate::http::HttpMethod;
use crate::patch::Patch;
use crate::response::Response;
use crate::scalar::{FlexibleId, Timestamp};
use crate::types::{item_path, ListOptions};

const PATH: &str = "teams";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Team {
    pub id: FlexibleId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    #[serde(alias = "is_personal")]
    pub is_personal: bool,
    pub visibility: Option<String>,
    #[serde(alias = "max_members")]
    pub max_members: Option<u32>,
    #[serde(alias = "member_count")]
    pub member_count: u32,
    #[serde(alias = "created_by")]
    pub created_by: Option<String>,
    #[serde(alias = "is_active")]
    pub is_active: bool,
    #[serde(alias = "created_at")]
    pub created_at: Timestamp,
    #[serde(alias = "updated_at")]
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TeamMember {
    pub id: FlexibleId,
    #[serde(alias = "team_id")]
    pub team_id: FlexibleId,
    #[serde(alias = "user_email")]
    pub user_email: String,
    pub role: String,
    #[serde(alias = "joined_at")]
    pub joined_at: Timestamp,
    #[serde(alias = "invited_by")]
    pub invited_by: Option<String>,
    #[serde(alias = "is_active")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamCreate {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_members: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamUpdate {
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub name: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub description: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub visibility: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub max_members: Patch<u32>,
}

pub struct TeamsService<'a> {
    client: &'a ForgeClient,
}

impl ForgeClient {
    pub fn teams(&self) -> TeamsService<'_> {
        TeamsService { client: self }
    }
}

impl TeamsService<'_> {
    pub async fn list(&self, ctx: &Context, options: &ListOptions) -> Result<(Vec<Team>, Response)> {
        self.client.list(ctx, PATH, options, "teams").await
    }

    pub async fn get(&self, ctx: &Context, id: &str) -> Result<(Team, Response)> {
        get(self.client, ctx, &item_path(PATH, id)).await
    }

    pub async fn create(&self, ctx: &Context, input: &TeamCreate) -> Result<(Team, Response)> {
        send_json(self.client, ctx, HttpMethod::Post, PATH, input).await
    }

    pub async fn update(&self, ctx: &Context, id: &str, input: &TeamUpdate) -> Result<(Team, Response)> {
        send_json(self.client, ctx, HttpMethod::Put, &item_path(PATH, id), input).await
    }

    pub async fn delete(&self, ctx: &Context, id: &str) -> Result<Response> {
        delete(self.client, ctx, &item_path(PATH, id)).await
    }

    pub async fn list_members(
        &self,
        ctx: &Context,
        id: &str,
        options: &ListOptions,
    ) -> Result<(Vec<TeamMember>, Response)> {
        let path = format!("{}/members", item_path(PATH, id));
        self.client.list(ctx, &path, options, "members").await
    }
}
