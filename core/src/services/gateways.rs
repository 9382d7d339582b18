//! Gateways (federated peers): `/gateways`.
//!
//! Unlike most kinds, gateway create bodies are not wrapped; ownership
//! fields travel inside the body itself.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{delete, get, send_json, toggle};
use crate::client::ForgeClient;
use crate::context::Context;
use crate::error::Result;
use crate::http::HttpMethod;
use crate::patch::Patch;
use crate::response::Response;
use crate::scalar::{FlexibleId, Tag, Timestamp};
use crate::types::{item_path, ListOptions};

const PATH: &str = "gateways";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Gateway {
    pub id: FlexibleId,
    pub name: String,
    pub slug: Option<String>,
    pub url: String,
    pub description: Option<String>,
    pub transport: Option<String>,
    pub capabilities: Option<Value>,
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
    #[serde(alias = "last_seen")]
    pub last_seen: Timestamp,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayCreate {
    pub name: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transport: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_type: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayUpdate {
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub name: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub url: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub description: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub transport: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub auth_type: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub tags: Patch<Vec<Tag>>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub visibility: Patch<String>,
}

pub struct GatewaysService<'a> {
    client: &'a ForgeClient,
}

impl ForgeClient {
    pub fn gateways(&self) -> GatewaysService<'_> {
        GatewaysService { client: self }
    }
}

impl GatewaysService<'_> {
    pub async fn list(
        &self,
        ctx: &Context,
        options: &ListOptions,
    ) -> Result<(Vec<Gateway>, Response)> {
        self.client.list(ctx, PATH, options, "gateways").await
    }

    pub async fn get(&self, ctx: &Context, id: &str) -> Result<(Gateway, Response)> {
        get(self.client, ctx, &item_path(PATH, id)).await
    }

    pub async fn create(&self, ctx: &Context, input: &GatewayCreate) -> Result<(Gateway, Response)> {
        send_json(self.client, ctx, HttpMethod::Post, PATH, input).await
    }

    pub async fn update(
        &self,
        ctx: &Context,
        id: &str,
        input: &GatewayUpdate,
    ) -> Result<(Gateway, Response)> {
        send_json(self.client, ctx, HttpMethod::Put, &item_path(PATH, id), input).await
    }

    pub async fn delete(&self, ctx: &Context, id: &str) -> Result<Response> {
        delete(self.client, ctx, &item_path(PATH, id)).await
    }

    pub async fn toggle(
        &self,
        ctx: &Context,
        id: &str,
        activate: bool,
    ) -> Result<(Gateway, Response)> {
        toggle(self.client, ctx, &item_path(PATH, id), activate, "gateway").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_body_is_not_wrapped() {
        let input = GatewayCreate {
            name: "peer".into(),
            url: "http://peer:4444/sse".into(),
            team_id: Some("t1".into()),
            ..GatewayCreate::default()
        };
        assert_eq!(
            serde_json::to_value(input).unwrap(),
            json!({"name": "peer", "url": "http://peer:4444/sse", "team_id": "t1"})
        );
    }

    #[test]
    fn null_last_seen_is_unset() {
        let gateway: Gateway = serde_json::from_value(json!({
            "id": "g1",
            "name": "peer",
            "url": "http://peer",
            "lastSeen": null,
            "created_at": "2024-01-01T12:00:00"
        }))
        .unwrap();
        assert!(gateway.last_seen.is_unset());
        assert!(!gateway.created_at.is_unset());
    }
}
