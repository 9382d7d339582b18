//! Server-side cancellation of in-flight tool runs: `/cancellation`.
//!
//! This cancels work the server is doing for some earlier request id. It is
//! unrelated to `Context`, which only cancels the local HTTP call.

use serde::{Deserialize, Serialize};

use super::{get, send_json};
use crate::client::ForgeClient;
use crate::context::Context;
use crate::error::Result;
use crate::http::HttpMethod;
use crate::response::Response;
use crate::scalar::{FlexibleId, Timestamp};
use crate::types::item_path;

const CANCEL_PATH: &str = "cancellation/cancel";
const STATUS_PATH: &str = "cancellation/status";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelRequest {
    pub request_id: FlexibleId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CancelResponse {
    pub status: String,
    #[serde(alias = "request_id")]
    pub request_id: FlexibleId,
    pub reason: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CancellationStatus {
    pub name: Option<String>,
    #[serde(alias = "registered_at")]
    pub registered_at: Timestamp,
    pub cancelled: bool,
    #[serde(alias = "cancelled_at")]
    pub cancelled_at: Timestamp,
    #[serde(alias = "cancel_reason")]
    pub cancel_reason: Option<String>,
}

pub struct CancellationService<'a> {
    client: &'a ForgeClient,
}

impl ForgeClient {
    pub fn cancellation(&self) -> CancellationService<'_> {
        CancellationService { client: self }
    }
}

impl CancellationService<'_> {
    pub async fn cancel(
        &self,
        ctx: &Context,
        request_id: &str,
        reason: Option<&str>,
    ) -> Result<(CancelResponse, Response)> {
        let body = CancelRequest {
            request_id: request_id.into(),
            reason: reason.map(str::to_string),
        };
        send_json(self.client, ctx, HttpMethod::Post, CANCEL_PATH, &body).await
    }

    pub async fn status(
        &self,
        ctx: &Context,
        request_id: &str,
    ) -> Result<(CancellationStatus, Response)> {
        get(self.client, ctx, &item_path(STATUS_PATH, request_id)).await
    }
}
