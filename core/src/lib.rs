//! Async client for the forge management API (tools, resources, gateways,
//! servers, prompts, agents, teams, cancellation).
//!
//! # Overview
//! The upstream API is inconsistent: field names mix camelCase and
//! snake_case, ids are sometimes integers, timestamps come in three layouts,
//! tags are strings or objects, and listings are either bare arrays or
//! paginated envelopes. This crate absorbs all of that and exposes one
//! calling convention:
//!
//! ```rust,ignore
//! use forge_core::{Context, ForgeClient, ListOptions};
//!
//! let client = ForgeClient::new("http://localhost:4444/").with_token(token);
//! let ctx = Context::background();
//! let (tools, response) = client.tools().list(&ctx, &ListOptions::default()).await?;
//! if let Some(cursor) = response.next_cursor { /* fetch the next page */ }
//! ```
//!
//! # Design
//! - `ForgeClient` builds plain-data `HttpRequest`s and classifies plain-data
//!   `HttpResponse`s; the network round trip goes through an injectable
//!   `Transport` (`ReqwestTransport` by default).
//! - Every call runs under a `Context` for cancellation and deadlines.
//! - Scalar codecs (`FlexibleId`, `Timestamp`, `Tag`) read every wire shape
//!   and write one canonical shape.
//! - Update inputs use `Patch<T>` so "leave alone", "clear" and "set" stay
//!   distinct.
//! - No retries: every error, including 429, goes straight to the caller.

pub mod client;
pub mod config;
pub mod context;
pub mod error;
pub mod http;
pub mod list;
pub mod patch;
pub mod response;
pub mod scalar;
pub mod services;
pub mod transport;
pub mod types;

pub use client::{check_response, ForgeClient};
pub use config::ClientOptions;
pub use context::Context;
pub use error::{ApiError, Error, ErrorDetail, RateLimitError, Result};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use list::{decode_list, ListPage};
pub use patch::Patch;
pub use response::{Rate, Response};
pub use scalar::{FlexibleId, Tag, Timestamp};
pub use services::agents::{Agent, AgentCreate, AgentInvocation, AgentUpdate};
pub use services::cancellation::{CancelResponse, CancellationStatus};
pub use services::gateways::{Gateway, GatewayCreate, GatewayUpdate};
pub use services::prompts::{Prompt, PromptArgument, PromptCreate, PromptUpdate};
pub use services::resources::{Resource, ResourceCreate, ResourceUpdate};
pub use services::servers::{Server, ServerCreate, ServerUpdate};
pub use services::teams::{Team, TeamCreate, TeamMember, TeamUpdate};
pub use services::tools::{Tool, ToolCreate, ToolUpdate};
pub use transport::{ReqwestTransport, Transport, TransportError};
pub use types::{CreateOptions, ListOptions};
