//! Request builder and response dispatcher for the forge API.
//!
//! # Design
//! A call goes through two explicit steps:
//!
//! 1. `new_request` / `new_json_request` resolve a relative path against the
//!    base URL and attach the standard headers, producing a plain-data
//!    `HttpRequest`. Configuration errors surface here, before any I/O.
//! 2. `dispatch` runs the request through the configured `Transport` under a
//!    `Context`, classifies the status with `check_response`, and returns the
//!    `Response` envelope plus the drained body. `send` / `send_discard`
//!    layer JSON decoding on top.
//!
//! The mutable configuration sits behind one mutex. It is locked to build a
//! request or to clone the transport handle, never across an `.await`.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use url::Url;

use crate::config::{ClientOptions, DEFAULT_USER_AGENT};
use crate::context::Context;
use crate::error::{sanitize_url, ApiError, Error, RateLimitError, Result};
use crate::http::{
    HttpMethod, HttpRequest, HttpResponse, ACCEPT, AUTHORIZATION, CONTENT_TYPE, JSON_MEDIA_TYPE,
    USER_AGENT,
};
use crate::list::decode_list;
use crate::response::{Rate, Response};
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{with_query, ListOptions};

struct Config {
    base_url: String,
    token: Option<String>,
    user_agent: String,
    transport: Arc<dyn Transport>,
}

/// Async client for the forge management API.
///
/// Share it behind an `Arc`; every method takes `&self`.
pub struct ForgeClient {
    config: Mutex<Config>,
}

impl fmt::Debug for ForgeClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let config = self.config.lock();
        f.debug_struct("ForgeClient")
            .field("base_url", &config.base_url)
            .field("token", &config.token.as_ref().map(|_| "<redacted>"))
            .field("user_agent", &config.user_agent)
            .finish_non_exhaustive()
    }
}

impl ForgeClient {
    /// A client for `base_url` using the default `ReqwestTransport`.
    ///
    /// `base_url` must end with `/`. This is not checked here; building a
    /// request against a bad base URL fails instead.
    pub fn new(base_url: &str) -> Self {
        Self::from_options(ClientOptions {
            base_url: base_url.to_string(),
            ..ClientOptions::default()
        })
    }

    pub fn from_options(options: ClientOptions) -> Self {
        Self {
            config: Mutex::new(Config {
                base_url: options.base_url,
                token: options.token,
                user_agent: options.user_agent,
                transport: Arc::new(ReqwestTransport::new()),
            }),
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.config.get_mut().token = Some(token.into());
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.get_mut().user_agent = user_agent.into();
        self
    }

    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.config.get_mut().transport = transport;
        self
    }

    pub fn set_base_url(&self, base_url: &str) {
        self.config.lock().base_url = base_url.to_string();
    }

    pub fn set_token(&self, token: Option<String>) {
        self.config.lock().token = token;
    }

    pub fn set_user_agent(&self, user_agent: &str) {
        self.config.lock().user_agent = user_agent.to_string();
    }

    pub fn set_transport(&self, transport: Arc<dyn Transport>) {
        self.config.lock().transport = transport;
    }

    pub fn base_url(&self) -> String {
        self.config.lock().base_url.clone()
    }

    pub fn user_agent(&self) -> String {
        self.config.lock().user_agent.clone()
    }

    fn transport(&self) -> Arc<dyn Transport> {
        Arc::clone(&self.config.lock().transport)
    }

    // -----------------------------------------------------------------------
    // Request building
    // -----------------------------------------------------------------------

    /// Build a body-less request for `path`, relative to the base URL.
    pub fn new_request(&self, method: HttpMethod, path: &str) -> Result<HttpRequest> {
        self.build_request(method, path, None)
    }

    /// Build a request whose body is `body` encoded as JSON.
    pub fn new_json_request<B: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        path: &str,
        body: &B,
    ) -> Result<HttpRequest> {
        let body = serde_json::to_string(body).map_err(Error::Encode)?;
        self.build_request(method, path, Some(body))
    }

    fn build_request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<String>,
    ) -> Result<HttpRequest> {
        let config = self.config.lock();
        if !config.base_url.ends_with('/') {
            return Err(Error::Config(format!(
                "BaseURL must have a trailing slash, but {:?} does not",
                config.base_url
            )));
        }
        let url = Url::parse(&config.base_url)?.join(path)?;

        let mut headers = vec![(ACCEPT.to_string(), JSON_MEDIA_TYPE.to_string())];
        if body.is_some() {
            headers.push((CONTENT_TYPE.to_string(), JSON_MEDIA_TYPE.to_string()));
        }
        let user_agent = if config.user_agent.is_empty() {
            DEFAULT_USER_AGENT
        } else {
            config.user_agent.as_str()
        };
        headers.push((USER_AGENT.to_string(), user_agent.to_string()));
        if let Some(token) = config.token.as_deref().filter(|token| !token.is_empty()) {
            headers.push((AUTHORIZATION.to_string(), format!("Bearer {token}")));
        }

        Ok(HttpRequest {
            method,
            url,
            headers,
            body,
        })
    }

    // -----------------------------------------------------------------------
    // Dispatch
    // -----------------------------------------------------------------------

    /// Execute `request` and classify the outcome.
    ///
    /// Returns the envelope and the response body for 2xx statuses; any other
    /// status becomes `Error::Api` or `Error::RateLimit`. `ctx` is required:
    /// `None` fails with `Error::MissingContext` before any I/O.
    pub async fn dispatch(
        &self,
        ctx: Option<&Context>,
        request: HttpRequest,
    ) -> Result<(Response, String)> {
        let ctx = ctx.ok_or(Error::MissingContext)?;
        let transport = self.transport();
        let method = request.method;
        let url = request.url.clone();

        debug!(%method, url = %sanitize_url(&url), "sending request");
        let http = ctx.run(transport.execute(request)).await??;
        debug!(%method, status = http.status, "received response");

        let response = Response::from_http(&http);
        check_response(method, &url, &http, response.rate)?;
        Ok((response, http.body))
    }

    /// `dispatch`, then decode the body into `T`.
    pub async fn send<T: DeserializeOwned>(
        &self,
        ctx: Option<&Context>,
        request: HttpRequest,
    ) -> Result<(T, Response)> {
        let (response, body) = self.dispatch(ctx, request).await?;
        let value = serde_json::from_str(&body).map_err(Error::Decode)?;
        Ok((value, response))
    }

    /// `dispatch`, discarding the body.
    pub async fn send_discard(
        &self,
        ctx: Option<&Context>,
        request: HttpRequest,
    ) -> Result<Response> {
        let (response, _) = self.dispatch(ctx, request).await?;
        Ok(response)
    }

    /// GET a collection at `path` and decode either list shape.
    ///
    /// A body-level `nextCursor` takes the place of the header cursor.
    pub(crate) async fn list<T: DeserializeOwned>(
        &self,
        ctx: &Context,
        path: &str,
        options: &ListOptions,
        field: &str,
    ) -> Result<(Vec<T>, Response)> {
        let request = self.new_request(HttpMethod::Get, &with_query(path, options.query()))?;
        let (mut response, body) = self.dispatch(Some(ctx), request).await?;
        let page = decode_list::<T>(&body, field).map_err(Error::Decode)?;
        if page.next_cursor.is_some() {
            response.next_cursor = page.next_cursor;
        }
        Ok((page.items, response))
    }
}

/// Map a non-2xx status to `ApiError`, or `RateLimitError` for 429.
pub fn check_response(
    method: HttpMethod,
    url: &Url,
    response: &HttpResponse,
    rate: Rate,
) -> Result<()> {
    if response.is_success() {
        return Ok(());
    }
    let api = ApiError {
        rate,
        ..ApiError::from_body(method, url, response.status, &response.body)
    };
    if response.status == 429 {
        warn!(
            %method,
            url = %api.url,
            remaining = rate.remaining,
            limit = rate.limit,
            reset = %rate.reset,
            "rate limited"
        );
        return Err(RateLimitError { api, rate }.into());
    }
    Err(api.into())
}
