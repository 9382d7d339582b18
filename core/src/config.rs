//! Client configuration.
//!
//! `ClientOptions` is the serializable form of what a `ForgeClient` needs to
//! start. It can be embedded in a caller's own config file (serde) or read
//! from the environment.

use std::env;

use serde::{Deserialize, Serialize};

pub const ENV_BASE_URL: &str = "FORGE_BASE_URL";
pub const ENV_TOKEN: &str = "FORGE_TOKEN";
pub const ENV_USER_AGENT: &str = "FORGE_USER_AGENT";

pub const DEFAULT_BASE_URL: &str = "http://localhost:4444/";
pub const DEFAULT_USER_AGENT: &str = concat!("forge-core/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientOptions {
    /// Must end with `/`; checked when a request is built.
    pub base_url: String,
    /// Bearer token. `None` or empty means no `Authorization` header.
    pub token: Option<String>,
    pub user_agent: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ClientOptions {
    /// Defaults overridden by `FORGE_BASE_URL`, `FORGE_TOKEN` and
    /// `FORGE_USER_AGENT` when set and non-empty.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|value| !value.is_empty());
        let defaults = Self::default();
        Self {
            base_url: get(ENV_BASE_URL).unwrap_or(defaults.base_url),
            token: get(ENV_TOKEN),
            user_agent: get(ENV_USER_AGENT).unwrap_or(defaults.user_agent),
        }
    }
}
