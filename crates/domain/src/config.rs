//! Configuration structures
//!
//! Loaded once at startup by `eventforge-infra::config` and shared read-only
//! afterwards.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_API_BASE_URL, DEFAULT_HTTP_MAX_ATTEMPTS, DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_SCOPE,
    DEFAULT_SERVER_BIND, DEFAULT_SERVER_PORT, DEFAULT_TOKEN_URL,
};
use crate::types::AccountId;

/// Top-level application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub credentials: Credentials,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub server: ServerConfig,
    /// Seeds the account id cache and skips discovery entirely
    #[serde(default)]
    pub account_id: Option<AccountId>,
}

impl Config {
    /// Configuration with default endpoints for the given API key.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            credentials: Credentials::new(api_key, DEFAULT_SCOPE),
            api: ApiConfig::default(),
            server: ServerConfig::default(),
            account_id: None,
        }
    }
}

/// API key credentials exchanged for bearer tokens
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub api_key: String,
    #[serde(default = "default_scope")]
    pub scope: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, scope: impl Into<String>) -> Self {
        Self { api_key: api_key.into(), scope: scope.into() }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("scope", &self.scope)
            .finish()
    }
}

/// Remote API endpoints and transport settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub token_url: String,
    pub base_url: String,
    pub timeout_secs: u64,
    /// Total attempts for idempotent reads (1 disables retries)
    pub max_attempts: usize,
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            token_url: DEFAULT_TOKEN_URL.to_string(),
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            max_attempts: DEFAULT_HTTP_MAX_ATTEMPTS,
        }
    }
}

/// HTTP service listener settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind_address: DEFAULT_SERVER_BIND.to_string(), port: DEFAULT_SERVER_PORT }
    }
}

fn default_scope() -> String {
    DEFAULT_SCOPE.to_string()
}
