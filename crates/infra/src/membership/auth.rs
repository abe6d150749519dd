//! Bearer tokens from the API-key client-credentials flow
//!
//! The API key is exchanged at the token endpoint using HTTP Basic auth with
//! the fixed username `APIKEY`. Tokens are cached until shortly before they
//! expire.

use std::sync::Arc;

use async_trait::async_trait;
use base64::prelude::{Engine as _, BASE64_STANDARD};
use chrono::Utc;
use eventforge_domain::constants::{API_KEY_USERNAME, TOKEN_EXPIRY_MARGIN_SECS};
use eventforge_domain::{Credentials, EventForgeError, Result};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::Method;
use tracing::{debug, info, instrument, warn};

use super::cache::TokenCache;
use super::types::TokenResponse;
use crate::http::HttpClient;

/// Trait for providing access tokens
///
/// This trait allows dependency injection and testing with mock providers.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// Get a valid access token, exchanging credentials when needed.
    async fn access_token(&self) -> Result<String>;

    /// Forget any cached token so the next call exchanges again.
    fn clear_cache(&self) {}
}

/// Token manager for the client-credentials flow
pub struct TokenManager {
    http: HttpClient,
    token_url: String,
    credentials: Credentials,
    cache: Arc<TokenCache>,
}

impl TokenManager {
    pub fn new(http: HttpClient, token_url: impl Into<String>, credentials: Credentials) -> Self {
        Self { http, token_url: token_url.into(), credentials, cache: Arc::new(TokenCache::new()) }
    }

    /// Use an externally owned cache.
    pub fn with_cache(mut self, cache: Arc<TokenCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn cache(&self) -> &Arc<TokenCache> {
        &self.cache
    }

    /// Return a token valid for more than the expiry margin.
    ///
    /// # Errors
    /// Returns `EventForgeError::Authentication` when the exchange fails for
    /// any reason. The cache is left untouched in that case.
    pub async fn valid_token(&self) -> Result<String> {
        let now = Utc::now().timestamp();
        if let Some(token) = self.cache.get_valid(now, TOKEN_EXPIRY_MARGIN_SECS) {
            debug!("Using cached access token");
            return Ok(token);
        }

        let response = self.exchange().await?;
        self.cache.set(response.access_token.clone(), now.saturating_add(response.expires_in));
        info!(expires_in = response.expires_in, "Obtained access token");

        Ok(response.access_token)
    }

    #[instrument(skip(self), fields(token_url = %self.token_url))]
    async fn exchange(&self) -> Result<TokenResponse> {
        let credentials =
            BASE64_STANDARD.encode(format!("{API_KEY_USERNAME}:{}", self.credentials.api_key));
        let form = [("grant_type", "client_credentials"), ("scope", self.credentials.scope.as_str())];

        let request = self
            .http
            .request(Method::POST, &self.token_url)
            .header(AUTHORIZATION, format!("Basic {credentials}"))
            .header(ACCEPT, "application/json")
            .form(&form);

        let response = self.http.send(request).await.map_err(|err| {
            warn!(error = %err, "Token exchange request failed");
            EventForgeError::Authentication { status: None, message: err.to_string() }
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|err| EventForgeError::Authentication {
            status: Some(status.as_u16()),
            message: format!("failed to read token response: {err}"),
        })?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "Token exchange rejected");
            return Err(EventForgeError::Authentication { status: Some(status.as_u16()), message: body });
        }

        serde_json::from_str(&body).map_err(|err| EventForgeError::Authentication {
            status: Some(status.as_u16()),
            message: format!("invalid token response: {err}"),
        })
    }
}

#[async_trait]
impl AccessTokenProvider for TokenManager {
    async fn access_token(&self) -> Result<String> {
        self.valid_token().await
    }

    fn clear_cache(&self) {
        self.cache.clear();
    }
}
