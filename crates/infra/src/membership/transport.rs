//! Authenticated JSON calls against the membership API base URL

use std::time::Instant;

use eventforge_domain::{EventForgeError, Result};
use reqwest::header::ACCEPT;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::errors::{status_error, InfraError};
use crate::http::HttpClient;

/// Status and raw body of a completed call
#[derive(Debug)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Body as JSON; an empty body reads as `null`.
    ///
    /// # Errors
    /// Returns `EventForgeError::Internal` for a non-JSON body.
    pub fn json_value(&self) -> Result<Value> {
        if self.body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&self.body).map_err(|e| InfraError::from(e).into())
    }

    /// # Errors
    /// Returns `EventForgeError::Internal` when the body does not match `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.body).map_err(|e| InfraError::from(e).into())
    }

    /// Turn a non-success response into a domain error.
    pub fn into_error(self, context: &str) -> EventForgeError {
        status_error(self.status, context, self.body)
    }

    /// Pass success through, map anything else with [`Self::into_error`].
    ///
    /// # Errors
    /// Returns `NotFound` for 404 and `Remote` for other failures.
    pub fn ensure_success(self, context: &str) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(self.into_error(context))
        }
    }
}

/// HTTP client bound to the API base URL
#[derive(Clone)]
pub struct ApiTransport {
    http: HttpClient,
    base_url: String,
}

impl ApiTransport {
    pub fn new(http: HttpClient, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Issue one bearer-authenticated call and buffer the response body.
    ///
    /// # Errors
    /// Only transport failures are errors here; non-success statuses are
    /// returned for the caller to interpret.
    pub async fn execute(
        &self,
        method: Method,
        path: &str,
        token: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<ApiResponse> {
        let started = Instant::now();

        let mut request = self
            .http
            .request(method.clone(), self.url(path))
            .bearer_auth(token)
            .header(ACCEPT, "application/json");
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = self.http.send(request).await?;
        let status = response.status();
        let body = response.text().await.map_err(|e| EventForgeError::from(InfraError::from(e)))?;

        debug!(
            %method,
            path,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "membership API call finished"
        );

        Ok(ApiResponse { status, body })
    }
}
