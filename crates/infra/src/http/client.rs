use std::time::Duration;

use eventforge_domain::constants::{DEFAULT_HTTP_MAX_ATTEMPTS, DEFAULT_HTTP_TIMEOUT_SECS};
use eventforge_domain::{EventForgeError, Result};
use reqwest::{Client as ReqwestClient, Method, Request, RequestBuilder, Response};
use tracing::debug;

use crate::errors::InfraError;

const DEFAULT_BASE_BACKOFF: Duration = Duration::from_millis(200);
const MAX_BACKOFF_DOUBLINGS: u32 = 8;

/// When and how often a request may be replayed
///
/// Only `GET` and `HEAD` are replayed. Token exchange, create, clone and
/// update get exactly one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub base_backoff: Duration,
}

impl RetryPolicy {
    /// Total attempts allowed for `method`.
    pub fn attempts_for(&self, method: &Method) -> usize {
        if *method == Method::GET || *method == Method::HEAD {
            self.max_attempts.max(1)
        } else {
            1
        }
    }

    /// Delay before retry number `retry` (1-based), doubling each time.
    pub fn delay_before(&self, retry: usize) -> Duration {
        let doublings = u32::try_from(retry.saturating_sub(1)).unwrap_or(u32::MAX);
        self.base_backoff.saturating_mul(1 << doublings.min(MAX_BACKOFF_DOUBLINGS))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_attempts: DEFAULT_HTTP_MAX_ATTEMPTS, base_backoff: DEFAULT_BASE_BACKOFF }
    }
}

enum Attempt {
    Done(Response),
    Retry,
    Failed(EventForgeError),
}

/// Shared reqwest wrapper used for every remote call
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    retry: RetryPolicy,
}

impl HttpClient {
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Client with default timeout and no retries.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Execute `builder`, replaying idempotent reads on 5xx or transport errors.
    ///
    /// Non-5xx responses are returned as-is; status handling belongs to the
    /// caller.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let first = build_request(&builder)?;
        let attempts = self.retry.attempts_for(first.method());
        let mut request = Some(first);

        for attempt in 1..=attempts {
            let current = match request.take() {
                Some(prepared) => prepared,
                None => build_request(&builder)?,
            };

            match self.attempt(current, attempt < attempts).await {
                Attempt::Done(response) => return Ok(response),
                Attempt::Failed(error) => return Err(error),
                Attempt::Retry => {
                    let delay = self.retry.delay_before(attempt);
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }

        Err(EventForgeError::Network(format!("request gave up after {attempts} attempts")))
    }

    async fn attempt(&self, request: Request, may_retry: bool) -> Attempt {
        let method = request.method().clone();
        let path = request.url().path().to_string();
        debug!(%method, %path, "sending HTTP request");

        match self.client.execute(request).await {
            Ok(response) if may_retry && response.status().is_server_error() => {
                debug!(%method, %path, status = %response.status(), "server error, retrying");
                Attempt::Retry
            }
            Ok(response) => {
                debug!(%method, %path, status = %response.status(), "received HTTP response");
                Attempt::Done(response)
            }
            Err(err) if may_retry && is_transient(&err) => {
                debug!(%method, %path, error = %err, "transport error, retrying");
                Attempt::Retry
            }
            Err(err) => Attempt::Failed(InfraError::from(err).into()),
        }
    }
}

fn build_request(builder: &RequestBuilder) -> Result<Request> {
    builder
        .try_clone()
        .ok_or_else(|| EventForgeError::Internal("streaming request bodies are not supported".into()))?
        .build()
        .map_err(|err| InfraError::from(err).into())
}

fn is_transient(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect() || err.is_request()
}

/// Builder for [`HttpClient`]
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    retry: RetryPolicy,
    user_agent: Option<String>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            retry: RetryPolicy::default(),
            user_agent: None,
        }
    }
}

impl HttpClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Total attempts for reads, including the first one.
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.retry.max_attempts = attempts.max(1);
        self
    }

    pub fn base_backoff(mut self, backoff: Duration) -> Self {
        self.retry.base_backoff = backoff;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn build(self) -> Result<HttpClient> {
        let mut builder = ReqwestClient::builder().timeout(self.timeout).no_proxy();
        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        let client = builder.build().map_err(InfraError::from)?;
        Ok(HttpClient { client, retry: self.retry })
    }
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use reqwest::StatusCode;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn retrying_client() -> HttpClient {
        HttpClient::builder()
            .base_backoff(Duration::from_millis(5))
            .max_attempts(3)
            .build()
            .expect("http client")
    }

    async fn server_answering(verb: &str, status: u16, expected_calls: u64) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method(verb))
            .respond_with(ResponseTemplate::new(status))
            .expect(expected_calls)
            .mount(&server)
            .await;
        server
    }

    #[test]
    fn only_reads_get_more_than_one_attempt() {
        let policy = RetryPolicy { max_attempts: 4, base_backoff: Duration::ZERO };
        assert_eq!(policy.attempts_for(&Method::GET), 4);
        assert_eq!(policy.attempts_for(&Method::HEAD), 4);
        assert_eq!(policy.attempts_for(&Method::POST), 1);
        assert_eq!(policy.attempts_for(&Method::PUT), 1);
    }

    #[test]
    fn backoff_doubles_and_is_capped() {
        let policy = RetryPolicy { max_attempts: 3, base_backoff: Duration::from_millis(100) };
        assert_eq!(policy.delay_before(1), Duration::from_millis(100));
        assert_eq!(policy.delay_before(3), Duration::from_millis(400));
        assert_eq!(policy.delay_before(50), Duration::from_millis(100 * 256));
    }

    #[tokio::test]
    async fn default_client_makes_a_single_attempt() {
        let server = server_answering("GET", 502, 1).await;

        let client = HttpClient::new().expect("http client");
        let response =
            client.send(client.request(Method::GET, server.uri())).await.expect("response");

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn get_is_replayed_until_the_server_recovers() {
        let server = MockServer::start().await;
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        Mock::given(method("GET"))
            .respond_with(move |_req: &wiremock::Request| {
                if seen.fetch_add(1, Ordering::SeqCst) < 2 {
                    ResponseTemplate::new(503)
                } else {
                    ResponseTemplate::new(200)
                }
            })
            .expect(3)
            .mount(&server)
            .await;

        let client = retrying_client();
        let response =
            client.send(client.request(Method::GET, server.uri())).await.expect("response");

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn last_server_error_is_returned_when_attempts_run_out() {
        let server = server_answering("GET", 500, 3).await;

        let client = retrying_client();
        let response =
            client.send(client.request(Method::GET, server.uri())).await.expect("response");

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn mutations_are_sent_once() {
        let server = server_answering("POST", 500, 1).await;

        let client = retrying_client();
        let response = client
            .send(client.request(Method::POST, server.uri()).body("{\"EventId\":1}"))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn client_errors_are_not_replayed() {
        let server = server_answering("GET", 404, 1).await;

        let client = retrying_client();
        let response =
            client.send(client.request(Method::GET, server.uri())).await.expect("response");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn refused_connection_is_a_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = retrying_client();
        let err = client
            .send(client.request(Method::GET, format!("http://{addr}")))
            .await
            .unwrap_err();

        assert!(
            matches!(&err, EventForgeError::Network(msg) if msg.to_lowercase().contains("connection")),
            "unexpected error: {err:?}"
        );
    }
}
