//! `EventGateway` implementation against the membership API

use std::sync::Arc;

use async_trait::async_trait;
use eventforge_core::EventGateway;
use eventforge_domain::constants::SERVICE_NAME;
use eventforge_domain::{
    AccountId, CloneFailure, CloneStage, Config, Event, EventDraft, EventForgeError, EventId,
    EventQuery, Result,
};
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use super::account::{AccountResolver, HttpAccountDirectory};
use super::auth::{AccessTokenProvider, TokenManager};
use super::cache::AccountIdCache;
use super::query::event_query_pairs;
use super::transport::ApiTransport;
use super::types::{cloned_event_id, parse_events, CloneEventRequest};
use crate::errors::InfraError;
use crate::http::HttpClient;

/// Event gateway backed by the remote membership API
pub struct MembershipClient {
    transport: ApiTransport,
    tokens: Arc<dyn AccessTokenProvider>,
    accounts: Arc<AccountResolver>,
}

impl MembershipClient {
    pub fn new(
        transport: ApiTransport,
        tokens: Arc<dyn AccessTokenProvider>,
        accounts: Arc<AccountResolver>,
    ) -> Self {
        Self { transport, tokens, accounts }
    }

    /// Wire the token manager, account resolver and transport from `config`.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(config.api.timeout())
            .max_attempts(config.api.max_attempts)
            .user_agent(format!("{SERVICE_NAME}/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        let transport = ApiTransport::new(http.clone(), &config.api.base_url);
        let tokens: Arc<dyn AccessTokenProvider> = Arc::new(TokenManager::new(
            http,
            &config.api.token_url,
            config.credentials.clone(),
        ));
        let directory = Arc::new(HttpAccountDirectory::new(transport.clone(), Arc::clone(&tokens)));
        let accounts = Arc::new(
            AccountResolver::new(directory)
                .with_cache(Arc::new(AccountIdCache::seeded(config.account_id))),
        );

        Ok(Self::new(transport, tokens, accounts))
    }

    pub fn accounts(&self) -> &Arc<AccountResolver> {
        &self.accounts
    }

    /// Drop the cached token and account id.
    pub fn clear_caches(&self) {
        self.tokens.clear_cache();
        self.accounts.clear_cache();
    }

    /// Token and account id, resolved concurrently.
    async fn session(&self) -> Result<(String, AccountId)> {
        tokio::try_join!(self.tokens.access_token(), self.accounts.account_id())
    }

    async fn fetch_event(&self, token: &str, account: AccountId, event_id: EventId) -> Result<Event> {
        let path = format!("/accounts/{account}/events/{event_id}");
        self.transport
            .execute(Method::GET, &path, token, &[], None)
            .await?
            .ensure_success(&format!("event {event_id}"))?
            .decode()
    }

    /// Invoke the clone RPC and return the new event id.
    async fn request_clone(&self, token: &str, account: AccountId, template_id: EventId) -> Result<EventId> {
        let body = to_json(&CloneEventRequest { event_id: template_id })?;
        let response = self
            .transport
            .execute(Method::POST, &format!("/rpc/{account}/CloneEvent"), token, &[], Some(&body))
            .await?
            .ensure_success(&format!("event {template_id}"))?;

        let value = response.json_value()?;
        cloned_event_id(&value).ok_or_else(|| EventForgeError::Remote {
            status: response.status.as_u16(),
            body: format!("unrecognised clone response: {}", response.body),
        })
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value).map_err(|e| InfraError::from(e).into())
}

#[async_trait]
impl EventGateway for MembershipClient {
    #[instrument(skip(self))]
    async fn get_event(&self, event_id: EventId) -> Result<Event> {
        let (token, account) = self.session().await?;
        self.fetch_event(&token, account, event_id).await
    }

    #[instrument(skip(self, draft), fields(name = %draft.name))]
    async fn create_event(&self, draft: &EventDraft) -> Result<Event> {
        draft.validate_window()?;
        let (token, account) = self.session().await?;

        let body = to_json(draft)?;
        let event: Event = self
            .transport
            .execute(Method::POST, &format!("/accounts/{account}/events"), &token, &[], Some(&body))
            .await?
            .ensure_success("events collection")?
            .decode()?;

        info!(event_id = event.id, "Created event");
        Ok(event)
    }

    #[instrument(skip(self, query))]
    async fn list_events(&self, query: &EventQuery) -> Result<Vec<Event>> {
        let (token, account) = self.session().await?;

        let pairs = event_query_pairs(query);
        let response = self
            .transport
            .execute(Method::GET, &format!("/accounts/{account}/events"), &token, &pairs, None)
            .await?
            .ensure_success("events collection")?;

        let mut events = parse_events(response.json_value()?)?;
        events.sort_by_key(|event| event.start_date.ordering_key());
        debug!(count = events.len(), "Listed events");
        Ok(events)
    }

    #[instrument(skip(self))]
    async fn clone_event(&self, template_id: EventId) -> Result<Event> {
        let (token, account) = self.session().await?;

        let new_id = self.request_clone(&token, account, template_id).await.map_err(|err| {
            warn!(template_id, error = %err, "Clone request failed");
            EventForgeError::from(CloneFailure::from_error(template_id, CloneStage::Clone, &err))
        })?;

        let clone = self.fetch_event(&token, account, new_id).await.map_err(|err| {
            warn!(template_id, clone_id = new_id, error = %err, "Fetching clone failed");
            EventForgeError::from(CloneFailure::from_error(template_id, CloneStage::Fetch, &err))
        })?;

        info!(template_id, clone_id = clone.id, "Cloned event");
        Ok(clone)
    }

    #[instrument(skip(self, event), fields(event_id = event.id))]
    async fn update_event(&self, event: &Event) -> Result<Event> {
        event.validate_window()?;
        let (token, account) = self.session().await?;

        let body = to_json(event)?;
        let response = self
            .transport
            .execute(
                Method::PUT,
                &format!("/accounts/{account}/events/{}", event.id),
                &token,
                &[],
                Some(&body),
            )
            .await?
            .ensure_success(&format!("event {}", event.id))?;

        // some deployments answer an update with an empty body
        match response.json_value()? {
            Value::Null => Ok(event.clone()),
            value => serde_json::from_value(value).map_err(|e| InfraError::from(e).into()),
        }
    }
}
