//! Account id resolution with single-flight discovery
//!
//! Every event path is scoped by the account id. It is discovered once from
//! `GET /accounts` (unless seeded from configuration) and cached for the
//! life of the process. Concurrent callers that arrive while discovery is in
//! progress all await the same lookup, so at most one discovery request is
//! in flight at any time.

use std::sync::Arc;

use async_trait::async_trait;
use eventforge_domain::{AccountId, EventForgeError, Result};
use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use reqwest::Method;
use tracing::{debug, info, warn};

use super::auth::AccessTokenProvider;
use super::cache::AccountIdCache;
use super::transport::ApiTransport;
use super::types::first_account_id;

/// Source of the account id
#[async_trait]
pub trait AccountDirectory: Send + Sync {
    /// Id of the first account visible to the current credentials.
    async fn first_account_id(&self) -> Result<AccountId>;
}

/// `GET /accounts` against the remote API
pub struct HttpAccountDirectory {
    transport: ApiTransport,
    tokens: Arc<dyn AccessTokenProvider>,
}

impl HttpAccountDirectory {
    pub fn new(transport: ApiTransport, tokens: Arc<dyn AccessTokenProvider>) -> Self {
        Self { transport, tokens }
    }
}

#[async_trait]
impl AccountDirectory for HttpAccountDirectory {
    async fn first_account_id(&self) -> Result<AccountId> {
        let token = self.tokens.access_token().await?;
        let response = self.transport.execute(Method::GET, "/accounts", &token, &[], None).await?;

        if !response.is_success() {
            return Err(EventForgeError::Discovery(format!(
                "account listing returned status {}: {}",
                response.status.as_u16(),
                response.body
            )));
        }

        let body = response
            .json_value()
            .map_err(|e| EventForgeError::Discovery(format!("malformed account listing: {e}")))?;
        first_account_id(&body)
    }
}

type PendingLookup = Shared<BoxFuture<'static, Result<AccountId>>>;

/// Resolves and caches the account id
pub struct AccountResolver {
    directory: Arc<dyn AccountDirectory>,
    cache: Arc<AccountIdCache>,
    pending: Arc<Mutex<Option<PendingLookup>>>,
}

impl AccountResolver {
    pub fn new(directory: Arc<dyn AccountDirectory>) -> Self {
        Self {
            directory,
            cache: Arc::new(AccountIdCache::new()),
            pending: Arc::new(Mutex::new(None)),
        }
    }

    /// Use an externally owned (possibly seeded) cache.
    pub fn with_cache(mut self, cache: Arc<AccountIdCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn cache(&self) -> &Arc<AccountIdCache> {
        &self.cache
    }

    /// Cached account id, discovering it on first use.
    ///
    /// # Errors
    /// Returns `Discovery` for an unusable account listing and propagates
    /// token failures. Failures are not cached; the next call retries.
    pub async fn account_id(&self) -> Result<AccountId> {
        if let Some(id) = self.cache.get() {
            return Ok(id);
        }

        let lookup = {
            let mut slot = self.pending.lock();
            // a lookup may have finished between the fast path and the lock
            if let Some(id) = self.cache.get() {
                return Ok(id);
            }
            match slot.as_ref() {
                Some(pending) => {
                    debug!("Joining in-flight account discovery");
                    pending.clone()
                }
                None => {
                    let lookup = self.start_lookup();
                    *slot = Some(lookup.clone());
                    lookup
                }
            }
        };

        lookup.await
    }

    /// Drop the cached id; the next call discovers it again.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    fn start_lookup(&self) -> PendingLookup {
        let directory = Arc::clone(&self.directory);
        let cache = Arc::clone(&self.cache);
        let pending = Arc::clone(&self.pending);

        async move {
            let result = directory.first_account_id().await;
            match &result {
                Ok(id) => {
                    cache.set(*id);
                    info!(account_id = id, "Discovered account id");
                }
                Err(err) => warn!(error = %err, "Account discovery failed"),
            }
            *pending.lock() = None;
            result
        }
        .boxed()
        .shared()
    }
}
