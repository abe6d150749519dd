//! Process-local caches for the bearer token and the account id
//!
//! Both caches are plain objects owned by their manager and injectable for
//! tests. Locks are only held for the duration of a read or write, never
//! across an `.await`.

use eventforge_domain::AccountId;
use parking_lot::Mutex;

/// A bearer token together with its absolute expiry (unix seconds)
#[derive(Clone, PartialEq, Eq)]
pub struct CachedToken {
    pub token: String,
    pub expires_at: i64,
}

impl std::fmt::Debug for CachedToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedToken")
            .field("token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Holds at most one bearer token
#[derive(Debug, Default)]
pub struct TokenCache {
    entry: Mutex<Option<CachedToken>>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache pre-filled with `token`, for tests and warm starts.
    pub fn seeded(token: impl Into<String>, expires_at: i64) -> Self {
        Self { entry: Mutex::new(Some(CachedToken { token: token.into(), expires_at })) }
    }

    /// The cached token if it expires more than `margin_secs` after `now`.
    pub fn get_valid(&self, now: i64, margin_secs: i64) -> Option<String> {
        self.entry
            .lock()
            .as_ref()
            .filter(|entry| entry.expires_at.saturating_sub(now) > margin_secs)
            .map(|entry| entry.token.clone())
    }

    pub fn set(&self, token: String, expires_at: i64) {
        *self.entry.lock() = Some(CachedToken { token, expires_at });
    }

    pub fn clear(&self) {
        *self.entry.lock() = None;
    }

    pub fn snapshot(&self) -> Option<CachedToken> {
        self.entry.lock().clone()
    }
}

/// Holds the resolved account id
#[derive(Debug, Default)]
pub struct AccountIdCache {
    value: Mutex<Option<AccountId>>,
}

impl AccountIdCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded(account_id: Option<AccountId>) -> Self {
        Self { value: Mutex::new(account_id) }
    }

    pub fn get(&self) -> Option<AccountId> {
        *self.value.lock()
    }

    pub fn set(&self, account_id: AccountId) {
        *self.value.lock() = Some(account_id);
    }

    pub fn clear(&self) {
        *self.value.lock() = None;
    }
}
