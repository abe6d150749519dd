//! Membership-management API adapter
//!
//! - `auth`: client-credentials token manager
//! - `account`: account id resolution with single-flight discovery
//! - `client`: the `EventGateway` implementation
//!
//! Every event call resolves a token and the account id concurrently before
//! it touches the network.

pub mod account;
pub mod auth;
pub mod cache;
pub mod client;
pub mod query;
pub mod transport;
pub mod types;

pub use account::{AccountDirectory, AccountResolver, HttpAccountDirectory};
pub use auth::{AccessTokenProvider, TokenManager};
pub use cache::{AccountIdCache, CachedToken, TokenCache};
pub use client::MembershipClient;
pub use transport::{ApiResponse, ApiTransport};
