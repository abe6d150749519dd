//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Remote API defaults
pub const DEFAULT_TOKEN_URL: &str = "https://oauth.wildapricot.org/auth/token";
pub const DEFAULT_API_BASE_URL: &str = "https://api.wildapricot.org/v2.2";
pub const DEFAULT_SCOPE: &str = "auto";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_HTTP_MAX_ATTEMPTS: usize = 1;

// Token lifecycle
pub const TOKEN_EXPIRY_MARGIN_SECS: i64 = 30;
pub const API_KEY_USERNAME: &str = "APIKEY";

// Event listing
pub const DEFAULT_PAGE_SIZE: u32 = 25;
pub const EVENT_ORDER_BY: &str = "StartDate asc";

// Name template tokens
pub const NAME_TOKEN: &str = "${NAME}";
pub const YEAR_TOKEN: &str = "${YYYY}";
pub const MONTH_TOKEN: &str = "${MM}";
pub const DAY_TOKEN: &str = "${DD}";

// Remote-owned event fields that never go into a create payload
pub const REMOTE_OWNED_EVENT_FIELDS: &[&str] =
    &["Id", "Url", "RegistrationsCount", "CreatedDate", "ModifiedDate"];

// HTTP service
pub const DEFAULT_SERVER_BIND: &str = "0.0.0.0";
pub const DEFAULT_SERVER_PORT: u16 = 8787;
pub const SERVICE_NAME: &str = "eventforge";
