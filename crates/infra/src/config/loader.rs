//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. Only if the API key is not set there, falls back to loading from file
//!    (an invalid variable next to a set key is an error)
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `EVENTFORGE_API_KEY`: API key exchanged for bearer tokens (required)
//! - `EVENTFORGE_SCOPE`: OAuth scope (default `auto`)
//! - `EVENTFORGE_ACCOUNT_ID`: Seeds the account id; non-numeric values are ignored
//! - `EVENTFORGE_TOKEN_URL`: Token endpoint
//! - `EVENTFORGE_API_BASE`: Base URL of the remote API
//! - `EVENTFORGE_HTTP_TIMEOUT_SECS`: Request timeout in seconds
//! - `EVENTFORGE_HTTP_MAX_ATTEMPTS`: Attempts for idempotent reads
//! - `EVENTFORGE_BIND`: HTTP service bind address
//! - `EVENTFORGE_PORT`: HTTP service port
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./eventforge.json` or `./eventforge.toml` (current working directory)
//! 2. `./config.json` or `./config.toml` (current working directory)
//! 3. The same names in the parent and grandparent directories
//! 4. Relative to executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use eventforge_domain::{AccountId, Config, EventForgeError, Result};
use url::Url;

const ENV_API_KEY: &str = "EVENTFORGE_API_KEY";
const ENV_SCOPE: &str = "EVENTFORGE_SCOPE";
const ENV_ACCOUNT_ID: &str = "EVENTFORGE_ACCOUNT_ID";
const ENV_TOKEN_URL: &str = "EVENTFORGE_TOKEN_URL";
const ENV_API_BASE: &str = "EVENTFORGE_API_BASE";
const ENV_HTTP_TIMEOUT_SECS: &str = "EVENTFORGE_HTTP_TIMEOUT_SECS";
const ENV_HTTP_MAX_ATTEMPTS: &str = "EVENTFORGE_HTTP_MAX_ATTEMPTS";
const ENV_BIND: &str = "EVENTFORGE_BIND";
const ENV_PORT: &str = "EVENTFORGE_PORT";

const CONFIG_FILE_NAMES: [&str; 4] =
    ["eventforge.json", "eventforge.toml", "config.json", "config.toml"];

/// Load configuration with automatic fallback strategy
///
/// Uses environment variables when `EVENTFORGE_API_KEY` is set. Only when the
/// key is absent does it fall back to a config file.
///
/// # Errors
/// Returns `EventForgeError::Config` if:
/// - The API key is set but another variable is invalid
/// - The API key is not set and no usable config file is found
/// - File format is invalid
/// - Required fields are missing
pub fn load() -> Result<Config> {
    load_with(|key| std::env::var(key).ok(), || load_from_file(None))
}

fn load_with<F, G>(lookup: F, from_file: G) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
    G: FnOnce() -> Result<Config>,
{
    let has_api_key = lookup(ENV_API_KEY).is_some_and(|key| !key.trim().is_empty());
    if !has_api_key {
        tracing::debug!("{ENV_API_KEY} not set, trying config file");
        return from_file();
    }

    let config = load_from_lookup(lookup)?;
    tracing::info!("Configuration loaded from environment variables");
    Ok(config)
}

/// Load configuration from the process environment
///
/// # Errors
/// Returns `EventForgeError::Config` if the API key is missing or a numeric
/// variable has an invalid value.
pub fn load_from_env() -> Result<Config> {
    load_from_lookup(|key| std::env::var(key).ok())
}

/// Load configuration through an arbitrary variable lookup
///
/// Unset optional variables keep their defaults. Blank values count as
/// unset.
///
/// # Errors
/// Returns `EventForgeError::Config` if the API key is missing or a numeric
/// variable has an invalid value.
pub fn load_from_lookup<F>(lookup: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    let api_key = get(ENV_API_KEY).ok_or_else(|| {
        EventForgeError::Config(format!("Missing required environment variable: {ENV_API_KEY}"))
    })?;

    let mut config = Config::with_api_key(api_key);

    if let Some(scope) = get(ENV_SCOPE) {
        config.credentials.scope = scope;
    }
    if let Some(token_url) = get(ENV_TOKEN_URL) {
        config.api.token_url = token_url;
    }
    if let Some(base_url) = get(ENV_API_BASE) {
        config.api.base_url = base_url;
    }
    if let Some(raw) = get(ENV_HTTP_TIMEOUT_SECS) {
        config.api.timeout_secs = parse_var(ENV_HTTP_TIMEOUT_SECS, &raw)?;
    }
    if let Some(raw) = get(ENV_HTTP_MAX_ATTEMPTS) {
        config.api.max_attempts = parse_var(ENV_HTTP_MAX_ATTEMPTS, &raw)?;
    }
    if let Some(bind) = get(ENV_BIND) {
        config.server.bind_address = bind;
    }
    if let Some(raw) = get(ENV_PORT) {
        config.server.port = parse_var(ENV_PORT, &raw)?;
    }

    config.account_id = get(ENV_ACCOUNT_ID).and_then(|raw| parse_account_id(&raw));

    validate(&config)?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `EventForgeError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Required fields are missing
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(EventForgeError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            EventForgeError::Config(format!(
                "{ENV_API_KEY} is not set and no config file was found in any of the standard locations"
            ))
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| EventForgeError::Config(format!("Failed to read config file: {e}")))?;

    let config = parse_config(&contents, &config_path)?;
    validate(&config)?;
    Ok(config)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| EventForgeError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| EventForgeError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(EventForgeError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files
///
/// Searches the current working directory, its parent and grandparent, then
/// the executable's directory and its parent.
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        roots.extend(cwd.ancestors().take(3).map(Path::to_path_buf));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            roots.extend(exe_dir.ancestors().take(2).map(Path::to_path_buf));
        }
    }

    probe_roots(&roots)
}

fn probe_roots(roots: &[PathBuf]) -> Option<PathBuf> {
    roots
        .iter()
        .flat_map(|root| CONFIG_FILE_NAMES.iter().map(move |name| root.join(name)))
        .find(|path| path.is_file())
}

fn validate(config: &Config) -> Result<()> {
    if config.credentials.api_key.trim().is_empty() {
        return Err(EventForgeError::Config("API key must not be empty".into()));
    }
    if config.api.max_attempts == 0 {
        return Err(EventForgeError::Config("max_attempts must be at least 1".into()));
    }
    for (name, raw) in [("token_url", &config.api.token_url), ("base_url", &config.api.base_url)] {
        let parsed = Url::parse(raw)
            .map_err(|e| EventForgeError::Config(format!("{name} is not a valid URL '{raw}': {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(EventForgeError::Config(format!("{name} must be an http(s) URL: {raw}")));
        }
    }
    Ok(())
}

fn parse_var<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>().map_err(|e| EventForgeError::Config(format!("Invalid {key} '{raw}': {e}")))
}

fn parse_account_id(raw: &str) -> Option<AccountId> {
    match raw.parse::<AccountId>() {
        Ok(id) => Some(id),
        Err(_) => {
            tracing::warn!(
                value = raw,
                "Ignoring non-numeric EVENTFORGE_ACCOUNT_ID; account will be discovered"
            );
            None
        }
    }
}
