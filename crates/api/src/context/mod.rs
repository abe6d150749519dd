//! Application context - dependency injection container

use std::sync::Arc;

use eventforge_core::{DuplicationService, EventGateway};
use eventforge_domain::{Config, Result};
use eventforge_infra::MembershipClient;
use tracing::info;

/// Services shared by the CLI and every HTTP handler
pub struct AppContext {
    pub config: Config,
    pub duplication: Arc<DuplicationService>,
}

impl AppContext {
    /// Wire the membership API gateway from `config`.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: Config) -> Result<Self> {
        let client = MembershipClient::from_config(&config)?;
        info!(
            base_url = %config.api.base_url,
            account_seeded = config.account_id.is_some(),
            "EventForge context initialized"
        );
        Ok(Self::with_gateway(config, Arc::new(client)))
    }

    /// Context over an arbitrary gateway.
    pub fn with_gateway(config: Config, gateway: Arc<dyn EventGateway>) -> Self {
        Self { config, duplication: Arc::new(DuplicationService::new(gateway)) }
    }
}
