//! Identity resolver configuration

use std::time::Duration;

use dialog_common::config::Config;

/// Identity resolver configuration
#[derive(Debug, Clone)]
pub struct IdentityConfig {
    /// Resolver provider (rest, mock)
    pub provider: String,
    /// Base URL of the identity service
    pub base_url: String,
    /// Timeout applied to every identity service request
    pub timeout: Duration,
}

impl From<&Config> for IdentityConfig {
    fn from(config: &Config) -> Self {
        Self {
            provider: config.identity_provider.clone(),
            base_url: config.identity_base_url.clone(),
            timeout: Duration::from_secs(config.identity_timeout_secs),
        }
    }
}
