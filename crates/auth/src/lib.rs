//! Authentication for the dialog service
//!
//! Resolves bearer tokens and identity keys against the identity service and
//! provides the pipeline stage that authenticates public requests. Handlers
//! behind that stage receive an [`Authenticated`] request instead of a plain
//! one.

mod authenticated;
mod config;
mod error;
mod guard;
pub mod mock;
pub mod rest;
mod types;

pub use authenticated::Authenticated;
pub use config::IdentityConfig;
pub use error::{AuthError, IdentityError};
pub use guard::{bearer_token, Authenticate};
pub use types::Identity;

use std::sync::Arc;

/// Contract for resolving users known to the identity service
#[async_trait::async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Resolve the user owning a bearer token
    async fn resolve_by_token(&self, token: &str) -> Result<Identity, IdentityError>;

    /// Resolve a user by identity key
    async fn resolve_by_id(&self, id: &str) -> Result<Identity, IdentityError>;
}

/// Identity resolver factory
pub struct IdentityResolverFactory;

impl IdentityResolverFactory {
    /// Create an identity resolver based on configuration
    pub fn create(config: IdentityConfig) -> Result<Arc<dyn IdentityResolver>, IdentityError> {
        match config.provider.as_str() {
            "rest" => {
                tracing::info!(base_url = %config.base_url, "Creating REST identity resolver");
                Ok(Arc::new(rest::RestIdentityResolver::new(&config)?))
            }
            "mock" => {
                tracing::info!("Creating mock identity resolver");
                Ok(Arc::new(mock::MockIdentityResolver::new()))
            }
            other => Err(IdentityError::Configuration(format!(
                "Unknown identity provider: {}",
                other
            ))),
        }
    }
}
