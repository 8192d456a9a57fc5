//! Mock Identity Resolver Implementation
//!
//! In-memory token and id registry for local development and tests.
//! Thread-safe via `Arc<Mutex<>>`; clones share the same registry.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::IdentityError;
use crate::types::Identity;
use crate::IdentityResolver;

#[derive(Debug, Default)]
struct Registry {
    by_token: HashMap<String, Identity>,
    by_id: HashMap<String, Identity>,
    failure: Option<String>,
}

/// Mock identity resolver for testing
#[derive(Debug, Clone, Default)]
pub struct MockIdentityResolver {
    registry: Arc<Mutex<Registry>>,
}

impl MockIdentityResolver {
    /// Create an empty resolver; every lookup is not-found
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`add_user`](Self::add_user)
    pub fn with_user(self, token: &str, id: &str) -> Self {
        self.add_user(token, id);
        self
    }

    /// Register a user reachable both by token and by id
    pub fn add_user(&self, token: &str, id: &str) {
        let mut registry = self.lock();
        registry
            .by_token
            .insert(token.to_string(), Identity::new(id));
        registry.by_id.insert(id.to_string(), Identity::new(id));
    }

    /// Register a user that has no active token
    pub fn add_identity(&self, id: &str) {
        self.lock().by_id.insert(id.to_string(), Identity::new(id));
    }

    /// Make every following lookup fail with a generic resolver failure
    pub fn fail_with(&self, message: &str) {
        self.lock().failure = Some(message.to_string());
    }

    /// Undo [`fail_with`](Self::fail_with)
    pub fn clear_failure(&self) {
        self.lock().failure = None;
    }

    /// Lock the registry, recovering it if a holder panicked
    fn lock(&self) -> std::sync::MutexGuard<'_, Registry> {
        self.registry
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lookup(
        &self,
        select: impl FnOnce(&Registry) -> Option<Identity>,
    ) -> Result<Identity, IdentityError> {
        let registry = self.lock();

        if let Some(message) = &registry.failure {
            return Err(IdentityError::Request(message.clone()));
        }

        select(&registry).ok_or(IdentityError::NotFound)
    }
}

#[async_trait::async_trait]
impl IdentityResolver for MockIdentityResolver {
    async fn resolve_by_token(&self, token: &str) -> Result<Identity, IdentityError> {
        tracing::debug!("Mock identity resolver: lookup by token");
        self.lookup(|registry| registry.by_token.get(token).cloned())
    }

    async fn resolve_by_id(&self, id: &str) -> Result<Identity, IdentityError> {
        tracing::debug!(user_id = %id, "Mock identity resolver: lookup by id");
        self.lookup(|registry| registry.by_id.get(id).cloned())
    }
}
