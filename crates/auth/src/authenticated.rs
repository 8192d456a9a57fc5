//! Authenticated request wrapper

use axum::extract::Request;

use crate::types::Identity;

/// A request whose bearer token has been resolved to an identity
pub struct Authenticated {
    pub identity: Identity,
    pub request: Request,
}

impl Authenticated {
    pub fn new(identity: Identity, request: Request) -> Self {
        Self { identity, request }
    }

    /// Identity key of the caller
    #[mutants::skip] // Plain field access
    pub fn user_id(&self) -> &str {
        &self.identity.id
    }

    pub fn into_parts(self) -> (Identity, Request) {
        (self.identity, self.request)
    }
}
