//! Bearer token authentication stage
//!
//! Generic over any surface error `E` that can be built from [`AuthError`],
//! so each surface keeps its own wire format for authentication failures.

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::Request,
    http::{header::AUTHORIZATION, HeaderMap},
};
use dialog_common::pipeline::{BoxHandler, Handler, Outcome, Stage};
use dialog_common::ClassifiedError;

use crate::authenticated::Authenticated;
use crate::error::AuthError;
use crate::IdentityResolver;

/// Extract the bearer token from the `Authorization` header.
///
/// The header is split on the literal `Bearer`; anything other than exactly
/// two parts means the token is missing. The token itself is trimmed.
pub fn bearer_token(headers: &HeaderMap) -> Result<String, AuthError> {
    let header = headers
        .get(AUTHORIZATION)
        .map(|value| value.to_str().map_err(|_| AuthError::MissingToken))
        .transpose()?
        .unwrap_or_default();

    let parts: Vec<&str> = header.split("Bearer").collect();
    match parts.as_slice() {
        [_, token] => Ok(token.trim().to_string()),
        _ => Err(AuthError::MissingToken),
    }
}

/// Authentication stage: resolves the bearer token and hands the inner
/// handler an [`Authenticated`] request.
pub struct Authenticate<E> {
    resolver: Arc<dyn IdentityResolver>,
    _error: PhantomData<fn() -> E>,
}

impl<E> Authenticate<E> {
    pub fn new(resolver: Arc<dyn IdentityResolver>) -> Self {
        Self {
            resolver,
            _error: PhantomData,
        }
    }
}

impl<E> Clone for Authenticate<E> {
    fn clone(&self) -> Self {
        Self::new(self.resolver.clone())
    }
}

impl<E> Stage<E, Authenticated, Request> for Authenticate<E>
where
    E: ClassifiedError + From<AuthError>,
{
    fn name(&self) -> &'static str {
        "authenticate"
    }

    fn wrap(&self, next: BoxHandler<Authenticated, E>) -> BoxHandler<Request, E> {
        Arc::new(AuthenticateHandler {
            resolver: self.resolver.clone(),
            next,
        })
    }
}

struct AuthenticateHandler<E> {
    resolver: Arc<dyn IdentityResolver>,
    next: BoxHandler<Authenticated, E>,
}

#[async_trait]
impl<E> Handler<Request, E> for AuthenticateHandler<E>
where
    E: ClassifiedError + From<AuthError>,
{
    async fn call(&self, request: Request) -> Outcome<E> {
        let token = bearer_token(request.headers()).map_err(E::from)?;

        let identity = self
            .resolver
            .resolve_by_token(&token)
            .await
            .map_err(|err| E::from(AuthError::from(err)))?;

        tracing::debug!(user_id = %identity.id, "Request authenticated");

        self.next.call(Authenticated::new(identity, request)).await
    }
}
