//! Identity and authentication errors

use thiserror::Error;

/// Failure reported by an identity resolver.
///
/// `NotFound` is the only outcome callers treat differently; everything else
/// is a generic resolver failure.
#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("identity not found")]
    NotFound,

    #[error("identity service returned unexpected status code {0}")]
    UnexpectedStatus(u16),

    #[error("identity request error: {0}")]
    Request(String),

    #[error("failed to decode identity response: {0}")]
    Decode(String),

    #[error("identity resolver configuration error: {0}")]
    Configuration(String),
}

impl IdentityError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, IdentityError::NotFound)
    }
}

/// Authentication failure raised by the authentication stage.
///
/// Each surface maps these onto its own classified errors.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("bearer token is missing")]
    MissingToken,

    #[error("invalid token")]
    InvalidToken(#[source] IdentityError),

    #[error("failed to resolve user by token")]
    ResolverFailed(#[source] IdentityError),
}

impl From<IdentityError> for AuthError {
    fn from(err: IdentityError) -> Self {
        if err.is_not_found() {
            AuthError::InvalidToken(err)
        } else {
            AuthError::ResolverFailed(err)
        }
    }
}
