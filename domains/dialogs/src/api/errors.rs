//! Classified errors of the two API surfaces
//!
//! The public surface answers with `{"message", "code"}`, the internal one
//! with `{"error", "error_description"}`. Both render as
//! `<message>, err: <cause>` in logs; the cause never reaches the client.

use axum::http::StatusCode;
use dialog_auth::AuthError;
use dialog_common::{Cause, ClassifiedError, Severity};
use serde_json::json;
use thiserror::Error;

fn with_cause(cause: &Option<Cause>) -> String {
    match cause {
        Some(cause) => format!(", err: {}", cause),
        None => String::new(),
    }
}

fn missing_parameter_message(parameter: &str) -> String {
    format!("required parameter {:?} is missing", parameter)
}

fn invalid_parameter_message(parameter: &str) -> String {
    format!("invalid request parameter {:?}", parameter)
}

/// Errors of the public, token-authenticated surface
#[derive(Error, Debug)]
pub enum PublicApiError {
    #[error("{message}{}", with_cause(.cause))]
    InvalidRequest {
        message: String,
        parameter: Option<String>,
        #[source]
        cause: Option<Cause>,
    },

    #[error("internal server error, err: {0}")]
    InternalServerError(#[source] Cause),

    #[error("entity not found, err: {0}")]
    EntityNotFound(#[source] Cause),

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("{message}{}", with_cause(.cause))]
    InvalidToken {
        message: String,
        #[source]
        cause: Option<Cause>,
    },
}

impl PublicApiError {
    pub fn missing_parameter(parameter: &str) -> Self {
        PublicApiError::InvalidRequest {
            message: missing_parameter_message(parameter),
            parameter: Some(parameter.to_string()),
            cause: None,
        }
    }

    pub fn invalid_parameter(parameter: &str, cause: Option<Cause>) -> Self {
        PublicApiError::InvalidRequest {
            message: invalid_parameter_message(parameter),
            parameter: Some(parameter.to_string()),
            cause,
        }
    }

    pub fn internal(cause: impl Into<Cause>) -> Self {
        PublicApiError::InternalServerError(cause.into())
    }

    pub fn not_found(cause: impl Into<Cause>) -> Self {
        PublicApiError::EntityNotFound(cause.into())
    }

    pub fn invalid_token(message: &str, cause: Option<Cause>) -> Self {
        PublicApiError::InvalidToken {
            message: message.to_string(),
            cause,
        }
    }

    /// Client-visible message
    pub fn message(&self) -> &str {
        match self {
            PublicApiError::InvalidRequest { message, .. } => message,
            PublicApiError::InternalServerError(_) => "internal server error",
            PublicApiError::EntityNotFound(_) => "entity not found",
            PublicApiError::InvalidCredentials => "invalid credentials",
            PublicApiError::InvalidToken { message, .. } => message,
        }
    }

    /// Numeric error code of the public wire format
    pub fn code(&self) -> u16 {
        match self {
            PublicApiError::InvalidRequest { .. } => 100,
            PublicApiError::InternalServerError(_) => 101,
            PublicApiError::EntityNotFound(_) => 102,
            PublicApiError::InvalidCredentials => 103,
            PublicApiError::InvalidToken { .. } => 104,
        }
    }
}

impl ClassifiedError for PublicApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            PublicApiError::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
            PublicApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            PublicApiError::EntityNotFound(_) => StatusCode::NOT_FOUND,
            PublicApiError::InvalidCredentials => StatusCode::BAD_REQUEST,
            PublicApiError::InvalidToken { .. } => StatusCode::UNAUTHORIZED,
        }
    }

    fn severity(&self) -> Severity {
        match self {
            PublicApiError::InternalServerError(_) => Severity::Error,
            _ => Severity::Info,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            PublicApiError::InvalidRequest { .. } => "InvalidRequest",
            PublicApiError::InternalServerError(_) => "InternalServerError",
            PublicApiError::EntityNotFound(_) => "EntityNotFound",
            PublicApiError::InvalidCredentials => "InvalidCredentials",
            PublicApiError::InvalidToken { .. } => "InvalidToken",
        }
    }

    fn body(&self) -> serde_json::Value {
        json!({
            "message": self.message(),
            "code": self.code(),
        })
    }
}

impl From<AuthError> for PublicApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingToken => PublicApiError::invalid_token("bearer token is missing", None),
            AuthError::InvalidToken(cause) => {
                PublicApiError::invalid_token("invalid token", Some(Box::new(cause)))
            }
            AuthError::ResolverFailed(cause) => PublicApiError::internal(cause),
        }
    }
}

/// Errors of the internal, unauthenticated surface
#[derive(Error, Debug)]
pub enum InternalApiError {
    #[error("{message}{}", with_cause(.cause))]
    InvalidRequest {
        message: String,
        parameter: Option<String>,
        #[source]
        cause: Option<Cause>,
    },

    #[error("internal server error, err: {0}")]
    InternalServerError(#[source] Cause),
}

impl InternalApiError {
    pub fn missing_parameter(parameter: &str) -> Self {
        InternalApiError::InvalidRequest {
            message: missing_parameter_message(parameter),
            parameter: Some(parameter.to_string()),
            cause: None,
        }
    }

    pub fn invalid_parameter(parameter: &str, cause: Option<Cause>) -> Self {
        InternalApiError::InvalidRequest {
            message: invalid_parameter_message(parameter),
            parameter: Some(parameter.to_string()),
            cause,
        }
    }

    pub fn internal(cause: impl Into<Cause>) -> Self {
        InternalApiError::InternalServerError(cause.into())
    }

    /// Client-visible description
    pub fn description(&self) -> &str {
        match self {
            InternalApiError::InvalidRequest { message, .. } => message,
            InternalApiError::InternalServerError(_) => "internal server error",
        }
    }

    /// Error type of the internal wire format
    pub fn error_type(&self) -> &'static str {
        match self {
            InternalApiError::InvalidRequest { .. } => "invalid_request",
            InternalApiError::InternalServerError(_) => "server_error",
        }
    }

    /// Parameter an invalid request refers to, if any
    pub fn parameter(&self) -> Option<&str> {
        match self {
            InternalApiError::InvalidRequest { parameter, .. } => parameter.as_deref(),
            InternalApiError::InternalServerError(_) => None,
        }
    }
}

impl ClassifiedError for InternalApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            InternalApiError::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
            InternalApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn severity(&self) -> Severity {
        match self {
            InternalApiError::InvalidRequest { .. } => Severity::Info,
            InternalApiError::InternalServerError(_) => Severity::Error,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            InternalApiError::InvalidRequest { .. } => "InvalidRequest",
            InternalApiError::InternalServerError(_) => "InternalServerError",
        }
    }

    fn body(&self) -> serde_json::Value {
        json!({
            "error": self.error_type(),
            "error_description": self.description(),
        })
    }
}
