//! Error-to-response translation stage

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::Request,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use super::{BoxHandler, Handler, Outcome, Stage};
use crate::error::{ClassifiedError, PipelineError};

/// Content type of every JSON body written by the service
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// The single place where errors become HTTP responses.
///
/// Classified errors are rendered with the surface's own wire format; any
/// other fault becomes a plain 500 that reveals nothing about the cause.
/// The resulting handler never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorResponse;

impl<E: ClassifiedError> Stage<E> for ErrorResponse {
    fn name(&self) -> &'static str {
        "error_response"
    }

    fn wrap(&self, next: BoxHandler<Request, E>) -> BoxHandler<Request, E> {
        Arc::new(ErrorResponseHandler { next })
    }
}

struct ErrorResponseHandler<E> {
    next: BoxHandler<Request, E>,
}

#[async_trait]
impl<E: ClassifiedError> Handler<Request, E> for ErrorResponseHandler<E> {
    async fn call(&self, request: Request) -> Outcome<E> {
        match self.next.call(request).await {
            Ok(response) => Ok(response),
            Err(PipelineError::Classified(err)) => Ok(json_error(&err)),
            Err(PipelineError::Unclassified(_)) => Ok(internal_error()),
        }
    }
}

fn json_error<E: ClassifiedError>(err: &E) -> Response {
    (
        err.status_code(),
        [(header::CONTENT_TYPE, JSON_CONTENT_TYPE)],
        err.body().to_string(),
    )
        .into_response()
}

fn internal_error() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
}
