//! Request/response audit stage

use std::sync::Arc;

use async_trait::async_trait;
use axum::{body::Body, extract::Request, response::Response};
use chrono::Utc;

use super::{BoxHandler, Handler, Outcome, Stage, MAX_BODY_BYTES};
use crate::error::{ClassifiedError, PipelineError};

/// Logs every exchange at debug level with both bodies.
///
/// The request body is buffered before the inner handler runs and handed to
/// it again unchanged; the response is buffered after it returns and relayed
/// with the same status, headers, and body.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestResponseLog;

impl<E: ClassifiedError> Stage<E> for RequestResponseLog {
    fn name(&self) -> &'static str {
        "request_response_log"
    }

    fn wrap(&self, next: BoxHandler<Request, E>) -> BoxHandler<Request, E> {
        Arc::new(RequestResponseLogHandler { next })
    }
}

struct RequestResponseLogHandler<E> {
    next: BoxHandler<Request, E>,
}

#[async_trait]
impl<E: ClassifiedError> Handler<Request, E> for RequestResponseLogHandler<E> {
    async fn call(&self, request: Request) -> Outcome<E> {
        let requested_at = Utc::now();

        let (parts, body) = request.into_parts();
        let request_body = axum::body::to_bytes(body, MAX_BODY_BYTES)
            .await
            .map_err(|err| {
                PipelineError::unclassified(
                    anyhow::Error::new(err).context("failed to read request body"),
                )
            })?;

        let method = parts.method.clone();
        let uri = parts.uri.clone();

        let response = self
            .next
            .call(Request::from_parts(parts, Body::from(request_body.clone())))
            .await?;

        let responded_at = Utc::now();

        let (response_parts, body) = response.into_parts();
        let response_body = axum::body::to_bytes(body, usize::MAX)
            .await
            .map_err(|err| {
                PipelineError::unclassified(
                    anyhow::Error::new(err).context("failed to read response body"),
                )
            })?;

        tracing::debug!(
            status = response_parts.status.as_u16(),
            method = %method,
            path = %uri,
            requested_at = %requested_at,
            responded_at = %responded_at,
            request_body = %String::from_utf8_lossy(&request_body),
            response_headers = ?response_parts.headers,
            response_body = %String::from_utf8_lossy(&response_body),
            "Request/response exchange"
        );

        Ok(Response::from_parts(response_parts, Body::from(response_body)))
    }
}
