//! Error logging stage

use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::Request;

use super::{BoxHandler, Handler, Outcome, Stage};
use crate::error::{ClassifiedError, PipelineError, Severity};

/// Logs each failed outcome once, at the severity the error carries, and
/// returns it untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorLog;

impl<E: ClassifiedError> Stage<E> for ErrorLog {
    fn name(&self) -> &'static str {
        "error_log"
    }

    fn wrap(&self, next: BoxHandler<Request, E>) -> BoxHandler<Request, E> {
        Arc::new(ErrorLogHandler { next })
    }
}

struct ErrorLogHandler<E> {
    next: BoxHandler<Request, E>,
}

#[async_trait]
impl<E: ClassifiedError> Handler<Request, E> for ErrorLogHandler<E> {
    async fn call(&self, request: Request) -> Outcome<E> {
        let outcome = self.next.call(request).await;
        if let Err(err) = &outcome {
            log_error(err);
        }
        outcome
    }
}

fn log_error<E: ClassifiedError>(err: &PipelineError<E>) {
    let kind = err.kind();
    match err.severity() {
        Severity::Info => tracing::info!(kind = %kind, "{}: {}", kind, err),
        Severity::Warning => tracing::warn!(kind = %kind, "{}: {}", kind, err),
        Severity::Error => tracing::error!(kind = %kind, "{}: {}", kind, err),
    }
}
