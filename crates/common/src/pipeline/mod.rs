//! Ordered request pipeline
//!
//! A [`Handler`] turns a request into an [`Outcome`]: either a completed
//! response or a [`PipelineError`]. A [`Stage`] wraps a handler in another
//! handler. [`Pipeline`] applies its stages in the order they were added, the
//! first one ending up outermost, so for a chain `a -> b -> handler` the
//! pre-logic runs `a, b` and the post-logic unwinds `b, a`.
//!
//! A stage may also change the request type on its way in. Authentication
//! does this: it turns a plain [`Request`] into an authenticated one, so
//! handlers behind it receive the identity as a value. Such a stage is
//! attached with [`Pipeline::guard`] and always sits innermost.

mod audit;
mod error_log;
mod error_response;

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::Request,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::error::{ClassifiedError, PipelineError};

pub use audit::RequestResponseLog;
pub use error_log::ErrorLog;
pub use error_response::{ErrorResponse, JSON_CONTENT_TYPE};

/// Largest request body any stage or handler buffers, matching axum's
/// default extractor limit
pub const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Result of running a request through a handler
pub type Outcome<E> = Result<Response, PipelineError<E>>;

/// Shared, type-erased handler
pub type BoxHandler<Req, E> = Arc<dyn Handler<Req, E>>;

/// Terminal or intermediate request handler
#[async_trait]
pub trait Handler<Req, E>: Send + Sync + 'static {
    async fn call(&self, request: Req) -> Outcome<E>;
}

/// Handler built from an async closure
pub struct HandlerFn<F> {
    f: F,
}

/// Build a [`Handler`] from an async closure
pub fn handler_fn<F>(f: F) -> HandlerFn<F> {
    HandlerFn { f }
}

#[async_trait]
impl<Req, E, F, Fut> Handler<Req, E> for HandlerFn<F>
where
    Req: Send + 'static,
    E: Send + 'static,
    F: Fn(Req) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Outcome<E>> + Send + 'static,
{
    async fn call(&self, request: Req) -> Outcome<E> {
        (self.f)(request).await
    }
}

/// A `Handler -> Handler` transformation.
///
/// `Inner` is the request type the wrapped handler accepts and `Outer` the
/// one the resulting handler accepts. Most stages leave the type alone.
pub trait Stage<E, Inner = Request, Outer = Inner>: Send + Sync + 'static {
    /// Name shown by [`Pipeline::stage_names`]
    fn name(&self) -> &'static str;

    fn wrap(&self, next: BoxHandler<Inner, E>) -> BoxHandler<Outer, E>;
}

/// Ordered list of stages applied around route handlers
pub struct Pipeline<E> {
    stages: Vec<Arc<dyn Stage<E>>>,
}

impl<E> Clone for Pipeline<E> {
    fn clone(&self) -> Self {
        Self {
            stages: self.stages.clone(),
        }
    }
}

impl<E: ClassifiedError> Default for Pipeline<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: ClassifiedError> Pipeline<E> {
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Append a stage; it runs inside every stage added before it
    pub fn stage(mut self, stage: impl Stage<E>) -> Self {
        self.stages.push(Arc::new(stage));
        self
    }

    /// Close the chain with a stage that changes the request type
    pub fn guard<Inner, G>(self, guard: G) -> GuardedPipeline<E, Inner>
    where
        Inner: Send + 'static,
        G: Stage<E, Inner, Request>,
    {
        GuardedPipeline {
            outer: self,
            guard: Arc::new(guard),
        }
    }

    /// Stage names from outermost to innermost
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    /// Wrap a route handler in every stage of the pipeline
    pub fn handler(&self, handler: impl Handler<Request, E>) -> Endpoint<E> {
        self.wrap(Arc::new(handler))
    }

    fn wrap(&self, handler: BoxHandler<Request, E>) -> Endpoint<E> {
        let handler = self
            .stages
            .iter()
            .rev()
            .fold(handler, |next, stage| stage.wrap(next));

        Endpoint { handler }
    }
}

/// Pipeline whose innermost stage hands handlers an `Inner` request
pub struct GuardedPipeline<E, Inner> {
    outer: Pipeline<E>,
    guard: Arc<dyn Stage<E, Inner, Request>>,
}

impl<E, Inner> Clone for GuardedPipeline<E, Inner> {
    fn clone(&self) -> Self {
        Self {
            outer: self.outer.clone(),
            guard: self.guard.clone(),
        }
    }
}

impl<E, Inner> GuardedPipeline<E, Inner>
where
    E: ClassifiedError,
    Inner: Send + 'static,
{
    /// Stage names from outermost to innermost, guard last
    pub fn stage_names(&self) -> Vec<&'static str> {
        let mut names = self.outer.stage_names();
        names.push(self.guard.name());
        names
    }

    pub fn handler(&self, handler: impl Handler<Inner, E>) -> Endpoint<E> {
        self.outer.wrap(self.guard.wrap(Arc::new(handler)))
    }
}

/// Fully assembled handler ready to be mounted on a route
pub struct Endpoint<E> {
    handler: BoxHandler<Request, E>,
}

impl<E> Clone for Endpoint<E> {
    fn clone(&self) -> Self {
        Self {
            handler: self.handler.clone(),
        }
    }
}

impl<E: ClassifiedError> Endpoint<E> {
    /// Run the request through the chain.
    ///
    /// Anything still failing at this point escaped every stage, so the
    /// client gets a bare 500.
    pub async fn serve(self, request: Request) -> Response {
        match self.handler.call(request).await {
            Ok(response) => response,
            Err(err) => {
                tracing::error!(kind = %err.kind(), error = %err, "Request aborted by pipeline");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}
