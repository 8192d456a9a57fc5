//! Dialogs domain state and the per-surface pipelines

use std::sync::Arc;

use dialog_auth::{Authenticate, Authenticated, IdentityResolver};
use dialog_common::pipeline::{
    ErrorLog, ErrorResponse, GuardedPipeline, Pipeline, RequestResponseLog,
};

use super::errors::{InternalApiError, PublicApiError};
use crate::repository::DialogStore;

/// Application state for the Dialogs domain
#[derive(Clone)]
pub struct DialogsState {
    pub store: Arc<dyn DialogStore>,
    pub identities: Arc<dyn IdentityResolver>,
}

impl DialogsState {
    pub fn new(store: Arc<dyn DialogStore>, identities: Arc<dyn IdentityResolver>) -> Self {
        Self { store, identities }
    }

    /// Public chain, outermost first: audit, error translation, error
    /// logging, authentication
    pub fn public_pipeline(&self) -> GuardedPipeline<PublicApiError, Authenticated> {
        Pipeline::new()
            .stage(RequestResponseLog)
            .stage(ErrorResponse)
            .stage(ErrorLog)
            .guard(Authenticate::new(self.identities.clone()))
    }

    /// Internal chain, outermost first: error translation, error logging
    pub fn internal_pipeline(&self) -> Pipeline<InternalApiError> {
        Pipeline::new().stage(ErrorResponse).stage(ErrorLog)
    }
}
