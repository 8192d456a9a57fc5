//! Dialog application composition root
//!
//! Builds the dialog store and identity resolver from configuration and
//! composes the health route with both API surfaces.

pub mod server;

use axum::{
    extract::Request,
    http::{header::CONTENT_TYPE, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use dialog_auth::{IdentityConfig, IdentityResolverFactory};
use dialog_common::config::Config;
use dialog_common::pipeline::{
    handler_fn, ErrorResponse, Outcome, Pipeline, RequestResponseLog, JSON_CONTENT_TYPE,
};
use dialog_dialogs::{DialogStoreFactory, DialogsState, InternalApiError};
use serde_json::json;

/// Create the main application router from configuration
pub async fn create_app(config: &Config) -> Result<Router, anyhow::Error> {
    let store = DialogStoreFactory::create(config).await?;
    let identities = IdentityResolverFactory::create(IdentityConfig::from(config))?;

    tracing::info!(
        service = %config.service_name,
        version = %config.version,
        store = %config.dialog_store,
        identity_provider = %config.identity_provider,
        "Application components created"
    );

    Ok(router(DialogsState::new(store, identities)))
}

/// Compose all routes around an already built state
pub fn router(state: DialogsState) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(dialog_dialogs::public_routes(&state))
        .merge(dialog_dialogs::internal_routes(&state))
}

fn health_routes() -> Router {
    let health = Pipeline::<InternalApiError>::new()
        .stage(RequestResponseLog)
        .stage(ErrorResponse)
        .handler(handler_fn(health_check));

    Router::new().route(
        "/health",
        get(move |request: Request| health.clone().serve(request)),
    )
}

/// Health check endpoint
async fn health_check(_request: Request) -> Outcome<InternalApiError> {
    Ok((
        StatusCode::OK,
        [(CONTENT_TYPE, JSON_CONTENT_TYPE)],
        json!({ "status": "OK" }).to_string(),
    )
        .into_response())
}
