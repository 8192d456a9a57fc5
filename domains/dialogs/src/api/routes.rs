//! Route definitions for Dialogs domain API

use axum::{
    extract::{Path, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use dialog_common::pipeline::Endpoint;

use super::errors::PublicApiError;
use super::handlers::{internal, public};
use super::middleware::DialogsState;
use crate::domain::validation::is_peer_id;

/// Public routes only match a lowercase UUID peer; anything else is treated
/// as an unknown route and never reaches the pipeline.
async fn serve_peer(
    endpoint: Endpoint<PublicApiError>,
    peer_id: String,
    request: Request,
) -> Response {
    if !is_peer_id(&peer_id) {
        return StatusCode::NOT_FOUND.into_response();
    }
    endpoint.serve(request).await
}

/// Create public, token-authenticated routes
pub fn public_routes(state: &DialogsState) -> Router {
    let pipeline = state.public_pipeline();
    let send = pipeline.handler(public::SendDialog::new(state.clone()));
    let list = pipeline.handler(public::ListDialog::new(state.clone()));

    Router::new()
        .route(
            "/dialog/{peer_id}/send",
            post(move |Path(peer_id): Path<String>, request: Request| {
                serve_peer(send.clone(), peer_id, request)
            }),
        )
        .route(
            "/dialog/{peer_id}/list",
            get(move |Path(peer_id): Path<String>, request: Request| {
                serve_peer(list.clone(), peer_id, request)
            }),
        )
}

/// Create internal, unauthenticated routes
pub fn internal_routes(state: &DialogsState) -> Router {
    let pipeline = state.internal_pipeline();
    let send = pipeline.handler(internal::SendDialog::new(state.clone()));
    let list = pipeline.handler(internal::ListDialog::new(state.clone()));

    Router::new()
        .route(
            "/int/dialog/send",
            post(move |request: Request| send.clone().serve(request)),
        )
        .route(
            "/int/dialog/list",
            get(move |request: Request| list.clone().serve(request)),
        )
}
