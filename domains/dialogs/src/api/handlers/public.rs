//! Public dialog handlers
//!
//! Both handlers run behind the authentication stage: the caller is the
//! sender, the peer comes from the route.

use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use dialog_auth::Authenticated;
use dialog_common::pipeline::{Handler, Outcome};
use serde::{Deserialize, Serialize};

use super::{empty_ok, json_ok, null_as_empty, read_json};
use crate::api::errors::PublicApiError;
use crate::api::middleware::DialogsState;
use crate::domain::entities::Message;

/// Request for sending a message to the peer
#[derive(Debug, Deserialize)]
pub struct SendDialogRequest {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub text: String,
}

/// Message as listed on the public surface
#[derive(Debug, Serialize)]
pub struct DialogMessageResponse {
    pub from: String,
    pub to: String,
    pub text: String,
}

impl From<Message> for DialogMessageResponse {
    fn from(m: Message) -> Self {
        Self {
            from: m.from,
            to: m.to,
            text: m.text,
        }
    }
}

async fn peer_id(parts: &mut Parts) -> Result<String, PublicApiError> {
    let Path(peer_id) = Path::<String>::from_request_parts(parts, &())
        .await
        .map_err(PublicApiError::internal)?;
    Ok(peer_id)
}

/// `POST /dialog/{peer_id}/send`
pub struct SendDialog {
    state: DialogsState,
}

impl SendDialog {
    pub fn new(state: DialogsState) -> Self {
        Self { state }
    }
}

#[async_trait]
impl Handler<Authenticated, PublicApiError> for SendDialog {
    async fn call(&self, request: Authenticated) -> Outcome<PublicApiError> {
        let (identity, request) = request.into_parts();
        let (mut parts, body) = request.into_parts();

        let req: SendDialogRequest = read_json(body).await.map_err(PublicApiError::internal)?;

        if req.text.is_empty() {
            return Err(PublicApiError::missing_parameter("text").into());
        }

        let receiver_id = peer_id(&mut parts).await?;
        let message = Message::new(identity.id, receiver_id, req.text);

        let id = self
            .state
            .store
            .add(&message)
            .await
            .map_err(PublicApiError::internal)?;

        tracing::info!(message_id = %id, sender_id = %message.from, receiver_id = %message.to, "Dialog message sent");
        Ok(empty_ok())
    }
}

/// `GET /dialog/{peer_id}/list`
pub struct ListDialog {
    state: DialogsState,
}

impl ListDialog {
    pub fn new(state: DialogsState) -> Self {
        Self { state }
    }
}

#[async_trait]
impl Handler<Authenticated, PublicApiError> for ListDialog {
    async fn call(&self, request: Authenticated) -> Outcome<PublicApiError> {
        let (identity, request) = request.into_parts();
        let (mut parts, _body) = request.into_parts();
        let receiver_id = peer_id(&mut parts).await?;

        let messages = self
            .state
            .store
            .list_between(&identity.id, &receiver_id)
            .await
            .map_err(PublicApiError::internal)?;

        let response: Vec<DialogMessageResponse> =
            messages.into_iter().map(DialogMessageResponse::from).collect();

        let response = json_ok(&response).map_err(PublicApiError::internal)?;
        Ok(response)
    }
}
