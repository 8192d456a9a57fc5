//! Internal dialog handlers
//!
//! Unauthenticated; both participants are named explicitly and checked in a
//! fixed order where the first failure wins.

use async_trait::async_trait;
use axum::{
    extract::{Query, Request},
    http::Uri,
};
use dialog_common::pipeline::{Handler, Outcome};
use serde::{Deserialize, Serialize};

use super::{empty_ok, json_ok, null_as_empty, read_json};
use crate::api::errors::InternalApiError;
use crate::api::middleware::DialogsState;
use crate::domain::entities::Message;
use crate::domain::validation::is_identity_key;

/// Request for sending a message between two identities
#[derive(Debug, Default, Deserialize)]
pub struct SendDialogRequest {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub from: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub to: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub text: String,
}

/// Query of the internal list operation
#[derive(Debug, Default, PartialEq)]
pub struct ListDialogQuery {
    pub from: String,
    pub to: String,
}

impl ListDialogQuery {
    /// Read `from` and `to` from the query string; the first occurrence of
    /// each wins and absent parameters are empty
    pub fn from_uri(uri: &Uri) -> Result<Self, InternalApiError> {
        let Query(pairs) =
            Query::<Vec<(String, String)>>::try_from_uri(uri).map_err(InternalApiError::internal)?;

        let first = |name: &str| {
            pairs
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.clone())
                .unwrap_or_default()
        };

        Ok(Self {
            from: first("from"),
            to: first("to"),
        })
    }

    pub fn validate(&self) -> Result<(), InternalApiError> {
        validate_key_format("from", &self.from)?;
        validate_key_format("to", &self.to)
    }
}

/// Message as listed on the internal surface
#[derive(Debug, Serialize)]
pub struct DialogMessageResponse {
    pub id: String,
    pub from: String,
    pub to: String,
    pub text: String,
}

impl From<Message> for DialogMessageResponse {
    fn from(m: Message) -> Self {
        Self {
            id: m.id,
            from: m.from,
            to: m.to,
            text: m.text,
        }
    }
}

fn validate_key_format(parameter: &str, value: &str) -> Result<(), InternalApiError> {
    if value.is_empty() {
        return Err(InternalApiError::missing_parameter(parameter));
    }
    if !is_identity_key(value) {
        return Err(InternalApiError::invalid_parameter(parameter, None));
    }
    Ok(())
}

/// `POST /int/dialog/send`
pub struct SendDialog {
    state: DialogsState,
}

impl SendDialog {
    pub fn new(state: DialogsState) -> Self {
        Self { state }
    }

    /// text, then from (present, format, resolvable), then to
    pub async fn validate(&self, req: &SendDialogRequest) -> Result<(), InternalApiError> {
        if req.text.is_empty() {
            return Err(InternalApiError::missing_parameter("text"));
        }

        self.validate_participant("from", &req.from).await?;
        self.validate_participant("to", &req.to).await
    }

    async fn validate_participant(&self, parameter: &str, id: &str) -> Result<(), InternalApiError> {
        validate_key_format(parameter, id)?;

        match self.state.identities.resolve_by_id(id).await {
            Ok(_) => Ok(()),
            Err(err) if err.is_not_found() => Err(InternalApiError::invalid_parameter(
                parameter,
                Some(Box::new(err)),
            )),
            Err(err) => Err(InternalApiError::internal(err)),
        }
    }
}

#[async_trait]
impl Handler<Request, InternalApiError> for SendDialog {
    async fn call(&self, request: Request) -> Outcome<InternalApiError> {
        let req: SendDialogRequest = read_json(request.into_body())
            .await
            .map_err(InternalApiError::internal)?;

        self.validate(&req).await?;

        let message = Message::new(req.from, req.to, req.text);
        let id = self
            .state
            .store
            .add(&message)
            .await
            .map_err(InternalApiError::internal)?;

        tracing::info!(message_id = %id, sender_id = %message.from, receiver_id = %message.to, "Dialog message stored");
        Ok(empty_ok())
    }
}

/// `GET /int/dialog/list?from=&to=`
pub struct ListDialog {
    state: DialogsState,
}

impl ListDialog {
    pub fn new(state: DialogsState) -> Self {
        Self { state }
    }
}

#[async_trait]
impl Handler<Request, InternalApiError> for ListDialog {
    async fn call(&self, request: Request) -> Outcome<InternalApiError> {
        let query = ListDialogQuery::from_uri(request.uri())?;
        query.validate()?;

        let messages = self
            .state
            .store
            .list_between(&query.from, &query.to)
            .await
            .map_err(InternalApiError::internal)?;

        let response: Vec<DialogMessageResponse> =
            messages.into_iter().map(DialogMessageResponse::from).collect();

        let response = json_ok(&response).map_err(InternalApiError::internal)?;
        Ok(response)
    }
}
