//! HTTP handlers for both API surfaces

pub mod internal;
pub mod public;

use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
};
use dialog_common::{Cause, MAX_BODY_BYTES};
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};

/// Content type of successful dialog responses
pub const DIALOG_CONTENT_TYPE: &str = "application/json; utf-8";

/// 200 with the dialog content type and no body
pub(crate) fn empty_ok() -> Response {
    (StatusCode::OK, [(CONTENT_TYPE, DIALOG_CONTENT_TYPE)]).into_response()
}

/// 200 with the dialog content type and a JSON body
pub(crate) fn json_ok<T: Serialize>(value: &T) -> Result<Response, serde_json::Error> {
    let body = serde_json::to_vec(value)?;
    Ok((StatusCode::OK, [(CONTENT_TYPE, DIALOG_CONTENT_TYPE)], body).into_response())
}

/// Buffer and decode a JSON request body
pub(crate) async fn read_json<T: DeserializeOwned>(body: Body) -> Result<T, Cause> {
    let bytes = axum::body::to_bytes(body, MAX_BODY_BYTES).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Decode a string field where `null` means the same as absent
pub(crate) fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
