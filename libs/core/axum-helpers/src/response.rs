//! Uniform JSON envelope returned by every endpoint.
//!
//! ```json
//! { "status": "Success", "message": "Category was created successfully.", "data": { ... } }
//! { "status": "Error", "message": ["Name can't be blank", "Status is not included in the list"] }
//! ```
//!
//! Handlers never build a body by hand; they call [`respond`] (or one of the thin
//! wrappers around it) with an [`Outcome`], an optional message and an optional payload.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Top-level `status` field of the envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum EnvelopeStatus {
    Success,
    Error,
}

/// A single message or the full list of accumulated validation messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum Message {
    Text(String),
    List(Vec<String>),
}

impl From<&str> for Message {
    fn from(value: &str) -> Self {
        Message::Text(value.to_string())
    }
}

impl From<String> for Message {
    fn from(value: String) -> Self {
        Message::Text(value)
    }
}

impl From<Vec<String>> for Message {
    fn from(value: Vec<String>) -> Self {
        Message::List(value)
    }
}

/// Envelope wrapping an entity or collection.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Envelope<T> {
    pub status: EnvelopeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// Envelope of a failed request. Documentation and test counterpart of [`Envelope`].
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorEnvelope {
    pub status: EnvelopeStatus,
    pub message: Message,
}

/// Kind of result a handler produced, mapped onto an HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Ok,
    Created,
    BadRequest,
    NotFound,
    UnsupportedMediaType,
    Unprocessable,
    Internal,
    ServiceUnavailable,
}

impl Outcome {
    pub fn status_code(self) -> StatusCode {
        match self {
            Outcome::Ok => StatusCode::OK,
            Outcome::Created => StatusCode::CREATED,
            Outcome::BadRequest => StatusCode::BAD_REQUEST,
            Outcome::NotFound => StatusCode::NOT_FOUND,
            Outcome::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Outcome::Unprocessable => StatusCode::UNPROCESSABLE_ENTITY,
            Outcome::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            Outcome::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    pub fn is_success(self) -> bool {
        matches!(self, Outcome::Ok | Outcome::Created)
    }

    /// Closest outcome for an arbitrary client error status.
    pub fn from_client_status(status: StatusCode) -> Self {
        match status {
            StatusCode::UNSUPPORTED_MEDIA_TYPE => Outcome::UnsupportedMediaType,
            StatusCode::UNPROCESSABLE_ENTITY => Outcome::Unprocessable,
            StatusCode::NOT_FOUND => Outcome::NotFound,
            _ => Outcome::BadRequest,
        }
    }
}

/// Build the envelope response for `outcome`.
///
/// The `status` field follows [`Outcome::is_success`]; `message` and `data` are omitted
/// from the body when `None`.
pub fn respond<T: Serialize>(outcome: Outcome, message: Option<Message>, data: Option<T>) -> Response {
    let status = if outcome.is_success() {
        EnvelopeStatus::Success
    } else {
        EnvelopeStatus::Error
    };

    let body = Envelope {
        status,
        message,
        data,
    };

    (outcome.status_code(), Json(body)).into_response()
}

/// Success envelope carrying `data` and an optional message.
pub fn success<T: Serialize>(outcome: Outcome, message: Option<&str>, data: T) -> Response {
    respond(outcome, message.map(Message::from), Some(data))
}

/// Success envelope with only a message (e.g. after a delete).
pub fn success_message(message: &str) -> Response {
    respond::<()>(Outcome::Ok, Some(message.into()), None)
}

/// Error envelope.
pub fn failure(outcome: Outcome, message: impl Into<Message>) -> Response {
    respond::<()>(outcome, Some(message.into()), None)
}
