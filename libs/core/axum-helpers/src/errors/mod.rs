pub mod codes;
pub mod handlers;

pub use codes::ErrorCode;

use crate::response::{Message, Outcome, failure};
use axum::{
    extract::rejection::JsonRejection,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Application error type that can be converted to HTTP responses.
///
/// Every variant answers with the error envelope; internal details are only logged.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    /// Field-level validation messages, reported all at once.
    #[error("Validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),

    /// A mutation passed validation but the store refused it.
    #[error("Unprocessable Entity: {0}")]
    UnprocessableEntity(String),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),

    #[error("Service Unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AppError {
    fn parts(self) -> (Outcome, Message) {
        match self {
            AppError::JsonExtractorRejection(e) => {
                tracing::info!(
                    error_code = ErrorCode::JsonExtraction.code(),
                    "JSON extraction error: {}",
                    e
                );
                (Outcome::from_client_status(e.status()), Message::Text(e.body_text()))
            }
            AppError::BadRequest(msg) => {
                tracing::info!(error_code = ErrorCode::BadRequest.code(), "Bad request: {}", msg);
                (Outcome::BadRequest, Message::Text(msg))
            }
            AppError::NotFound(msg) => {
                tracing::info!(error_code = ErrorCode::NotFound.code(), "Not found: {}", msg);
                (Outcome::NotFound, Message::Text(msg))
            }
            AppError::Validation(messages) => {
                tracing::info!(
                    error_code = ErrorCode::ValidationError.code(),
                    "Validation error: {:?}",
                    messages
                );
                (Outcome::Unprocessable, Message::List(messages))
            }
            AppError::UnprocessableEntity(msg) => {
                tracing::warn!(
                    error_code = ErrorCode::MutationFailed.code(),
                    "Unprocessable entity: {}",
                    msg
                );
                (Outcome::Unprocessable, Message::Text(msg))
            }
            AppError::InternalServerError(msg) => {
                tracing::error!(
                    error_code = ErrorCode::InternalError.code(),
                    "Internal server error: {}",
                    msg
                );
                (
                    Outcome::Internal,
                    Message::from(ErrorCode::InternalError.default_message()),
                )
            }
            AppError::ServiceUnavailable(msg) => {
                tracing::error!(
                    error_code = ErrorCode::ServiceUnavailable.code(),
                    "Service unavailable: {}",
                    msg
                );
                (Outcome::ServiceUnavailable, Message::Text(msg))
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (outcome, message) = self.parts();
        failure(outcome, message)
    }
}
