//! Numeric error codes attached to error logs.
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! assert_eq!(ErrorCode::ValidationError.as_str(), "VALIDATION_ERROR");
//! assert_eq!(ErrorCode::ValidationError.code(), 1001);
//! ```

use serde::{Deserialize, Serialize};

/// Error categories used as the `error_code` field of structured logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Client errors (1000-1999)
    ValidationError,
    JsonExtraction,
    NotFound,
    InternalError,
    UnprocessableEntity,
    BadRequest,
    ServiceUnavailable,

    // Store errors (2000-2999)
    MutationFailed,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::JsonExtraction => "JSON_EXTRACTION",
            Self::NotFound => "NOT_FOUND",
            Self::InternalError => "INTERNAL_ERROR",
            Self::UnprocessableEntity => "UNPROCESSABLE_ENTITY",
            Self::BadRequest => "BAD_REQUEST",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            Self::MutationFailed => "MUTATION_FAILED",
        }
    }

    /// Integer code for logs and dashboards.
    ///
    /// - 1000-1999: request errors
    /// - 2000-2999: store errors
    pub fn code(&self) -> i32 {
        match self {
            Self::ValidationError => 1001,
            Self::JsonExtraction => 1003,
            Self::NotFound => 1004,
            Self::InternalError => 1005,
            Self::UnprocessableEntity => 1009,
            Self::BadRequest => 1010,
            Self::ServiceUnavailable => 1011,
            Self::MutationFailed => 2001,
        }
    }

    /// Message sent to the client when the real cause must stay in the logs.
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::ValidationError => "Request validation failed",
            Self::JsonExtraction => "Failed to parse request body",
            Self::NotFound => "Resource not found",
            Self::InternalError => "An internal server error occurred",
            Self::UnprocessableEntity => "Request cannot be processed",
            Self::BadRequest => "Bad request",
            Self::ServiceUnavailable => "Service is temporarily unavailable",
            Self::MutationFailed => "The change could not be saved",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
