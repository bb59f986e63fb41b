use axum::response::Response;

use crate::response::{Outcome, failure};

/// Fallback for unknown routes.
pub async fn not_found() -> Response {
    failure(Outcome::NotFound, "The requested resource was not found")
}
