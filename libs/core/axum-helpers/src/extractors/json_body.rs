//! JSON body extractor answering rejections with the error envelope.

use crate::errors::AppError;
use axum::extract::{FromRequest, Json, Request};
use serde::de::DeserializeOwned;

/// Drop-in replacement for [`axum::Json`] on the request side.
///
/// Syntax errors, wrong JSON types and a missing `Content-Type` become
/// [`AppError::JsonExtractorRejection`], so clients get `{"status": "Error", ...}`
/// instead of axum's plain-text rejection.
///
/// ```ignore
/// async fn create(JsonBody(payload): JsonBody<CreateCategory>) -> Response { ... }
/// ```
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state).await?;
        Ok(JsonBody(data))
    }
}
