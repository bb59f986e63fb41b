use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

use crate::validation::{MUST_EXIST, TAKEN};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Category not found")]
    CategoryNotFound,

    #[error("Product not found")]
    ProductNotFound,

    /// Every failed field rule, as full messages
    #[error("Validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),

    /// A validated mutation the store did not carry out
    #[error("{0}")]
    MutationFailed(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

impl CatalogError {
    pub fn validation(message: impl Into<String>) -> Self {
        CatalogError::Validation(vec![message.into()])
    }
}

impl From<DbErr> for CatalogError {
    /// Constraint violations become the field messages the application-level checks
    /// would have produced; everything else is internal.
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                CatalogError::validation(format!("Name {TAKEN}"))
            }
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                CatalogError::validation(format!("Category {MUST_EXIST}"))
            }
            _ => CatalogError::Internal(format!("Database error: {err}")),
        }
    }
}

/// Convert CatalogError to AppError for standardized error responses
impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::CategoryNotFound | CatalogError::ProductNotFound => {
                AppError::NotFound(err.to_string())
            }
            CatalogError::Validation(messages) => AppError::Validation(messages),
            CatalogError::MutationFailed(msg) => AppError::UnprocessableEntity(msg),
            CatalogError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
