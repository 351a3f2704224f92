//! Error handling for the Farm Statistics Platform
//!
//! Every error is rendered as `{ "error": { "code", "message", "field"? } }`

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::{BatchValidationError, ValidationError};
use thiserror::Error;

use crate::repository::RepositoryError;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication errors
    #[error("Not authenticated: {0}")]
    NotAuthenticated(String),

    // Validation errors
    #[error("Validation error: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Validation error in record {index}: {field}: {message}")]
    BatchValidation {
        index: usize,
        field: String,
        message: String,
    },

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Storage errors
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation {
            field: err.field,
            message: err.constraint,
        }
    }
}

impl From<BatchValidationError> for AppError {
    fn from(err: BatchValidationError) -> Self {
        AppError::BatchValidation {
            index: err.index,
            field: err.error.field,
            message: err.error.constraint,
        }
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ErrorDetail {
    fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            field: None,
        }
    }

    fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotAuthenticated(_) => StatusCode::UNAUTHORIZED,
            AppError::Validation { .. } | AppError::BatchValidation { .. } => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Repository(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn detail(&self) -> ErrorDetail {
        match self {
            AppError::NotAuthenticated(msg) => ErrorDetail::new("NOT_AUTHENTICATED", msg.clone()),
            AppError::Validation { field, message } => {
                ErrorDetail::new("VALIDATION_ERROR", message.clone()).with_field(field.clone())
            }
            AppError::BatchValidation {
                index,
                field,
                message,
            } => ErrorDetail::new(
                "VALIDATION_ERROR",
                format!("record {}: {}", index, message),
            )
            .with_field(format!("[{}].{}", index, field)),
            AppError::NotFound(resource) => {
                ErrorDetail::new("NOT_FOUND", format!("{} not found", resource))
            }
            AppError::Repository(_) => ErrorDetail::new(
                "SERVICE_UNAVAILABLE",
                "The data store is temporarily unavailable",
            ),
            AppError::Internal(_) => {
                ErrorDetail::new("INTERNAL_ERROR", "An internal server error occurred")
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = self.detail();

        // Log the error for debugging
        tracing::error!("Error: {:?}", self);

        (status, Json(ErrorResponse { error: detail })).into_response()
    }
}

/// Result type alias for services and handlers
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_bad_request() {
        let err: AppError = ValidationError::new("irrigation_percent", "must be between 0 and 100").into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.detail().field.as_deref(), Some("irrigation_percent"));
    }

    #[test]
    fn test_batch_error_identifies_record() {
        let err: AppError = BatchValidationError {
            index: 3,
            error: ValidationError::new("season", "unknown season"),
        }
        .into();
        assert_eq!(err.detail().field.as_deref(), Some("[3].season"));
    }

    #[test]
    fn test_repository_failure_is_service_unavailable() {
        let err = AppError::from(RepositoryError::Database(sqlx::Error::PoolTimedOut));
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
        // Storage details stay out of the response body
        assert!(!err.detail().message.contains("pool"));
    }
}
