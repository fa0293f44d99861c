//! HTTP error handling.
//!
//! Turns domain errors into Axum responses with a stable JSON body.
//! Internal detail is logged, never sent.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::{DomainError, ErrorKind};
use serde::Serialize;
use thiserror::Error;

/// Application error types surfaced over HTTP.
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication
    #[error("Invalid credentials")]
    InvalidCredentials,

    // Resource errors
    #[error("{0}")]
    Conflict(String),

    // Validation
    #[error("{0}")]
    Validation(String),

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

/// Error response body for HTTP
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
}

impl AppError {
    /// Get error code for client
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::Conflict(_) => "DUPLICATE_IDENTITY",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get HTTP status code.
    ///
    /// Duplicate emails are a bad request, not 409.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::Conflict(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get user-facing message (hides internal details)
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) | AppError::Conflict(msg) => msg.clone(),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "Something went wrong, please try again later".to_string()
            }
            AppError::InvalidCredentials => self.to_string(),
        }
    }
}

// =============================================================================
// HTTP Response (Axum)
// =============================================================================

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code().to_string(),
                message: self.user_message(),
            },
        };

        (status, Json(body)).into_response()
    }
}

// =============================================================================
// Domain Error Conversion
// =============================================================================

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err.kind() {
            ErrorKind::Validation => AppError::Validation(err.to_string()),
            ErrorKind::DuplicateIdentity => AppError::Conflict(err.to_string()),
            ErrorKind::InvalidCredentials => AppError::InvalidCredentials,
            ErrorKind::StorageFailure => AppError::Internal(err.to_string()),
        }
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Convenience constructors
impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_domain_errors_map_to_statuses() {
        let cases = [
            (DomainError::PasswordMismatch, StatusCode::BAD_REQUEST),
            (DomainError::validation("bad email"), StatusCode::BAD_REQUEST),
            (DomainError::duplicate("a@x.com"), StatusCode::BAD_REQUEST),
            (DomainError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (DomainError::StorageFailure, StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (domain_err, status) in cases {
            assert_eq!(AppError::from(domain_err).status(), status);
        }
    }

    #[tokio::test]
    async fn test_duplicate_body_names_email() {
        let (status, body) = body_json(DomainError::duplicate("a@x.com").into()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "DUPLICATE_IDENTITY");
        assert_eq!(body["error"]["message"], "The email a@x.com has already been used");
    }

    #[tokio::test]
    async fn test_internal_body_hides_detail() {
        let (status, body) =
            body_json(AppError::internal("connection refused at db:5432")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], "INTERNAL_ERROR");
        assert!(!body.to_string().contains("5432"));
    }
}
