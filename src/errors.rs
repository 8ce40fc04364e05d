//! Centralized error handling.
//!
//! Provides a unified error type for the entire application,
//! with automatic HTTP response conversion.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication & Authorization
    #[error("Authentication required")]
    Unauthorized,

    #[error("Access denied")]
    Forbidden,

    #[error("Invalid credentials")]
    InvalidCredentials,

    // Resource errors
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    // Order processing
    #[error("Shopping cart is empty. Add items before placing an order.")]
    EmptyCart,

    #[error("Invalid order status: {0}")]
    InvalidStatus(String),

    // Validation
    #[error("Validation failed")]
    Validation(Vec<String>),

    #[error("Invalid input: {0}")]
    BadRequest(String),

    // External service errors
    #[error("Database error")]
    Database(#[from] sea_orm::DbErr),

    #[error("Authentication error")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

/// Error response body: timestamp, HTTP status, and an error detail
/// that is either a single message or a list of field-level messages.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    timestamp: DateTime<Utc>,
    status: u16,
    errors: ErrorDetail,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum ErrorDetail {
    Message(String),
    Fields(Vec<String>),
}

impl AppError {
    /// Get HTTP status code
    fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized | AppError::InvalidCredentials | AppError::Jwt(_) => {
                StatusCode::UNAUTHORIZED
            }
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::EmptyCart
            | AppError::InvalidStatus(_)
            | AppError::Validation(_)
            | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get user-facing error detail (hides internal details)
    fn detail(&self) -> ErrorDetail {
        match self {
            AppError::Validation(messages) => ErrorDetail::Fields(messages.clone()),

            // Hide details for internal/security errors
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                ErrorDetail::Message("A database error occurred".to_string())
            }
            AppError::Jwt(e) => {
                tracing::error!("JWT error: {:?}", e);
                ErrorDetail::Message("Invalid or expired token".to_string())
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                ErrorDetail::Message("An internal error occurred".to_string())
            }

            // Use the display message for everything else
            _ => ErrorDetail::Message(self.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            timestamp: Utc::now(),
            status: status.as_u16(),
            errors: self.detail(),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Convenience constructors
impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        AppError::Conflict(msg.into())
    }

    pub fn validation(messages: Vec<String>) -> Self {
        AppError::Validation(messages)
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        AppError::BadRequest(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_keeps_the_offending_id_in_the_message() {
        let err = AppError::not_found("Can't find book by id: 42");
        assert_eq!(err.to_string(), "Can't find book by id: 42");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn conflict_maps_to_409() {
        let err = AppError::conflict("Email 'a@b.c' is already taken. Try another email");
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn invalid_status_is_a_bad_request_not_a_missing_resource() {
        let err = AppError::InvalidStatus("bogus".to_string());
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Invalid order status: bogus");
    }
}
