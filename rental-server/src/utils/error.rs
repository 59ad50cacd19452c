//! Unified error handling
//!
//! Application-level error type and the JSON envelope every error
//! response is wrapped in.
//!
//! # Error codes
//!
//! | Code  | Meaning |
//! |-------|---------|
//! | E0000 | Success |
//! | E0002 | Validation failed |
//! | E0003 | Resource not found |
//! | E0004 | Resource conflict (duplicate serial/code) |
//! | E0005 | Business rule violation |
//! | E9001 | Internal server error |
//! | E9002 | Database error |
//! | E9100 | Critical: compensation failed, manual cleanup required |

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

use crate::db::repository::RepoError;

/// API response envelope
///
/// ```json
/// { "code": "E0000", "message": "Success", "data": { ... } }
/// ```
#[derive(Debug, Serialize)]
pub struct AppResponse<T> {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// Application error enum
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Resource already exists: {0}")]
    Conflict(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Business rule violation: {0}")]
    BusinessRule(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    /// A compensating delete failed after a partial write. The store is
    /// inconsistent until an operator cleans it up by hand.
    #[error("Critical error: {0}")]
    Critical(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "E0003", msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "E0004", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "E0002", msg.clone()),
            AppError::BusinessRule(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "E0005", msg.clone())
            }
            AppError::Database(msg) => {
                error!(target: "database", error = %msg, "Database error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E9002",
                    "Database error".to_string(),
                )
            }
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E9001",
                    "Internal server error".to_string(),
                )
            }
            AppError::Critical(msg) => {
                error!(target: "critical", error = %msg, "Compensation failed, manual cleanup required");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E9100",
                    format!("Critical error, manual cleanup required: {msg}"),
                )
            }
        };

        let body = Json(AppResponse::<()> {
            code: code.to_string(),
            message,
            data: None,
        });

        (status, body).into_response()
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Duplicate(msg) => AppError::Conflict(msg),
            RepoError::Validation(msg) => AppError::Validation(msg),
            RepoError::Database(msg) => AppError::Database(msg),
        }
    }
}

// ========== Helper Constructors ==========

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn business_rule(msg: impl Into<String>) -> Self {
        Self::BusinessRule(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn critical(msg: impl Into<String>) -> Self {
        Self::Critical(msg.into())
    }
}

impl<T: Serialize> AppResponse<T> {
    /// Successful enveloped response
    pub fn success(data: T) -> Self {
        Self {
            code: "E0000".to_string(),
            message: "Success".to_string(),
            data: Some(data),
        }
    }
}

/// Result type for handlers and services
pub type AppResult<T> = Result<T, AppError>;
