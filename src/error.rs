//! Error types for the bookkeeping engine

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::auth::{AuthError, MailError};

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    #[error("Email error: {0}")]
    Mail(#[from] MailError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Payload storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Receipt payload not found: {0}")]
    PayloadNotFound(String),

    #[error("Invalid receipt id: {0}")]
    InvalidId(String),

    #[error("Corrupt payload {id}: {reason}")]
    Corrupt { id: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg.clone()),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg.clone()),
            AppError::Auth(e) => {
                tracing::debug!("Rejected credentials: {}", e);
                (
                    StatusCode::UNAUTHORIZED,
                    "unauthorized",
                    "Invalid or expired token".to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
            AppError::Storage(e) => match e {
                StorageError::PayloadNotFound(id) => (
                    StatusCode::NOT_FOUND,
                    "not_found",
                    format!("Receipt not found: {}", id),
                ),
                StorageError::InvalidId(id) => (
                    StatusCode::BAD_REQUEST,
                    "bad_request",
                    format!("Invalid receipt_id: {}", id),
                ),
                _ => {
                    tracing::error!("Storage error: {}", e);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "storage_error",
                        "Storage error".to_string(),
                    )
                }
            },
            AppError::Mail(e) => {
                tracing::error!("Email send failed: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "email_error",
                    "Email send failed".to_string(),
                )
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "database_error",
                    "Database error".to_string(),
                )
            }
            AppError::Json(e) => {
                tracing::error!("JSON error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "parse_error",
                    "Failed to process JSON".to_string(),
                )
            }
            AppError::Io(e) => {
                tracing::error!("IO error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "io_error",
                    "IO error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message,
            details: if cfg!(debug_assertions) {
                Some(self.to_string())
            } else {
                None
            },
        });

        (status, body).into_response()
    }
}
