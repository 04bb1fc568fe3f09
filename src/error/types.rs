/**
 * Server Error Types
 *
 * This module defines error types for the HTTP API and the real-time hub.
 * These errors are used in handlers and can be converted to HTTP responses.
 *
 * # Error Categories
 *
 * ## Handler Errors
 *
 * Handler errors occur when processing HTTP requests:
 * - Missing or malformed request data
 * - Authentication failures
 * - Unknown resources
 *
 * ## Infrastructure Errors
 *
 * - Database query failures
 * - JSON serialization failures
 * - A hub whose command intake has shut down
 */

use thiserror::Error;
use axum::http::StatusCode;

/// Errors returned by HTTP handlers and the real-time layer
///
/// Each variant carries enough context to produce an HTTP response.
/// Conversion to a response happens in `error::conversion`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Handler error with an explicit status code
    ///
    /// Used for request-level failures: bad input, missing resources,
    /// rejected credentials.
    #[error("{message}")]
    Handler {
        /// HTTP status code for this error
        status: StatusCode,
        /// Human-readable error message
        message: String,
    },

    /// Database query failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// JSON serialization failure
    ///
    /// Raised when a broadcast envelope or a response body cannot be
    /// serialized. Broadcast callers see this as a hard failure, never as
    /// a silent zero-delivery.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The hub's command intake is closed
    ///
    /// Happens only when the hub task has stopped while connections or
    /// handlers are still alive.
    #[error("Hub unavailable: {message}")]
    Hub {
        /// Human-readable error message
        message: String,
    },
}

impl ApiError {
    /// Create a new handler error with a status code
    pub fn handler(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Handler {
            status,
            message: message.into(),
        }
    }

    /// Create a 400 Bad Request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::BAD_REQUEST, message)
    }

    /// Create a 401 Unauthorized error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::UNAUTHORIZED, message)
    }

    /// Create a 404 Not Found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::NOT_FOUND, message)
    }

    /// Create a 503 Service Unavailable error
    ///
    /// Returned when the database pool is not configured.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::SERVICE_UNAVAILABLE, message)
    }

    /// Create a hub-unavailable error
    pub fn hub(message: impl Into<String>) -> Self {
        Self::Hub {
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    ///
    /// # Status Code Mapping
    ///
    /// - `Handler` - Uses the status code from the error
    /// - `Database` - 404 for `RowNotFound`, 500 otherwise
    /// - `Serialization` - 500 Internal Server Error
    /// - `Hub` - 503 Service Unavailable
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Handler { status, .. } => *status,
            Self::Database(sqlx::Error::RowNotFound) => StatusCode::NOT_FOUND,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Hub { .. } => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Get the error message
    pub fn message(&self) -> String {
        match self {
            Self::Handler { message, .. } => message.clone(),
            Self::Database(sqlx::Error::RowNotFound) => "Not found".to_string(),
            // Internal detail stays in the logs, not in the response body
            Self::Database(_) => "Database error".to_string(),
            Self::Serialization(err) => format!("Serialization error: {}", err),
            Self::Hub { message } => message.clone(),
        }
    }
}
