/**
 * Error Conversion
 *
 * This module provides conversion implementations for server errors,
 * allowing them to be returned directly from Axum handlers.
 *
 * # Response Format
 *
 * Error responses are returned as JSON with the following structure:
 * ```json
 * {
 *   "error": "Error message",
 *   "status": 400
 * }
 * ```
 */

use axum::{
    response::{Response, IntoResponse},
    http::StatusCode,
    body::Body,
};
use crate::error::types::ApiError;

impl IntoResponse for ApiError {
    /// Convert a server error into an HTTP response
    ///
    /// Creates a JSON error response with the appropriate status code and
    /// error message. Database detail never reaches the response body; it
    /// is logged here instead.
    fn into_response(self) -> Response {
        if let ApiError::Database(ref err) = self {
            tracing::error!("Database error: {:?}", err);
        }

        let status = self.status_code();
        let message = self.message();

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        Response::builder()
            .status(status)
            .header("Content-Type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap_or_else(|_| {
                format!(r#"{{"error":"{}","status":{}}}"#, message, status.as_u16())
            })))
            .unwrap_or_else(|_| {
                Response::builder()
                    .status(StatusCode::INTERNAL_SERVER_ERROR)
                    .body(Body::from("Internal Server Error"))
                    .unwrap()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_status() {
        let response = ApiError::not_found("Channel not found").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_error_response_content_type() {
        let response = ApiError::bad_request("Invalid request").into_response();
        assert_eq!(
            response.headers().get("Content-Type").unwrap(),
            "application/json"
        );
    }
}
