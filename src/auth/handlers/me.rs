/**
 * Get Current User Handler
 *
 * This module implements the handler for GET /api/auth/me, which returns
 * the profile of the currently authenticated user.
 *
 * # Authentication
 *
 * This endpoint sits behind the bearer-token middleware; the verified user
 * arrives through the `AuthUser` extractor.
 */

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use sqlx::PgPool;

use crate::auth::users::{get_user_by_id, Profile};
use crate::middleware::auth::AuthUser;

/// Get current user handler
///
/// Returns the profile of the authenticated user.
///
/// # Arguments
///
/// * `State(pool)` - Database connection pool
/// * `AuthUser(user)` - Authenticated user injected by the middleware
///
/// # Errors
///
/// * `404 Not Found` - If the user no longer exists
/// * `503 Service Unavailable` - If database is not configured
/// * `500 Internal Server Error` - If the database query fails
pub async fn get_me(
    State(pool): State<Option<PgPool>>,
    AuthUser(user): AuthUser,
) -> Result<Json<Profile>, StatusCode> {
    let pool = pool.ok_or_else(|| {
        tracing::error!("Database not configured");
        StatusCode::SERVICE_UNAVAILABLE
    })?;

    let record = get_user_by_id(&pool, user.user_id)
        .await
        .map_err(|e| {
            tracing::error!("Database error: {:?}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .ok_or_else(|| {
            tracing::warn!("User not found: {}", user.user_id);
            StatusCode::NOT_FOUND
        })?;

    Ok(Json(Profile::from(record)))
}
