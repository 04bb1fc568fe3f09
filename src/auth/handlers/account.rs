/**
 * Account Handlers
 *
 * This module implements the handlers operating on user accounts beyond
 * signup and login:
 *
 * - `GET /api/users` - list all user profiles
 * - `PATCH /api/users/me` - partial update of the caller's profile
 * - `DELETE /api/users/me` - delete the caller's account
 *
 * All three endpoints sit behind the bearer-token middleware.
 */

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use sqlx::PgPool;

use crate::auth::users::{self, Profile, UpdateUser};
use crate::middleware::auth::AuthUser;

/// List users handler
///
/// Returns the public profile of every registered user.
///
/// # Errors
///
/// * `503 Service Unavailable` - If database is not configured
/// * `500 Internal Server Error` - If the database query fails
pub async fn list_users(
    State(pool): State<Option<PgPool>>,
    AuthUser(_user): AuthUser,
) -> Result<Json<Vec<Profile>>, StatusCode> {
    let pool = pool.ok_or_else(|| {
        tracing::error!("Database not configured");
        StatusCode::SERVICE_UNAVAILABLE
    })?;

    let profiles = users::list_users(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Database error: {:?}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(Json(profiles))
}

/// Update current user handler
///
/// Applies a partial update to the authenticated user's profile. Fields
/// absent from the request body keep their stored value.
///
/// # Errors
///
/// * `404 Not Found` - If the user no longer exists
/// * `503 Service Unavailable` - If database is not configured
/// * `500 Internal Server Error` - If the database query fails
pub async fn update_me(
    State(pool): State<Option<PgPool>>,
    AuthUser(user): AuthUser,
    Json(request): Json<UpdateUser>,
) -> Result<Json<Profile>, StatusCode> {
    let pool = pool.ok_or_else(|| {
        tracing::error!("Database not configured");
        StatusCode::SERVICE_UNAVAILABLE
    })?;
    tracing::info!("Profile update for user {}", user.user_id);

    let updated = users::update_user(&pool, user.user_id, request)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => {
                tracing::warn!("User not found: {}", user.user_id);
                StatusCode::NOT_FOUND
            }
            _ => {
                tracing::error!("Database error: {:?}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        })?;

    Ok(Json(Profile::from(updated)))
}

/// Delete current user handler
///
/// Removes the authenticated user's account.
///
/// # Errors
///
/// * `404 Not Found` - If the user no longer exists
/// * `503 Service Unavailable` - If database is not configured
/// * `500 Internal Server Error` - If the database query fails
pub async fn delete_me(
    State(pool): State<Option<PgPool>>,
    AuthUser(user): AuthUser,
) -> Result<StatusCode, StatusCode> {
    let pool = pool.ok_or_else(|| {
        tracing::error!("Database not configured");
        StatusCode::SERVICE_UNAVAILABLE
    })?;
    tracing::info!("Account deletion for user {}", user.user_id);

    users::delete_user(&pool, user.user_id)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => StatusCode::NOT_FOUND,
            _ => {
                tracing::error!("Database error: {:?}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        })?;

    Ok(StatusCode::NO_CONTENT)
}
