/**
 * Signup Handler
 *
 * This module implements the user registration handler for POST /api/auth/signup.
 *
 * # Registration Process
 *
 * 1. Validate email format and password length
 * 2. Check if a user with this email already exists
 * 3. Hash password using bcrypt
 * 4. Create user in database
 * 5. Return the new profile
 *
 * # Security
 *
 * - Passwords are hashed using bcrypt with DEFAULT_COST
 * - Passwords are never returned in responses
 */

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use bcrypt::{hash, DEFAULT_COST};
use sqlx::PgPool;

use crate::auth::users::{create_user, get_user_by_email, Profile};
use crate::auth::handlers::types::SignupRequest;

/// Minimum accepted password length
const MIN_PASSWORD_LEN: usize = 8;

/// Sign up handler
///
/// This handler processes user registration requests. It validates the
/// input, creates a new user account, and returns the public profile.
///
/// # Arguments
///
/// * `State(pool)` - Database connection pool
/// * `Json(request)` - Signup request containing name, email and password
///
/// # Returns
///
/// JSON response with the created profile, or an error status code
///
/// # Errors
///
/// * `400 Bad Request` - If email format is invalid or password is too short
/// * `409 Conflict` - If a user with this email already exists
/// * `503 Service Unavailable` - If database is not configured
/// * `500 Internal Server Error` - If password hashing or user creation fails
pub async fn signup(
    State(pool): State<Option<PgPool>>,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, Json<Profile>), StatusCode> {
    let pool = pool.ok_or_else(|| {
        tracing::error!("Database not configured");
        StatusCode::SERVICE_UNAVAILABLE
    })?;
    tracing::info!("Signup request for: {}", request.email);

    if !request.email.contains('@') {
        tracing::warn!("Invalid email format: {}", request.email);
        return Err(StatusCode::BAD_REQUEST);
    }

    if request.password.len() < MIN_PASSWORD_LEN {
        tracing::warn!("Password too short for: {}", request.email);
        return Err(StatusCode::BAD_REQUEST);
    }

    if request.name.trim().is_empty() {
        tracing::warn!("Empty name in signup request");
        return Err(StatusCode::BAD_REQUEST);
    }

    // Reject duplicate emails before attempting the insert
    let existing = get_user_by_email(&pool, &request.email)
        .await
        .map_err(|e| {
            tracing::error!("Database error: {:?}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    if existing.is_some() {
        tracing::warn!("User already exists: {}", request.email);
        return Err(StatusCode::CONFLICT);
    }

    // Hash password
    let password_hash = hash(&request.password, DEFAULT_COST)
        .map_err(|e| {
            tracing::error!("Password hashing failed: {:?}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    // Create user
    let user = create_user(&pool, request.name, request.email, password_hash)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create user: {:?}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    tracing::info!("User created: {} ({})", user.name, user.email);

    Ok((StatusCode::CREATED, Json(Profile::from(user))))
}
