/**
 * Authentication Handler Types
 *
 * This module defines the request and response types used by authentication
 * handlers. These types are shared across signup, login, and profile handlers.
 */

use serde::{Deserialize, Serialize};
use crate::auth::users::Profile;

/// Sign up request
///
/// Contains the name, email and password for user registration.
#[derive(Deserialize, Serialize, Debug)]
pub struct SignupRequest {
    /// User's display name
    pub name: String,
    /// User's email address
    pub email: String,
    /// User's password (will be hashed before storage)
    pub password: String,
}

/// Login request
///
/// Contains the email and password for user authentication.
#[derive(Deserialize, Serialize, Debug)]
pub struct LoginRequest {
    /// User's email address
    pub email: String,
    /// User's password (will be verified against stored hash)
    pub password: String,
}

/// Auth response
///
/// Returned by the login handler. Contains the JWT token and the profile
/// for immediate authentication.
#[derive(Serialize, Debug)]
pub struct AuthResponse {
    /// JWT token for authentication (72-hour expiration)
    pub token: String,
    /// User profile (without sensitive data)
    pub user: Profile,
}
