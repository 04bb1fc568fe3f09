//! Middleware Module
//!
//! Request processing middleware for the HTTP API.
//!
//! - **`auth`** - Bearer-token authentication middleware and the `AuthUser`
//!   extractor consumed by protected handlers.

/// Authentication middleware
pub mod auth;

pub use auth::{auth_middleware, AuthenticatedUser, AuthUser};
