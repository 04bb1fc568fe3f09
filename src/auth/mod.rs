//! Authentication Module
//!
//! This module handles user authentication, registration, and session
//! management. It provides HTTP handlers for authentication endpoints and
//! manages user data and JWT tokens.
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs      - Module exports and documentation
//! ├── users.rs    - User model and database operations
//! ├── sessions.rs - JWT token management
//! └── handlers/   - HTTP handlers
//! ```
//!
//! # Authentication Flow
//!
//! 1. **Signup**: name + email + password → user created → profile returned
//! 2. **Login**: email + password → credentials verified → JWT token returned
//! 3. **Authenticated requests**: `Authorization: Bearer <token>` verified by
//!    the middleware; the WebSocket gate verifies the same token format at
//!    handshake time through the same `sessions::verify_token` contract.
//!
//! # Security
//!
//! - Passwords are hashed using bcrypt before storage
//! - JWT tokens are used for stateless authentication
//! - Tokens expire after 72 hours
//! - Invalid credentials return 401 (no information leakage)

/// User data model and database operations
pub mod users;

/// JWT token generation and validation
pub mod sessions;

/// HTTP handlers for authentication endpoints
pub mod handlers;

// Re-export commonly used types and handlers
pub use users::{User, Profile};
pub use sessions::{Claims, create_token, verify_token};
pub use handlers::types::{SignupRequest, LoginRequest, AuthResponse};
pub use handlers::{signup, login, get_me, list_users, update_me, delete_me};
