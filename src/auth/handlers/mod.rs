//! Authentication HTTP Handlers
//!
//! This module contains the HTTP handlers for authentication and account
//! endpoints.
//!
//! # Module Structure
//!
//! ```text
//! handlers/
//! ├── mod.rs     - Handler exports
//! ├── types.rs   - Request/response types
//! ├── signup.rs  - User registration handler
//! ├── login.rs   - User authentication handler
//! ├── me.rs      - Get current user handler
//! └── account.rs - List/update/delete account handlers
//! ```

/// Request/response types
pub mod types;

/// User registration handler
pub mod signup;

/// User authentication handler
pub mod login;

/// Get current user handler
pub mod me;

/// Account management handlers
pub mod account;

// Re-export handlers for route configuration
pub use signup::signup;
pub use login::login;
pub use me::get_me;
pub use account::{list_users, update_me, delete_me};
