//! Palaver - Chat Backend
//!
//! Palaver is a chat-style backend server: CRUD over users and channels
//! backed by a document-shaped store, fronted by an HTTP API, plus a
//! real-time fan-out path over persistent WebSocket connections.
//!
//! # Overview
//!
//! The core of the server is the **connection hub**: an actor that owns
//! the registry of live connections, groups them into named channels,
//! and broadcasts message events to the subscribers of a target channel
//! set - race-free under concurrent connect/disconnect/broadcast,
//! because every registry mutation is linearized through the hub task's
//! command intake.
//!
//! Around the hub sits a conventional request/response application:
//! authentication with bcrypt-hashed passwords and JWT sessions, channel
//! CRUD with membership and message history embedded in the channel
//! document, and a handshake gate that authorizes WebSocket connections
//! before any hub state is created.
//!
//! # Module Structure
//!
//! - **`auth`** - Users, sessions (JWT), authentication handlers
//! - **`channels`** - Channel documents, CRUD, the broadcast trigger
//! - **`realtime`** - Connection hub, client lifecycle, handshake gate
//! - **`middleware`** - Bearer-token middleware for the HTTP API
//! - **`routes`** - Route configuration
//! - **`server`** - Application state, configuration, assembly
//! - **`error`** - Error types and HTTP conversion
//!
//! # Authorization Contract
//!
//! Both authorization paths - the HTTP middleware and the WebSocket
//! handshake gate - verify tokens through `auth::sessions::verify_token`,
//! so claims semantics never diverge between the synchronous API and the
//! real-time path.

/// Authentication and user management
pub mod auth;

/// Channel documents and operations
pub mod channels;

/// Real-time connection hub
pub mod realtime;

/// Request middleware
pub mod middleware;

/// Route configuration
pub mod routes;

/// Server setup and state
pub mod server;

/// Error types
pub mod error;

// Re-export commonly used types
pub use server::{create_app, AppState};
pub use realtime::{Hub, HubHandle, MessageEvent};
pub use error::ApiError;
