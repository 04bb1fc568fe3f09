//! Channels Module
//!
//! Channel documents and their HTTP operations: CRUD, membership, and
//! message creation (which doubles as the real-time broadcast trigger).
//!
//! # Module Structure
//!
//! ```text
//! channels/
//! ├── mod.rs      - Module exports and documentation
//! ├── types.rs    - Channel document model and request types
//! ├── db.rs       - Database operations
//! └── handlers.rs - HTTP handlers
//! ```
//!
//! # Data Model
//!
//! A channel is one document: its members and message history are JSONB
//! arrays embedded in the row, mirroring the original document-store
//! shape. The channel *name* is the subscription key used by the
//! real-time path.

/// Channel document model and request types
pub mod types;

/// Database operations for channels
pub mod db;

/// HTTP handlers for channel endpoints
pub mod handlers;

// Re-export commonly used types
pub use types::{Channel, ChannelMessage, InsertChannelRequest, UpdateChannel, InsertMessageRequest};
pub use handlers::{
    create_channel, list_channels, update_channel, delete_channel,
    add_member, remove_member, post_message,
};
