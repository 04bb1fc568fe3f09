//! Real-time Module
//!
//! This module implements the real-time fan-out path: a connection hub
//! that tracks live WebSocket connections grouped by channel, and
//! broadcasts message events to the subscribers of a target channel set.
//!
//! # Architecture
//!
//! The realtime module is organized into focused submodules:
//!
//! - **`hub`** - The registry-owning actor and its handle
//! - **`client`** - Per-connection state and the read/write loops
//! - **`gate`** - Handshake-time authorization before the upgrade
//! - **`envelope`** - The serializable broadcast envelope
//!
//! # Module Structure
//!
//! ```text
//! realtime/
//! ├── mod.rs      - Module exports and documentation
//! ├── hub.rs      - Connection registry actor and broadcast dispatch
//! ├── client.rs   - Client state, outbound queue, connection loops
//! ├── gate.rs     - WebSocket upgrade handler and authorization
//! └── envelope.rs - Broadcast envelope and timestamp format
//! ```
//!
//! # Data Flow
//!
//! Upgrade request → gate validates credential → connection task
//! constructs a `Client` and registers it with the hub → the client's
//! read/write loops run. Message persisted via the HTTP API → handler
//! calls `HubHandle::broadcast` → hub queues the serialized envelope on
//! the outbound queue of every subscriber of the target channels.
//!
//! # Concurrency
//!
//! One task owns the hub registry and processes registration,
//! unregistration, and broadcast commands sequentially; each connection
//! adds two tasks (read loop, write loop). Clients never touch registry
//! state - all communication goes through the hub's command intake.
//! Teardown is idempotent and driven by whichever loop detects the
//! failure first; the socket closes exactly once, in the write loop.

/// Connection registry actor and broadcast dispatch
pub mod hub;

/// Client state and connection loops
pub mod client;

/// Handshake-time authorization
pub mod gate;

/// Broadcast envelope and timestamp format
pub mod envelope;

// Re-export commonly used types
pub use hub::{Hub, HubHandle};
pub use client::{Client, OUTBOUND_QUEUE_CAPACITY};
pub use envelope::{MessageEvent, event_timestamp};
pub use gate::handle_socket_upgrade;
