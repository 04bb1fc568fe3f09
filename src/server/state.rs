/**
 * Application State Management
 *
 * This module defines the application state structure and implements
 * the necessary `FromRef` traits for Axum state extraction.
 *
 * # Architecture
 *
 * The `AppState` struct serves as the central state container for the
 * application, holding:
 * - The database connection pool (optional)
 * - The hub handle for the real-time path
 * - The WebSocket origin policy
 *
 * # Thread Safety
 *
 * Every field is cheaply cloneable and thread-safe: `PgPool` is an Arc
 * internally, `HubHandle` is a channel sender, and the origin policy is
 * immutable after startup. Note the registry itself is *not* here - it
 * is owned exclusively by the hub task and reachable only through the
 * handle.
 *
 * # State Extraction
 *
 * The `FromRef` implementations allow Axum handlers to extract specific
 * parts of the state without needing the entire `AppState`. This follows
 * Axum's recommended pattern for state management.
 */

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::realtime::hub::HubHandle;
use crate::server::config::OriginPolicy;

/// Application state shared across all request handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    ///
    /// `None` if the database is not configured (e.g. `DATABASE_URL` is
    /// unset). Handlers answer 503 in that case.
    pub db_pool: Option<PgPool>,

    /// Handle to the connection hub task
    ///
    /// Used by the handshake gate to register connections and by the
    /// message-create flow to trigger broadcasts.
    pub hub: HubHandle,

    /// Transport origin policy for WebSocket handshakes
    pub origin_policy: OriginPolicy,
}

/// Allow handlers to extract `Option<PgPool>` directly
///
/// Handlers that only need the database can take
/// `State(pool): State<Option<PgPool>>`.
impl FromRef<AppState> for Option<PgPool> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.db_pool.clone()
    }
}

/// Allow handlers to extract the hub handle directly
impl FromRef<AppState> for HubHandle {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.hub.clone()
    }
}
