/**
 * Server Initialization
 *
 * This module handles the initialization and setup of the Axum HTTP
 * server: hub startup, database loading, and route configuration.
 *
 * # Initialization Process
 *
 * 1. Start the connection hub task
 * 2. Load optional services (database)
 * 3. Load the WebSocket origin policy
 * 4. Create and configure the router
 */

use axum::Router;

use crate::realtime::hub::Hub;
use crate::routes::router::create_router;
use crate::server::config::{load_database, OriginPolicy};
use crate::server::state::AppState;

/// Create and configure the Axum application
///
/// # Returns
///
/// Configured Axum Router ready to serve requests
///
/// # Initialization Steps
///
/// 1. **Start the hub**: the registry-owning task is spawned here and
///    lives for the rest of the process; everything else holds handles.
/// 2. **Load services**: database pool and migrations (optional).
/// 3. **Origin policy**: explicit transport policy for the handshake.
/// 4. **Create router**: all routes and middleware.
///
/// # Error Handling
///
/// The function is designed to be resilient: a missing database disables
/// persistence-backed endpoints (503) but the server still starts.
pub async fn create_app() -> Router<()> {
    tracing::info!("Initializing palaver backend server");

    // Step 1: start the connection hub
    let (hub, hub_handle) = Hub::new();
    tokio::spawn(hub.run());
    tracing::info!("Connection hub started");

    // Step 2: load optional services
    let db_pool = load_database().await;

    // Step 3: transport origin policy for the real-time path
    let origin_policy = OriginPolicy::from_env();

    // Step 4: create app state and router
    let app_state = AppState {
        db_pool,
        hub: hub_handle,
        origin_policy,
    };

    create_router(app_state)
}
