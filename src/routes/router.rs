/**
 * Router Configuration
 *
 * This module provides the main router creation function that combines
 * all route configurations into a single Axum router.
 *
 * # Route Order
 *
 * 1. WebSocket upgrade and health endpoints
 * 2. API routes (auth, users, channels)
 * 3. Fallback handler (404)
 *
 * # Layers
 *
 * Tracing and CORS layers wrap the whole router; they are composed with
 * `tower::ServiceBuilder` so they apply in a single, predictable order.
 */

use axum::{response::Json, Router};
use axum::extract::State;
use axum::routing::get;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::realtime::gate::handle_socket_upgrade;
use crate::routes::api_routes::configure_api_routes;
use crate::server::state::AppState;

/// Create the Axum router with all routes configured
///
/// # Arguments
///
/// * `app_state` - Application state containing the pool, hub handle and
///   origin policy
///
/// # Returns
///
/// Configured Axum Router ready to serve requests
///
/// # Route Details
///
/// - `GET /ws/{token}/{channel}` - WebSocket handshake and upgrade
/// - `GET /health` - Liveness plus current connection count
/// - `/api/...` - REST endpoints (see `api_routes`)
pub fn create_router(app_state: AppState) -> Router<()> {
    let router = Router::new()
        // Real-time path: authorization happens in the gate, before the
        // upgrade, so this route carries no middleware
        .route("/ws/{token}/{channel}", get(handle_socket_upgrade))
        .route("/health", get(health));

    // Add API routes
    let router = configure_api_routes(router, &app_state);

    // Fallback handler for 404
    let router = router.fallback(|| async {
        (axum::http::StatusCode::NOT_FOUND, "404 Not Found")
    });

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(app_state)
}

/// Health check handler
///
/// Reports liveness and the number of live WebSocket connections, read
/// from the hub.
async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let clients = state.hub.client_count().await;
    Json(serde_json::json!({
        "status": "ok",
        "clients": clients,
    }))
}
