/**
 * Connection Gate
 *
 * Handshake-time authorization for the real-time path, run once per
 * incoming connection attempt - before the protocol upgrade and before
 * any hub state exists.
 *
 * # Handshake
 *
 * `GET /ws/{token}/{channel}` carries the bearer credential and the
 * requested channel name as path parameters. The gate:
 *
 * 1. applies the transport origin policy (an explicit configuration
 *    input, not a hardcoded accept-all),
 * 2. verifies the credential through `auth::sessions::verify_token` -
 *    the same claims contract the HTTP middleware uses, so token
 *    semantics never diverge between the two paths,
 * 3. resolves the subject's profile from the user store,
 * 4. and only then upgrades the transport and hands the socket to the
 *    connection task.
 *
 * Any failure rejects the attempt without upgrading: no client is
 * constructed, no registry mutation occurs, no loops start.
 */

use axum::{
    extract::{Path, State, WebSocketUpgrade},
    http::{header::ORIGIN, HeaderMap, StatusCode},
    response::Response,
};

use crate::auth::sessions::verify_token;
use crate::auth::users::get_user_by_id;
use crate::realtime::client::run_connection;
use crate::server::state::AppState;

/// WebSocket upgrade handler (GET /ws/{token}/{channel})
///
/// # Errors
///
/// * `403 Forbidden` - If the origin policy rejects the request
/// * `401 Unauthorized` - If the token is malformed, expired, carries a
///   bad signature, or its subject cannot be resolved to a user
/// * `503 Service Unavailable` - If the database is not configured
/// * `500 Internal Server Error` - If the user lookup fails
pub async fn handle_socket_upgrade(
    State(state): State<AppState>,
    Path((token, channel)): Path<(String, String)>,
    headers: HeaderMap,
    ws: WebSocketUpgrade,
) -> Result<Response, StatusCode> {
    // Transport origin policy first: cheapest check, no secrets involved
    let origin = headers.get(ORIGIN).and_then(|h| h.to_str().ok());
    if !state.origin_policy.allows(origin) {
        tracing::warn!("WebSocket origin rejected: {:?}", origin);
        return Err(StatusCode::FORBIDDEN);
    }

    // Credential verification - shared contract with the HTTP middleware
    let claims = verify_token(token.trim())
        .map_err(|e| {
            tracing::warn!("WebSocket token rejected: {:?}", e);
            StatusCode::UNAUTHORIZED
        })?;

    let user_id = uuid::Uuid::parse_str(&claims.sub)
        .map_err(|e| {
            tracing::warn!("Invalid subject in WebSocket token: {:?}", e);
            StatusCode::UNAUTHORIZED
        })?;

    // Subject resolution: the token must belong to a live account
    let pool = state.db_pool.as_ref().ok_or_else(|| {
        tracing::error!("Database not configured");
        StatusCode::SERVICE_UNAVAILABLE
    })?;

    let user = get_user_by_id(pool, user_id)
        .await
        .map_err(|e| {
            tracing::error!("Database error during handshake: {:?}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .ok_or_else(|| {
            tracing::warn!("WebSocket token subject not found: {}", user_id);
            StatusCode::UNAUTHORIZED
        })?;

    tracing::info!(
        "WebSocket handshake authorized for {} on channel {}",
        user.email,
        channel
    );

    // Authorization passed: upgrade and hand the socket to the
    // connection task, which registers with the hub and runs the loops.
    let hub = state.hub.clone();
    Ok(ws.on_upgrade(move |socket| run_connection(socket, hub, user.id, channel)))
}
