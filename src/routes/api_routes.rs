/**
 * API Route Handlers
 *
 * This module defines route handlers for API endpoints, including:
 * - Authentication endpoints (signup, login, get current user)
 * - Account endpoints (list, update, delete)
 * - Channel endpoints (CRUD, membership, messages)
 *
 * # Routes
 *
 * ## Authentication (public)
 * - `POST /api/auth/signup` - User registration
 * - `POST /api/auth/login` - User login
 *
 * ## Authenticated
 * - `GET /api/auth/me` - Get current user profile
 * - `GET /api/users` - List user profiles
 * - `PATCH /api/users/me` - Update own profile
 * - `DELETE /api/users/me` - Delete own account
 * - `POST /api/channels` - Create channel
 * - `GET /api/channels` - List own channels
 * - `PATCH /api/channels/{id}` - Update channel
 * - `DELETE /api/channels/{id}` - Delete channel
 * - `POST /api/channels/{id}/members/{user_id}` - Add member
 * - `DELETE /api/channels/{id}/members/{user_id}` - Remove member
 * - `POST /api/channels/{id}/messages` - Post message (broadcast trigger)
 */

use axum::Router;
use axum::routing::{get, patch, post};

use crate::auth::{signup, login, get_me, list_users, update_me, delete_me};
use crate::channels::handlers::{
    add_member, create_channel, delete_channel, list_channels, post_message,
    remove_member, update_channel,
};
use crate::middleware::auth::auth_middleware;
use crate::server::state::AppState;

/// Configure API routes
///
/// Public routes (signup, login) are reachable without a token; every
/// other route passes through the bearer-token middleware, which injects
/// the `AuthenticatedUser` extension the handlers extract.
///
/// # Arguments
///
/// * `router` - The router to add routes to
/// * `app_state` - Application state, needed to instantiate the middleware
///
/// # Returns
///
/// Router with API routes configured
pub fn configure_api_routes(router: Router<AppState>, app_state: &AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/api/auth/me", get(get_me))
        // Account endpoints
        .route("/api/users", get(list_users))
        .route("/api/users/me", patch(update_me).delete(delete_me))
        // Channel endpoints
        .route("/api/channels", post(create_channel).get(list_channels))
        .route(
            "/api/channels/{id}",
            patch(update_channel).delete(delete_channel),
        )
        .route(
            "/api/channels/{id}/members/{user_id}",
            post(add_member).delete(remove_member),
        )
        .route("/api/channels/{id}/messages", post(post_message))
        .route_layer(axum::middleware::from_fn_with_state(
            app_state.clone(),
            auth_middleware,
        ));

    router
        // Authentication endpoints (public)
        .route("/api/auth/signup", post(signup))
        .route("/api/auth/login", post(login))
        .merge(protected)
}
