/**
 * Channel Handlers
 *
 * HTTP handlers for channel CRUD, membership, and message creation.
 * All endpoints sit behind the bearer-token middleware.
 *
 * Message creation is the broadcast trigger for the real-time path:
 * after the message is appended to the channel document, the handler
 * hands the envelope to the hub, which fans it out to the channel's
 * live subscribers.
 */

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::users::{get_user_by_id, Profile};
use crate::channels::db;
use crate::channels::types::{
    Channel, ChannelMessage, InsertChannelRequest, InsertMessageRequest, UpdateChannel,
};
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::realtime::envelope::{event_timestamp, MessageEvent};
use crate::realtime::hub::HubHandle;
use crate::server::state::AppState;

fn require_pool(pool: &Option<PgPool>) -> Result<&PgPool, ApiError> {
    pool.as_ref()
        .ok_or_else(|| ApiError::service_unavailable("Database not configured"))
}

async fn require_profile(pool: &PgPool, user_id: Uuid) -> Result<Profile, ApiError> {
    let user = get_user_by_id(pool, user_id)
        .await?
        .ok_or_else(|| ApiError::unauthorized("User no longer exists"))?;
    Ok(Profile::from(user))
}

/// Create channel handler (POST /api/channels)
///
/// The authenticated caller becomes the first member.
///
/// # Errors
///
/// * `400 Bad Request` - If the channel name is empty
/// * `503 Service Unavailable` - If database is not configured
pub async fn create_channel(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(request): Json<InsertChannelRequest>,
) -> Result<(StatusCode, Json<Channel>), ApiError> {
    let pool = require_pool(&state.db_pool)?;

    if request.name.trim().is_empty() {
        return Err(ApiError::bad_request("Channel name must not be empty"));
    }

    let creator = require_profile(pool, user.user_id).await?;
    let channel = db::create_channel(pool, request, creator).await?;

    tracing::info!("Channel created: {} ({})", channel.name, channel.id);
    Ok((StatusCode::CREATED, Json(channel)))
}

/// List channels handler (GET /api/channels)
///
/// Returns the channels the authenticated caller is a member of.
pub async fn list_channels(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<Channel>>, ApiError> {
    let pool = require_pool(&state.db_pool)?;
    let channels = db::list_channels_for_user(pool, user.user_id).await?;
    Ok(Json(channels))
}

/// Update channel handler (PATCH /api/channels/{id})
///
/// Partial update of the channel's presentation fields.
///
/// # Errors
///
/// * `404 Not Found` - If the channel does not exist
pub async fn update_channel(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateChannel>,
) -> Result<Json<Channel>, ApiError> {
    let pool = require_pool(&state.db_pool)?;
    let channel = db::update_channel(pool, id, request).await?;
    Ok(Json(channel))
}

/// Delete channel handler (DELETE /api/channels/{id})
///
/// # Errors
///
/// * `404 Not Found` - If the channel does not exist
pub async fn delete_channel(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let pool = require_pool(&state.db_pool)?;
    db::delete_channel(pool, id).await?;
    tracing::info!("Channel deleted: {}", id);
    Ok(StatusCode::NO_CONTENT)
}

/// Add member handler (POST /api/channels/{id}/members/{user_id})
///
/// Adding an existing member is a no-op.
///
/// # Errors
///
/// * `404 Not Found` - If the channel or the user does not exist
pub async fn add_member(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path((id, member_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Channel>, ApiError> {
    let pool = require_pool(&state.db_pool)?;

    let member = get_user_by_id(pool, member_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    let channel = db::add_member(pool, id, Profile::from(member)).await?;
    Ok(Json(channel))
}

/// Remove member handler (DELETE /api/channels/{id}/members/{user_id})
///
/// Removing a non-member is a no-op.
///
/// # Errors
///
/// * `404 Not Found` - If the channel does not exist
pub async fn remove_member(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path((id, member_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Channel>, ApiError> {
    let pool = require_pool(&state.db_pool)?;
    let channel = db::remove_member(pool, id, member_id).await?;
    Ok(Json(channel))
}

/// Post message handler (POST /api/channels/{id}/messages)
///
/// Appends the message to the channel document, then triggers the
/// real-time broadcast to the channel's live subscribers. A broadcast
/// that reaches nobody is a success; a payload that cannot be
/// serialized is a hard failure.
///
/// # Errors
///
/// * `404 Not Found` - If the channel does not exist
/// * `500 Internal Server Error` - If the envelope cannot be serialized
/// * `503 Service Unavailable` - If the database or the hub is down
pub async fn post_message(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<InsertMessageRequest>,
) -> Result<(StatusCode, Json<Channel>), ApiError> {
    let pool = require_pool(&state.db_pool)?;
    let author = require_profile(pool, user.user_id).await?;

    let message = ChannelMessage {
        author,
        sent_at: event_timestamp(),
        body: request.body,
        image: request.image,
        image_ref: request.image_ref,
    };

    let channel = db::append_message(pool, id, &message).await?;

    broadcast_message(&state.hub, &channel, message).await?;

    Ok((StatusCode::CREATED, Json(channel)))
}

/// Hand a persisted message to the hub for fan-out
async fn broadcast_message(
    hub: &HubHandle,
    channel: &Channel,
    message: ChannelMessage,
) -> Result<(), ApiError> {
    let event = MessageEvent::new(channel.name.clone(), message);
    let delivered = hub
        .broadcast(&event, std::slice::from_ref(&channel.name))
        .await?;

    tracing::info!(
        "Message in {} broadcast to {} subscriber(s)",
        channel.name,
        delivered
    );
    Ok(())
}
