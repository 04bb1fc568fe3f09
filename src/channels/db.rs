/**
 * Channel Database Operations
 *
 * This module contains database operations for channel documents:
 * creation, lookup, partial update, deletion, membership changes, and
 * message appends.
 *
 * Membership and history live as JSONB arrays inside the channel row, so
 * membership changes are read-modify-write on the document and message
 * appends are a single JSONB array concatenation.
 */

use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;
use chrono::Utc;

use crate::auth::users::Profile;
use crate::channels::types::{Channel, ChannelMessage, InsertChannelRequest, UpdateChannel};

const CHANNEL_COLUMNS: &str =
    "id, name, description, color, background, background_ref, image, image_ref, created_at, members, messages";

/// Create a new channel
///
/// The creator's profile becomes the first member; the message history
/// starts empty.
pub async fn create_channel(
    pool: &PgPool,
    data: InsertChannelRequest,
    creator: Profile,
) -> Result<Channel, sqlx::Error> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let channel = sqlx::query_as::<_, Channel>(&format!(
        r#"
        INSERT INTO channels (id, name, description, color, background, background_ref, image, image_ref, created_at, members, messages)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        RETURNING {CHANNEL_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(&data.name)
    .bind(&data.description)
    .bind(&data.color)
    .bind(&data.background)
    .bind(&data.background_ref)
    .bind(&data.image)
    .bind(&data.image_ref)
    .bind(now)
    .bind(Json(vec![creator]))
    .bind(Json(Vec::<ChannelMessage>::new()))
    .fetch_one(pool)
    .await?;

    Ok(channel)
}

/// Get a channel by ID
pub async fn get_channel_by_id(
    pool: &PgPool,
    id: Uuid,
) -> Result<Option<Channel>, sqlx::Error> {
    let channel = sqlx::query_as::<_, Channel>(&format!(
        r#"
        SELECT {CHANNEL_COLUMNS}
        FROM channels
        WHERE id = $1
        "#
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(channel)
}

/// Apply a partial update to a channel's presentation fields
///
/// Only the fields present in `data` are written; absent fields keep their
/// stored value.
pub async fn update_channel(
    pool: &PgPool,
    id: Uuid,
    data: UpdateChannel,
) -> Result<Channel, sqlx::Error> {
    let channel = sqlx::query_as::<_, Channel>(&format!(
        r#"
        UPDATE channels
        SET name = COALESCE($1, name),
            description = COALESCE($2, description),
            color = COALESCE($3, color),
            background = COALESCE($4, background),
            background_ref = COALESCE($5, background_ref),
            image = COALESCE($6, image),
            image_ref = COALESCE($7, image_ref)
        WHERE id = $8
        RETURNING {CHANNEL_COLUMNS}
        "#
    ))
    .bind(data.name)
    .bind(data.description)
    .bind(data.color)
    .bind(data.background)
    .bind(data.background_ref)
    .bind(data.image)
    .bind(data.image_ref)
    .bind(id)
    .fetch_one(pool)
    .await?;

    Ok(channel)
}

/// Delete a channel
pub async fn delete_channel(pool: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
    let result = sqlx::query(
        r#"
        DELETE FROM channels
        WHERE id = $1
        "#
    )
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(sqlx::Error::RowNotFound);
    }

    Ok(())
}

/// Add a member to a channel
///
/// Adding an existing member is a no-op; the document is returned
/// unchanged.
pub async fn add_member(
    pool: &PgPool,
    channel_id: Uuid,
    profile: Profile,
) -> Result<Channel, sqlx::Error> {
    let channel = get_channel_by_id(pool, channel_id)
        .await?
        .ok_or(sqlx::Error::RowNotFound)?;

    let mut members = channel.members.0.clone();
    if members.iter().any(|m| m.id == profile.id) {
        return Ok(channel);
    }
    members.push(profile);

    write_members(pool, channel_id, members).await
}

/// Remove a member from a channel
///
/// Removing a user who is not a member is a no-op; the document is
/// returned unchanged.
pub async fn remove_member(
    pool: &PgPool,
    channel_id: Uuid,
    user_id: Uuid,
) -> Result<Channel, sqlx::Error> {
    let channel = get_channel_by_id(pool, channel_id)
        .await?
        .ok_or(sqlx::Error::RowNotFound)?;

    let mut members = channel.members.0.clone();
    let before = members.len();
    members.retain(|m| m.id != user_id);
    if members.len() == before {
        return Ok(channel);
    }

    write_members(pool, channel_id, members).await
}

/// Append a message to a channel's history
pub async fn append_message(
    pool: &PgPool,
    channel_id: Uuid,
    message: &ChannelMessage,
) -> Result<Channel, sqlx::Error> {
    let channel = sqlx::query_as::<_, Channel>(&format!(
        r#"
        UPDATE channels
        SET messages = messages || $1
        WHERE id = $2
        RETURNING {CHANNEL_COLUMNS}
        "#
    ))
    .bind(Json(message))
    .bind(channel_id)
    .fetch_optional(pool)
    .await?
    .ok_or(sqlx::Error::RowNotFound)?;

    Ok(channel)
}

/// List the channels a user belongs to
pub async fn list_channels_for_user(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<Channel>, sqlx::Error> {
    let channels = sqlx::query_as::<_, Channel>(&format!(
        r#"
        SELECT {CHANNEL_COLUMNS}
        FROM channels
        WHERE members @> jsonb_build_array(jsonb_build_object('id', $1::text))
        ORDER BY created_at
        "#
    ))
    .bind(user_id.to_string())
    .fetch_all(pool)
    .await?;

    Ok(channels)
}

/// Overwrite a channel's member array
async fn write_members(
    pool: &PgPool,
    channel_id: Uuid,
    members: Vec<Profile>,
) -> Result<Channel, sqlx::Error> {
    let channel = sqlx::query_as::<_, Channel>(&format!(
        r#"
        UPDATE channels
        SET members = $1
        WHERE id = $2
        RETURNING {CHANNEL_COLUMNS}
        "#
    ))
    .bind(Json(members))
    .bind(channel_id)
    .fetch_optional(pool)
    .await?
    .ok_or(sqlx::Error::RowNotFound)?;

    Ok(channel)
}
