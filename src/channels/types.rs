/**
 * Channel Types
 *
 * This module defines the channel document model and the request types
 * accepted by the channel handlers.
 *
 * Channels keep the document shape of the original data model: membership
 * and message history are arrays embedded in the channel row (JSONB), not
 * join tables.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use crate::auth::users::Profile;

/// A message stored inside a channel document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChannelMessage {
    /// Profile of the author at the time of sending
    pub author: Profile,
    /// Send time, fixed-format server-local timestamp (see `realtime::envelope`)
    pub sent_at: String,
    /// Message text
    pub body: String,
    /// Attached image URL (optional)
    pub image: Option<String>,
    /// Storage reference for the attached image (optional)
    pub image_ref: Option<String>,
}

/// Channel document
///
/// Members and messages are embedded JSONB arrays; the whole row
/// round-trips as one document.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Channel {
    /// Unique channel ID (UUID)
    pub id: uuid::Uuid,
    /// Channel name, the subscription key for the real-time path
    pub name: String,
    /// Channel description
    pub description: String,
    /// Accent color
    pub color: String,
    /// Background image URL
    pub background: String,
    /// Storage reference for the background image
    pub background_ref: String,
    /// Channel image URL
    pub image: String,
    /// Storage reference for the channel image
    pub image_ref: String,
    /// Created at timestamp
    pub created_at: DateTime<Utc>,
    /// Profiles of the channel members
    pub members: Json<Vec<Profile>>,
    /// Message history
    pub messages: Json<Vec<ChannelMessage>>,
}

/// Create channel request
///
/// The creator becomes the first member; members and messages start out
/// from the creator alone and an empty history.
#[derive(Debug, Deserialize, Serialize)]
pub struct InsertChannelRequest {
    /// Channel name
    pub name: String,
    /// Channel description
    #[serde(default)]
    pub description: String,
    /// Accent color
    #[serde(default)]
    pub color: String,
    /// Background image URL
    #[serde(default)]
    pub background: String,
    /// Storage reference for the background image
    #[serde(default)]
    pub background_ref: String,
    /// Channel image URL
    #[serde(default)]
    pub image: String,
    /// Storage reference for the channel image
    #[serde(default)]
    pub image_ref: String,
}

/// Partial channel update
///
/// `None` fields keep their current value. Membership and messages are not
/// updatable through this type; they have their own operations.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct UpdateChannel {
    /// New channel name
    pub name: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New accent color
    pub color: Option<String>,
    /// New background image URL
    pub background: Option<String>,
    /// New background storage reference
    pub background_ref: Option<String>,
    /// New channel image URL
    pub image: Option<String>,
    /// New image storage reference
    pub image_ref: Option<String>,
}

/// Post message request
#[derive(Debug, Deserialize, Serialize)]
pub struct InsertMessageRequest {
    /// Message text
    pub body: String,
    /// Attached image URL (optional)
    #[serde(default)]
    pub image: Option<String>,
    /// Storage reference for the attached image (optional)
    #[serde(default)]
    pub image_ref: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_channel_request_defaults() {
        let request: InsertChannelRequest =
            serde_json::from_str(r#"{"name": "general"}"#).unwrap();
        assert_eq!(request.name, "general");
        assert_eq!(request.description, "");
        assert_eq!(request.color, "");
    }

    #[test]
    fn test_update_channel_absent_fields_are_none() {
        let update: UpdateChannel =
            serde_json::from_str(r#"{"description": "all hands"}"#).unwrap();
        assert_eq!(update.description.as_deref(), Some("all hands"));
        assert!(update.name.is_none());
        assert!(update.color.is_none());
    }
}
