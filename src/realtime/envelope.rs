/**
 * Broadcast Envelope
 *
 * This module defines the single serializable envelope delivered over the
 * real-time path, and the fixed-format timestamp used both for persisted
 * messages and for broadcast frames.
 *
 * Subscribers receive the envelope as opaque serialized bytes; there is no
 * acknowledgment protocol.
 */

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use crate::channels::types::ChannelMessage;

/// Timestamp format used on the wire and in channel documents
pub const EVENT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Offset of the reported clock from UTC, in hours.
/// Timestamps are rendered in UTC-5 to match the deployed region's clock.
const EVENT_UTC_OFFSET_HOURS: i32 = -5;

/// Render a timestamp in the fixed event format
pub fn format_event_time(instant: DateTime<Utc>) -> String {
    let offset = FixedOffset::east_opt(EVENT_UTC_OFFSET_HOURS * 3600)
        .expect("offset within valid range");
    instant.with_timezone(&offset).format(EVENT_TIME_FORMAT).to_string()
}

/// Current time in the fixed event format
pub fn event_timestamp() -> String {
    format_event_time(Utc::now())
}

/// Envelope broadcast to channel subscribers
///
/// Carries the target channel name and the message exactly as it was
/// persisted: author profile, fixed-format timestamp, and content fields.
/// The serde contract is the wire contract; it is checked at compile time
/// rather than assembled from dynamic values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageEvent {
    /// Name of the channel the message was posted to
    pub channel: String,
    /// The message itself
    pub message: ChannelMessage,
}

impl MessageEvent {
    /// Build an envelope for a message posted to `channel`
    pub fn new(channel: impl Into<String>, message: ChannelMessage) -> Self {
        Self {
            channel: channel.into(),
            message,
        }
    }
}
