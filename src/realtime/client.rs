/**
 * Connected Client
 *
 * This module defines the hub's in-memory representation of one live
 * WebSocket connection, and the connection task that runs its two loops.
 *
 * # Lifecycle
 *
 * A `Client` is constructed only after the handshake gate has authorized
 * the connection. It enters the hub's registry before either loop starts,
 * and leaves it the moment a read or write fails. Unregistration drops the
 * outbound sender held by the registry, which ends the write loop and
 * closes the socket - exactly once, regardless of which side failed first.
 *
 * # Loops
 *
 * - The **read loop** runs in the upgrade task. It ignores frame content
 *   and exists purely as the disconnect detector: any read error or close
 *   frame triggers unregistration.
 * - The **write loop** runs in a spawned task, draining the bounded
 *   outbound queue onto the socket. A write failure also triggers
 *   unregistration; the original implementation omitted this and leaked
 *   clients whose connections failed one-directionally.
 */

use axum::extract::ws::{Message, WebSocket};
use chrono::{DateTime, Utc};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::realtime::hub::HubHandle;

/// Capacity of the per-client outbound queue.
///
/// Overflow policy is drop-newest: when a slow client's queue is full,
/// new frames for it are dropped (with a warning) instead of blocking the
/// hub task or growing memory without bound.
pub const OUTBOUND_QUEUE_CAPACITY: usize = 256;

/// One live connection, as the hub sees it
///
/// The subscribed channel is immutable after creation; changing channels
/// means reconnecting.
#[derive(Debug)]
pub struct Client {
    /// Per-connection identifier; the registry key.
    /// Distinct connections from the same user get distinct ids.
    pub connection_id: Uuid,
    /// The authenticated user who owns this connection
    pub user_id: Uuid,
    /// The single channel this connection is subscribed to
    pub channel: String,
    /// Sender half of the bounded outbound queue
    outbound: mpsc::Sender<Message>,
    /// Time the connection was registered
    pub connected_at: DateTime<Utc>,
}

impl Client {
    /// Create a client for an authorized connection
    pub fn new(user_id: Uuid, channel: String, outbound: mpsc::Sender<Message>) -> Self {
        Self {
            connection_id: Uuid::new_v4(),
            user_id,
            channel,
            outbound,
            connected_at: Utc::now(),
        }
    }

    /// Enqueue a frame without blocking
    ///
    /// Returns `true` if the frame was queued. A full queue drops the
    /// frame (slow client); a closed queue means the connection is
    /// already tearing down.
    pub fn deliver(&self, frame: Message) -> bool {
        match self.outbound.try_send(frame) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!(
                    "Outbound queue full for connection {} (channel {}), dropping frame",
                    self.connection_id, self.channel
                );
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                debug!(
                    "Outbound queue closed for connection {}, frame skipped",
                    self.connection_id
                );
                false
            }
        }
    }
}

/// Run one authorized connection to completion
///
/// Registers the client with the hub (awaiting the acknowledgment, so the
/// registry holds the entry before any loop runs), spawns the write loop,
/// then runs the read loop until the connection dies.
pub async fn run_connection(
    socket: WebSocket,
    hub: HubHandle,
    user_id: Uuid,
    channel: String,
) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let (outbound_tx, mut outbound_rx) = mpsc::channel::<Message>(OUTBOUND_QUEUE_CAPACITY);

    let client = Client::new(user_id, channel.clone(), outbound_tx);
    let connection_id = client.connection_id;

    if let Err(e) = hub.register(client).await {
        warn!("Failed to register connection {}: {}", connection_id, e);
        return;
    }

    info!(
        "Connection {} registered (user {}, channel {})",
        connection_id, user_id, channel
    );

    // Write loop: drains the outbound queue onto the socket. Ends when the
    // registry drops the sender (unregistration) or a write fails. The
    // socket is closed here and nowhere else.
    let write_hub = hub.clone();
    let write_task = tokio::spawn(async move {
        while let Some(frame) = outbound_rx.recv().await {
            if let Err(e) = ws_tx.send(frame).await {
                debug!("Write failed on connection {}: {}", connection_id, e);
                write_hub.unregister(connection_id).await;
                break;
            }
        }
        let _ = ws_tx.close().await;
    });

    // Read loop: the sole disconnect detector. Frame content is ignored;
    // inbound traffic on this path carries no protocol.
    while let Some(frame) = ws_rx.next().await {
        match frame {
            Ok(Message::Close(_)) => {
                debug!("Connection {} sent close frame", connection_id);
                break;
            }
            Ok(_) => {}
            Err(e) => {
                debug!("Read failed on connection {}: {}", connection_id, e);
                break;
            }
        }
    }

    hub.unregister(connection_id).await;
    let _ = write_task.await;

    info!("Connection {} closed", connection_id);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_deliver_queues_frame() {
        let (tx, mut rx) = mpsc::channel::<Message>(4);
        let client = Client::new(Uuid::new_v4(), "general".to_string(), tx);

        assert!(client.deliver(Message::Text("hi".into())));
        match rx.recv().await {
            Some(Message::Text(text)) => assert_eq!(text.as_str(), "hi"),
            other => panic!("unexpected frame: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_deliver_drops_newest_when_full() {
        let (tx, mut rx) = mpsc::channel::<Message>(1);
        let client = Client::new(Uuid::new_v4(), "general".to_string(), tx);

        assert!(client.deliver(Message::Text("first".into())));
        // Queue full: the newest frame is dropped, the queued one survives
        assert!(!client.deliver(Message::Text("second".into())));

        match rx.recv().await {
            Some(Message::Text(text)) => assert_eq!(text.as_str(), "first"),
            other => panic!("unexpected frame: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_deliver_reports_closed_queue() {
        let (tx, rx) = mpsc::channel::<Message>(1);
        let client = Client::new(Uuid::new_v4(), "general".to_string(), tx);
        drop(rx);

        assert!(!client.deliver(Message::Text("hi".into())));
    }

    #[test]
    fn test_connections_get_distinct_ids() {
        let (tx, _rx) = mpsc::channel::<Message>(1);
        let user = Uuid::new_v4();
        let a = Client::new(user, "general".to_string(), tx.clone());
        let b = Client::new(user, "general".to_string(), tx);
        assert_ne!(a.connection_id, b.connection_id);
    }
}
