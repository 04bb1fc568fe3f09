/**
 * Connection Hub
 *
 * The hub is the single source of truth for "who is connected and to
 * which channel", and the only component that mutates that state.
 *
 * # Actor Model
 *
 * The registry lives inside the `Hub` task and is never shared: every
 * mutation and every read arrives as a command on the hub's intake queue
 * and is processed sequentially. No lock crosses a task boundary, so a
 * broadcast can never observe a half-registered or half-removed client,
 * and concurrent connect/disconnect/broadcast are linearized by the
 * intake order.
 *
 * Handlers and connection tasks hold a cloneable `HubHandle`; commands
 * that need a result carry a oneshot reply.
 *
 * # Registry Keying
 *
 * Entries are keyed by per-connection id, not by user identity. Multiple
 * simultaneous connections per user are permitted by design; removal
 * always targets exactly the connection that died.
 */

use std::collections::HashMap;

use axum::extract::ws::Message;
use serde::Serialize;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::ApiError;
use crate::realtime::client::Client;

/// Capacity of the hub's command intake queue
const HUB_INTAKE_CAPACITY: usize = 64;

/// Commands accepted by the hub task
enum HubCommand {
    /// Add a client to the registry
    Register {
        client: Client,
        ack: oneshot::Sender<()>,
    },
    /// Remove a client from the registry; replies whether an entry was
    /// actually removed (false on repeat calls)
    Unregister {
        connection_id: Uuid,
        ack: oneshot::Sender<bool>,
    },
    /// Deliver a pre-serialized frame to every subscriber of the target
    /// channels; replies with the number of clients the frame was queued
    /// for
    Broadcast {
        frame: String,
        channels: Vec<String>,
        ack: oneshot::Sender<usize>,
    },
    /// Registry size, for the health endpoint and tests
    ClientCount {
        reply: oneshot::Sender<usize>,
    },
}

/// The hub task: exclusive owner of the connection registry
pub struct Hub {
    registry: HashMap<Uuid, Client>,
    intake: mpsc::Receiver<HubCommand>,
}

impl Hub {
    /// Create a hub and the handle used to talk to it
    ///
    /// The hub does nothing until `run` is spawned.
    pub fn new() -> (Self, HubHandle) {
        let (tx, rx) = mpsc::channel(HUB_INTAKE_CAPACITY);
        (
            Hub {
                registry: HashMap::new(),
                intake: rx,
            },
            HubHandle { intake: tx },
        )
    }

    /// Run the hub until every handle is dropped
    ///
    /// Processes commands strictly in arrival order; this loop is the
    /// serialization discipline that keeps the registry race-free.
    pub async fn run(mut self) {
        info!("Hub started");
        while let Some(command) = self.intake.recv().await {
            self.handle(command);
        }
        info!("Hub stopped ({} clients at shutdown)", self.registry.len());
    }

    fn handle(&mut self, command: HubCommand) {
        match command {
            HubCommand::Register { client, ack } => {
                self.on_register(client);
                let _ = ack.send(());
            }
            HubCommand::Unregister { connection_id, ack } => {
                let removed = self.on_unregister(connection_id);
                let _ = ack.send(removed);
            }
            HubCommand::Broadcast { frame, channels, ack } => {
                let delivered = self.on_broadcast(frame, &channels);
                let _ = ack.send(delivered);
            }
            HubCommand::ClientCount { reply } => {
                let _ = reply.send(self.registry.len());
            }
        }
    }

    fn on_register(&mut self, client: Client) {
        debug!(
            "Registering connection {} (user {}, channel {})",
            client.connection_id, client.user_id, client.channel
        );
        if let Some(previous) = self.registry.insert(client.connection_id, client) {
            // Connection ids are freshly generated; a collision means a bug
            warn!(
                "Replaced registry entry for connection {}",
                previous.connection_id
            );
        }
    }

    fn on_unregister(&mut self, connection_id: Uuid) -> bool {
        match self.registry.remove(&connection_id) {
            Some(client) => {
                // Dropping the entry drops the outbound sender; the write
                // loop observes the closed queue and closes the socket.
                debug!(
                    "Unregistered connection {} (channel {})",
                    connection_id, client.channel
                );
                true
            }
            None => {
                debug!("Unregister for unknown connection {} ignored", connection_id);
                false
            }
        }
    }

    fn on_broadcast(&mut self, frame: String, channels: &[String]) -> usize {
        let mut delivered = 0;
        for client in self.registry.values() {
            if channels.iter().any(|c| c == &client.channel) {
                if client.deliver(Message::Text(frame.clone().into())) {
                    delivered += 1;
                }
            }
        }
        debug!(
            "Broadcast to {:?} queued for {} client(s)",
            channels, delivered
        );
        delivered
    }
}

/// Cloneable handle to a running hub
///
/// Everything outside the hub task - the handshake gate, connection
/// tasks, the message-create flow, the health endpoint - talks to the
/// registry through this handle.
#[derive(Clone)]
pub struct HubHandle {
    intake: mpsc::Sender<HubCommand>,
}

impl HubHandle {
    /// Register a client, returning once the registry holds the entry
    ///
    /// The acknowledgment guarantees the client's loops only start after
    /// registration is visible.
    pub async fn register(&self, client: Client) -> Result<(), ApiError> {
        let (ack, done) = oneshot::channel();
        self.intake
            .send(HubCommand::Register { client, ack })
            .await
            .map_err(|_| ApiError::hub("registry intake closed"))?;
        done.await.map_err(|_| ApiError::hub("hub dropped registration"))
    }

    /// Remove a connection from the registry
    ///
    /// Idempotent: returns `true` only the first time an entry is
    /// actually removed. Safe to call from both connection loops; a hub
    /// that has already shut down counts as already-removed.
    pub async fn unregister(&self, connection_id: Uuid) -> bool {
        let (ack, done) = oneshot::channel();
        if self
            .intake
            .send(HubCommand::Unregister { connection_id, ack })
            .await
            .is_err()
        {
            return false;
        }
        done.await.unwrap_or(false)
    }

    /// Broadcast an event to every subscriber of the target channels
    ///
    /// The payload is serialized exactly once, here. A serialization
    /// failure is a hard error for the caller - distinguishable from a
    /// successful broadcast that found no subscribers, which returns
    /// `Ok(0)`.
    pub async fn broadcast<T: Serialize>(
        &self,
        event: &T,
        channels: &[String],
    ) -> Result<usize, ApiError> {
        let frame = serde_json::to_string(event)?;

        let (ack, done) = oneshot::channel();
        self.intake
            .send(HubCommand::Broadcast {
                frame,
                channels: channels.to_vec(),
                ack,
            })
            .await
            .map_err(|_| ApiError::hub("registry intake closed"))?;
        done.await.map_err(|_| ApiError::hub("hub dropped broadcast"))
    }

    /// Number of currently registered connections
    pub async fn client_count(&self) -> usize {
        let (reply, count) = oneshot::channel();
        if self
            .intake
            .send(HubCommand::ClientCount { reply })
            .await
            .is_err()
        {
            return 0;
        }
        count.await.unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use crate::auth::users::Profile;
    use crate::channels::types::ChannelMessage;
    use crate::realtime::envelope::MessageEvent;

    fn spawn_hub() -> HubHandle {
        let (hub, handle) = Hub::new();
        tokio::spawn(hub.run());
        handle
    }

    fn test_client(channel: &str) -> (Client, mpsc::Receiver<Message>) {
        let (tx, rx) = mpsc::channel(8);
        (Client::new(Uuid::new_v4(), channel.to_string(), tx), rx)
    }

    fn test_event(channel: &str, body: &str) -> MessageEvent {
        MessageEvent::new(
            channel,
            ChannelMessage {
                author: Profile {
                    id: Uuid::new_v4(),
                    name: "alice".to_string(),
                    email: "alice@example.com".to_string(),
                    image: None,
                    image_ref: None,
                },
                sent_at: "2024-06-01 07:00:00".to_string(),
                body: body.to_string(),
                image: None,
                image_ref: None,
            },
        )
    }

    #[tokio::test]
    async fn test_broadcast_reaches_only_target_channel() {
        let hub = spawn_hub();

        let (general, mut general_rx) = test_client("general");
        let (random, mut random_rx) = test_client("random");
        hub.register(general).await.unwrap();
        hub.register(random).await.unwrap();

        let event = test_event("general", "hi");
        let delivered = hub
            .broadcast(&event, &["general".to_string()])
            .await
            .unwrap();
        assert_eq!(delivered, 1);

        // The general subscriber got exactly one serialized copy
        let frame = general_rx.recv().await.unwrap();
        match frame {
            Message::Text(text) => {
                let decoded: MessageEvent = serde_json::from_str(text.as_str()).unwrap();
                assert_eq!(decoded, event);
            }
            other => panic!("unexpected frame: {:?}", other),
        }
        assert!(general_rx.try_recv().is_err());

        // The random subscriber got nothing
        assert!(random_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_unregister_is_idempotent() {
        let hub = spawn_hub();

        let (client, mut rx) = test_client("general");
        let connection_id = client.connection_id;
        hub.register(client).await.unwrap();
        assert_eq!(hub.client_count().await, 1);

        assert!(hub.unregister(connection_id).await);
        assert_eq!(hub.client_count().await, 0);

        // Removal dropped the outbound sender: the queue reports closed,
        // which is what closes the connection - exactly once.
        assert!(rx.recv().await.is_none());

        // Second unregister is a no-op, not an error
        assert!(!hub.unregister(connection_id).await);
        assert_eq!(hub.client_count().await, 0);
    }

    #[tokio::test]
    async fn test_duplicate_broadcast_is_delivered_twice() {
        let hub = spawn_hub();

        let (client, mut rx) = test_client("general");
        hub.register(client).await.unwrap();

        let event = test_event("general", "hi");
        let targets = ["general".to_string()];
        assert_eq!(hub.broadcast(&event, &targets).await.unwrap(), 1);
        assert_eq!(hub.broadcast(&event, &targets).await.unwrap(), 1);

        // No implicit deduplication: two separate deliveries
        assert_matches!(rx.recv().await, Some(Message::Text(_)));
        assert_matches!(rx.recv().await, Some(Message::Text(_)));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_concurrent_broadcast_and_unregister() {
        let hub = spawn_hub();

        let (client, _rx) = test_client("general");
        let connection_id = client.connection_id;
        hub.register(client).await.unwrap();

        let event = test_event("general", "hi");
        let broadcast_hub = hub.clone();
        let unregister_hub = hub.clone();

        // Both commands race into the intake; the hub linearizes them.
        // Either order is fine - what must hold is no panic and at most
        // one delivery.
        let (delivered, removed) = tokio::join!(
            async move {
                broadcast_hub
                    .broadcast(&event, &["general".to_string()])
                    .await
                    .unwrap()
            },
            async move { unregister_hub.unregister(connection_id).await },
        );

        assert!(removed);
        assert!(delivered <= 1);
        assert_eq!(hub.client_count().await, 0);
    }

    #[tokio::test]
    async fn test_broadcast_with_no_subscribers_is_ok_zero() {
        let hub = spawn_hub();
        let event = test_event("general", "hi");
        let delivered = hub
            .broadcast(&event, &["general".to_string()])
            .await
            .unwrap();
        assert_eq!(delivered, 0);
    }

    #[tokio::test]
    async fn test_multiple_connections_per_user_are_permitted() {
        let hub = spawn_hub();
        let user = Uuid::new_v4();

        let (tx_a, mut rx_a) = mpsc::channel(8);
        let (tx_b, mut rx_b) = mpsc::channel(8);
        let a = Client::new(user, "general".to_string(), tx_a);
        let b = Client::new(user, "general".to_string(), tx_b);
        let a_id = a.connection_id;

        hub.register(a).await.unwrap();
        hub.register(b).await.unwrap();
        assert_eq!(hub.client_count().await, 2);

        let event = test_event("general", "hi");
        assert_eq!(
            hub.broadcast(&event, &["general".to_string()]).await.unwrap(),
            2
        );
        assert!(rx_a.recv().await.is_some());
        assert!(rx_b.recv().await.is_some());

        // Removing one session leaves the other registered
        assert!(hub.unregister(a_id).await);
        assert_eq!(hub.client_count().await, 1);
    }

    #[tokio::test]
    async fn test_slow_subscriber_does_not_block_peers() {
        let hub = spawn_hub();

        // A stalled client with a single-slot queue, already full
        let (slow_tx, _slow_rx) = mpsc::channel(1);
        let slow = Client::new(Uuid::new_v4(), "general".to_string(), slow_tx);
        slow.deliver(Message::Text("backlog".into()));
        hub.register(slow).await.unwrap();

        let (healthy, mut healthy_rx) = test_client("general");
        hub.register(healthy).await.unwrap();

        let event = test_event("general", "hi");
        let delivered = hub
            .broadcast(&event, &["general".to_string()])
            .await
            .unwrap();

        // The frame for the stalled client is dropped; the healthy one
        // still gets its copy
        assert_eq!(delivered, 1);
        assert_matches!(healthy_rx.recv().await, Some(Message::Text(_)));
    }
}
