use std::sync::Arc;

use axum::extract::ws::Message;
use tracing::{debug, error};

use crate::models::ServerMessage;
use crate::ws::registry::{ConnId, RoomRegistry};

/// Fans one message out to a room's connections.
///
/// Delivery drops the payload into each peer's own channel; the peer's
/// writer task owns the actual transport send. One peer's failure or
/// backpressure therefore never reaches the others, and messages queued for
/// a single peer arrive in dispatch order.
#[derive(Clone)]
pub struct BroadcastHub {
    registry: Arc<RoomRegistry>,
}

impl BroadcastHub {
    pub fn new(registry: Arc<RoomRegistry>) -> Self {
        Self { registry }
    }

    /// Deliver `message` to every connection currently in the room except
    /// `exclude`. The membership snapshot is taken once, under the lock;
    /// the sends happen after it is released.
    pub async fn dispatch(&self, room_id: &str, message: &ServerMessage, exclude: Option<ConnId>) {
        let payload = match serde_json::to_string(message) {
            Ok(payload) => payload,
            Err(e) => {
                error!("Failed to serialize message for room {}: {}", room_id, e);
                return;
            }
        };

        let peers = self.registry.peers(room_id, exclude).await;
        for peer in peers {
            // A send only fails when the receiving session is already
            // tearing down; skip it and keep fanning out.
            if peer.send(Message::Text(payload.clone())).is_err() {
                debug!("Dropped frame for a closing connection in room {}", room_id);
            }
        }
    }

    /// Recompute the participant list and announce it room-wide, the
    /// triggering connection included. Presence is always derived from the
    /// registry at this moment, never cached, so the list reflects
    /// membership after the join or leave that triggered it.
    pub async fn broadcast_presence(&self, room_id: &str) {
        let users = self.registry.participants(room_id).await;
        self.dispatch(room_id, &ServerMessage::users(users), None)
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClientMessage, EventPayload};
    use crate::ws::registry::Participant;
    use serde_json::json;
    use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};
    use uuid::Uuid;

    async fn join(
        registry: &RoomRegistry,
        room: &str,
        name: &str,
    ) -> (ConnId, UnboundedReceiver<Message>) {
        let conn_id = Uuid::new_v4();
        let (sender, rx) = unbounded_channel();
        registry
            .join(
                room,
                Participant {
                    conn_id,
                    display_name: name.to_string(),
                    sender,
                },
            )
            .await;
        (conn_id, rx)
    }

    fn next_frame(rx: &mut UnboundedReceiver<Message>) -> ServerMessage {
        match rx.try_recv().expect("expected a frame") {
            Message::Text(text) => serde_json::from_str(&text).expect("frame should parse"),
            other => panic!("expected text frame, got {:?}", other),
        }
    }

    fn assert_users(rx: &mut UnboundedReceiver<Message>, expected: &[&str]) {
        match next_frame(rx) {
            ServerMessage::Users(p) => assert_eq!(p.users, expected),
            other => panic!("expected users frame, got {:?}", other),
        }
    }

    fn chat(text: &str) -> ClientMessage {
        ClientMessage::Chat(EventPayload {
            file_id: None,
            data: json!(text),
        })
    }

    #[tokio::test]
    async fn dispatch_excludes_the_sender() {
        let registry = Arc::new(RoomRegistry::new());
        let hub = BroadcastHub::new(registry.clone());
        let (alice_id, mut alice_rx) = join(&registry, "r", "Alice").await;
        let (_, mut bob_rx) = join(&registry, "r", "Bob").await;

        hub.dispatch("r", &chat("hi").into_relay("Alice"), Some(alice_id))
            .await;

        assert!(alice_rx.try_recv().is_err());
        match next_frame(&mut bob_rx) {
            ServerMessage::Chat(p) => assert_eq!(p.sender_id, "Alice"),
            other => panic!("expected chat relay, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn room_of_one_with_exclusion_delivers_nothing() {
        let registry = Arc::new(RoomRegistry::new());
        let hub = BroadcastHub::new(registry.clone());
        let (alice_id, mut alice_rx) = join(&registry, "r", "Alice").await;

        hub.dispatch("r", &chat("echo?").into_relay("Alice"), Some(alice_id))
            .await;
        assert!(alice_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn dead_peer_does_not_block_the_rest() {
        let registry = Arc::new(RoomRegistry::new());
        let hub = BroadcastHub::new(registry.clone());
        let (_, dead_rx) = join(&registry, "r", "P").await;
        let (_, mut live_rx) = join(&registry, "r", "Q").await;

        // P's session is gone but it has not deregistered yet.
        drop(dead_rx);
        hub.dispatch("r", &chat("still here").into_relay("X"), None)
            .await;

        match next_frame(&mut live_rx) {
            ServerMessage::Chat(p) => assert_eq!(p.data, json!("still here")),
            other => panic!("expected chat relay, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn presence_reflects_membership_after_join_and_leave() {
        let registry = Arc::new(RoomRegistry::new());
        let hub = BroadcastHub::new(registry.clone());

        let (_, mut alice_rx) = join(&registry, "r", "Alice").await;
        hub.broadcast_presence("r").await;
        assert_users(&mut alice_rx, &["Alice"]);

        let (bob_id, mut bob_rx) = join(&registry, "r", "Bob").await;
        hub.broadcast_presence("r").await;
        assert_users(&mut alice_rx, &["Alice", "Bob"]);
        assert_users(&mut bob_rx, &["Alice", "Bob"]);

        registry.leave("r", bob_id).await;
        hub.broadcast_presence("r").await;
        assert_users(&mut alice_rx, &["Alice"]);
    }

    /// The full session scenario: join confirmations, a stamped relay that
    /// skips its sender, and the roster update after a disconnect.
    #[tokio::test]
    async fn two_participant_session_flow() {
        let registry = Arc::new(RoomRegistry::new());
        let hub = BroadcastHub::new(registry.clone());

        let (alice_id, mut alice_rx) = join(&registry, "room", "Alice").await;
        hub.broadcast_presence("room").await;
        assert_users(&mut alice_rx, &["Alice"]);

        let (bob_id, mut bob_rx) = join(&registry, "room", "Bob").await;
        hub.broadcast_presence("room").await;
        assert_users(&mut alice_rx, &["Alice", "Bob"]);
        assert_users(&mut bob_rx, &["Alice", "Bob"]);

        let inbound: ClientMessage =
            serde_json::from_str(r#"{"type":"code","data":"x=1"}"#).unwrap();
        hub.dispatch("room", &inbound.into_relay("Alice"), Some(alice_id))
            .await;

        match next_frame(&mut bob_rx) {
            ServerMessage::Code(p) => {
                assert_eq!(p.data, json!("x=1"));
                assert_eq!(p.sender_id, "Alice");
                assert!(chrono::DateTime::parse_from_rfc3339(&p.timestamp).is_ok());
            }
            other => panic!("expected code relay, got {:?}", other),
        }
        assert!(alice_rx.try_recv().is_err());

        assert_eq!(registry.leave("room", bob_id).await.as_deref(), Some("Bob"));
        hub.broadcast_presence("room").await;
        assert_users(&mut alice_rx, &["Alice"]);
    }
}
