use std::collections::HashMap;

use axum::extract::ws::Message;
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

/// Identifies one live connection for the duration of its session.
pub type ConnId = Uuid;

/// Per-connection sender for outbound WebSocket frames. Unbounded: a send
/// never suspends, so membership locks are never held across transport waits.
pub type PeerSender = mpsc::UnboundedSender<Message>;

/// One live connection inside a room.
pub struct Participant {
    pub conn_id: ConnId,
    pub display_name: String,
    pub sender: PeerSender,
}

/// Owns the room id -> connections mapping. Connections are kept in join
/// order; the entry for a room is created lazily on first join and removed
/// again when the last participant leaves.
///
/// All operations take the lock only long enough to mutate or copy the
/// membership, never across an await.
pub struct RoomRegistry {
    rooms: RwLock<HashMap<String, Vec<Participant>>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
        }
    }

    /// Append a connection to a room, creating the room entry if absent.
    /// Callers register each connection exactly once.
    pub async fn join(&self, room_id: &str, participant: Participant) {
        let mut rooms = self.rooms.write().await;
        rooms
            .entry(room_id.to_string())
            .or_default()
            .push(participant);
    }

    /// Remove the first entry matching the connection id. Returns the
    /// departing display name, or `None` when the connection was never
    /// joined or has already been removed, so racing teardown paths are
    /// harmless.
    pub async fn leave(&self, room_id: &str, conn_id: ConnId) -> Option<String> {
        let mut rooms = self.rooms.write().await;
        let participants = rooms.get_mut(room_id)?;
        let idx = participants.iter().position(|p| p.conn_id == conn_id)?;
        let departed = participants.remove(idx);
        if participants.is_empty() {
            rooms.remove(room_id);
        }
        Some(departed.display_name)
    }

    /// Display names currently joined to a room, in join order. Empty for an
    /// unknown room.
    pub async fn participants(&self, room_id: &str) -> Vec<String> {
        let rooms = self.rooms.read().await;
        rooms
            .get(room_id)
            .map(|participants| {
                participants
                    .iter()
                    .map(|p| p.display_name.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Number of live connections in a room. 0 for an unknown room.
    pub async fn count(&self, room_id: &str) -> usize {
        let rooms = self.rooms.read().await;
        rooms.get(room_id).map(Vec::len).unwrap_or(0)
    }

    /// Snapshot of the senders to fan a message out to, taken in one lock
    /// acquisition so a concurrent join or leave cannot corrupt the
    /// iteration or double-deliver.
    pub(crate) async fn peers(&self, room_id: &str, exclude: Option<ConnId>) -> Vec<PeerSender> {
        let rooms = self.rooms.read().await;
        rooms
            .get(room_id)
            .map(|participants| {
                participants
                    .iter()
                    .filter(|p| exclude != Some(p.conn_id))
                    .map(|p| p.sender.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Total live connections across all rooms.
    pub async fn connection_count(&self) -> usize {
        let rooms = self.rooms.read().await;
        rooms.values().map(Vec::len).sum()
    }

    /// Number of rooms with at least one live connection.
    pub async fn room_count(&self) -> usize {
        self.rooms.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::unbounded_channel;

    fn participant(name: &str) -> (ConnId, Participant) {
        let conn_id = Uuid::new_v4();
        let (sender, _rx) = unbounded_channel();
        (
            conn_id,
            Participant {
                conn_id,
                display_name: name.to_string(),
                sender,
            },
        )
    }

    #[tokio::test]
    async fn participants_are_listed_in_join_order() {
        let registry = RoomRegistry::new();
        for name in ["Alice", "Bob", "Carol"] {
            let (_, p) = participant(name);
            registry.join("room-1", p).await;
        }

        assert_eq!(registry.participants("room-1").await, ["Alice", "Bob", "Carol"]);
        assert_eq!(registry.count("room-1").await, 3);
    }

    #[tokio::test]
    async fn unknown_room_is_empty() {
        let registry = RoomRegistry::new();
        assert!(registry.participants("nope").await.is_empty());
        assert_eq!(registry.count("nope").await, 0);
    }

    #[tokio::test]
    async fn leave_removes_exactly_one_matching_entry() {
        let registry = RoomRegistry::new();
        let (alice_id, alice) = participant("Alice");
        // Display names are not unique; identity is the connection id.
        let (_, other_alice) = participant("Alice");
        registry.join("room-1", alice).await;
        registry.join("room-1", other_alice).await;

        assert_eq!(registry.leave("room-1", alice_id).await.as_deref(), Some("Alice"));
        assert_eq!(registry.count("room-1").await, 1);

        // Second leave for the same connection is a no-op.
        assert_eq!(registry.leave("room-1", alice_id).await, None);
        assert_eq!(registry.count("room-1").await, 1);
    }

    #[tokio::test]
    async fn leave_for_never_joined_connection_is_not_found() {
        let registry = RoomRegistry::new();
        let (_, bob) = participant("Bob");
        registry.join("room-1", bob).await;

        assert_eq!(registry.leave("room-1", Uuid::new_v4()).await, None);
        assert_eq!(registry.participants("room-1").await, ["Bob"]);
    }

    #[tokio::test]
    async fn empty_room_entry_is_pruned() {
        let registry = RoomRegistry::new();
        let (id, p) = participant("Alice");
        registry.join("room-1", p).await;
        assert_eq!(registry.room_count().await, 1);

        registry.leave("room-1", id).await;
        assert_eq!(registry.room_count().await, 0);
        assert_eq!(registry.connection_count().await, 0);
    }

    #[tokio::test]
    async fn peer_snapshot_honors_exclusion() {
        let registry = RoomRegistry::new();
        let (alice_id, alice) = participant("Alice");
        let (_, bob) = participant("Bob");
        registry.join("room-1", alice).await;
        registry.join("room-1", bob).await;

        assert_eq!(registry.peers("room-1", Some(alice_id)).await.len(), 1);
        assert_eq!(registry.peers("room-1", None).await.len(), 2);
    }
}
