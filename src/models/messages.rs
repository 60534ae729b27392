use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Event body as sent by a client. Any `senderId`/`timestamp` the client
/// included is dropped at parse time; the server is the only authority for
/// those fields.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EventPayload {
    #[serde(default)]
    pub file_id: Option<i32>,
    pub data: Value,
}

/// Inbound real-time event. Clients cannot produce `users` frames: the tag
/// only admits the three relay kinds, anything else fails to parse.
#[derive(Deserialize, Debug)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClientMessage {
    Code(EventPayload),
    Cursor(EventPayload),
    Chat(EventPayload),
}

/// Relay body after stamping: the inbound payload plus authoritative sender
/// identity and UTC timestamp.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RelayPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_id: Option<i32>,
    pub data: Value,
    pub sender_id: String,
    pub timestamp: String,
}

/// Presence body: display names in join order.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PresenceMessage {
    pub users: Vec<String>,
}

/// Outbound frame, server to clients.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServerMessage {
    Code(RelayPayload),
    Cursor(RelayPayload),
    Chat(RelayPayload),
    Users(PresenceMessage),
}

impl ClientMessage {
    /// Stamp authoritative sender identity and time onto an inbound event,
    /// preserving its kind.
    pub fn into_relay(self, sender_id: &str) -> ServerMessage {
        let stamp = |payload: EventPayload| RelayPayload {
            file_id: payload.file_id,
            data: payload.data,
            sender_id: sender_id.to_string(),
            timestamp: Utc::now().to_rfc3339(),
        };
        match self {
            ClientMessage::Code(p) => ServerMessage::Code(stamp(p)),
            ClientMessage::Cursor(p) => ServerMessage::Cursor(stamp(p)),
            ClientMessage::Chat(p) => ServerMessage::Chat(stamp(p)),
        }
    }
}

impl ServerMessage {
    pub fn users(users: Vec<String>) -> Self {
        ServerMessage::Users(PresenceMessage { users })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use serde_json::json;

    #[test]
    fn client_stamps_are_ignored_on_parse() {
        let raw = json!({
            "type": "code",
            "fileId": 7,
            "data": "x = 1",
            "senderId": "Mallory",
            "timestamp": "1999-01-01T00:00:00Z"
        })
        .to_string();

        let parsed: ClientMessage = serde_json::from_str(&raw).unwrap();
        let relayed = parsed.into_relay("Alice");
        match relayed {
            ServerMessage::Code(p) => {
                assert_eq!(p.sender_id, "Alice");
                assert_eq!(p.file_id, Some(7));
                assert_ne!(p.timestamp, "1999-01-01T00:00:00Z");
                assert!(DateTime::parse_from_rfc3339(&p.timestamp).is_ok());
            }
            other => panic!("expected code relay, got {:?}", other),
        }
    }

    #[test]
    fn clients_cannot_send_presence_frames() {
        let raw = json!({"type": "users", "users": ["Eve"]}).to_string();
        assert!(serde_json::from_str::<ClientMessage>(&raw).is_err());
    }

    #[test]
    fn relay_wire_shape_is_camel_case_with_optional_file_id() {
        let msg = ClientMessage::Chat(EventPayload {
            file_id: None,
            data: json!("hello"),
        })
        .into_relay("Bob");

        let wire: Value = serde_json::to_value(&msg).unwrap();
        assert_eq!(wire["type"], "chat");
        assert_eq!(wire["senderId"], "Bob");
        assert_eq!(wire["data"], "hello");
        assert!(wire.get("fileId").is_none());
        assert!(wire.get("timestamp").is_some());
    }

    #[test]
    fn presence_wire_shape() {
        let msg = ServerMessage::users(vec!["Alice".into(), "Bob".into()]);
        let wire: Value = serde_json::to_value(&msg).unwrap();
        assert_eq!(wire, json!({"type": "users", "users": ["Alice", "Bob"]}));
    }
}
