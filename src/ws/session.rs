use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, Query, State,
    },
    http::StatusCode,
    response::Response,
    Json,
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::models::{err, ClientMessage, ErrorResponse};
use crate::state::AppState;
use crate::ws::registry::Participant;

#[derive(Deserialize)]
pub struct WsQuery {
    pub username: Option<String>,
}

/// WebSocket entry point for a room.
///
/// Handshake failures (malformed or unknown room id) are rejected here,
/// before the upgrade completes, so no registry state ever exists for them.
pub async fn ws_handler(
    Path(room_id): Path<String>,
    Query(query): Query<WsQuery>,
    State(state): State<Arc<AppState>>,
    ws: WebSocketUpgrade,
) -> Result<Response, (StatusCode, Json<ErrorResponse>)> {
    let display_name = query
        .username
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or("Anonymous")
        .to_string();

    let room = Uuid::parse_str(room_id.trim()).map_err(|_| {
        err(
            StatusCode::BAD_REQUEST,
            format!("Invalid room id '{}'", room_id.trim()),
        )
    })?;

    let exists = state.room_exists(room).await.map_err(|e| {
        error!("Failed to check room '{}': {}", room, e);
        err(StatusCode::INTERNAL_SERVER_ERROR, "Database error")
    })?;
    if !exists {
        return Err(err(
            StatusCode::NOT_FOUND,
            format!("Room '{}' not found", room),
        ));
    }

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, room, display_name, state)))
}

/// Drive one connection from join to teardown.
async fn handle_socket(socket: WebSocket, room: Uuid, display_name: String, state: Arc<AppState>) {
    let conn_id = Uuid::new_v4();
    let room_key = room.to_string();
    info!(
        "WebSocket connected: room={} user={} conn={}",
        room_key, display_name, conn_id
    );

    // The session row only feeds history; the live registry stays
    // authoritative even if this write fails.
    if let Err(e) = state.store.record_session_start(&display_name, room).await {
        warn!(
            "Failed to record session start for {} in room {}: {}",
            display_name, room_key, e
        );
    }

    let (sender, mut outbound_rx) = mpsc::unbounded_channel::<Message>();
    state
        .registry
        .join(
            &room_key,
            Participant {
                conn_id,
                display_name: display_name.clone(),
                sender,
            },
        )
        .await;
    // Everyone, the new connection included, sees the post-join roster.
    state.hub.broadcast_presence(&room_key).await;

    let (mut sink, mut stream) = socket.split();

    // Writer task: drains this connection's queue into the socket and probes
    // liveness on the heartbeat interval. A half-open connection fails a
    // ping here instead of lingering until the next relay attempt.
    let heartbeat = Duration::from_secs(state.config.ws_heartbeat_secs);
    let mut send_task = tokio::spawn(async move {
        let mut ping = tokio::time::interval(heartbeat);
        ping.tick().await; // the first tick completes immediately
        loop {
            tokio::select! {
                frame = outbound_rx.recv() => {
                    match frame {
                        Some(frame) => {
                            if sink.send(frame).await.is_err() {
                                break;
                            }
                        }
                        None => break,
                    }
                }
                _ = ping.tick() => {
                    if sink.send(Message::Ping(Vec::new())).await.is_err() {
                        break;
                    }
                }
            }
        }
    });

    // Reader loop: stamp each inbound event with the authoritative sender
    // and timestamp, then relay to the rest of the room.
    let mut recv_task = tokio::spawn({
        let state = state.clone();
        let room_key = room_key.clone();
        let display_name = display_name.clone();
        async move {
            while let Some(Ok(frame)) = stream.next().await {
                let text = match frame {
                    Message::Text(text) => text,
                    Message::Close(_) => break,
                    _ => continue,
                };
                let event: ClientMessage = match serde_json::from_str(&text) {
                    Ok(event) => event,
                    Err(e) => {
                        warn!("Ignoring malformed frame in room {}: {}", room_key, e);
                        continue;
                    }
                };
                state
                    .hub
                    .dispatch(&room_key, &event.into_relay(&display_name), Some(conn_id))
                    .await;
            }
        }
    });

    // Whichever side ends first takes the other down with it.
    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    // Teardown runs on every exit path. Deregister first so the roster is
    // already updated when the presence frame goes out; the offline record
    // is best-effort and never blocks that frame.
    if let Some(name) = state.registry.leave(&room_key, conn_id).await {
        if let Err(e) = state.store.record_session_end(&name, room).await {
            warn!("Failed to mark {} offline in room {}: {}", name, room_key, e);
        }
        state.hub.broadcast_presence(&room_key).await;
    }
    info!("WebSocket disconnected: room={} conn={}", room_key, conn_id);
}
