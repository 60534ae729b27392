use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::{error, info};
use uuid::Uuid;

use crate::models::{err, ActiveUsersResponse, CreateRoomResponse, ErrorResponse, RoomInfoResponse};
use crate::state::AppState;

/// Create a room with its seeded default file
pub async fn create_room(
    State(state): State<Arc<AppState>>,
) -> Result<(StatusCode, Json<CreateRoomResponse>), (StatusCode, Json<ErrorResponse>)> {
    match state.store.create_room().await {
        Ok(room_id) => {
            info!("Created room {}", room_id);
            Ok((
                StatusCode::OK,
                Json(CreateRoomResponse {
                    room_id: room_id.to_string(),
                }),
            ))
        }
        Err(e) => {
            error!("Failed to create room: {}", e);
            Err(err(StatusCode::INTERNAL_SERVER_ERROR, "Failed to create room"))
        }
    }
}

/// Fetch room info: creation time, live participant count, file count
pub async fn get_room(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<(StatusCode, Json<RoomInfoResponse>), (StatusCode, Json<ErrorResponse>)> {
    let room_uuid = Uuid::parse_str(room_id.trim()).map_err(|_| {
        err(
            StatusCode::BAD_REQUEST,
            format!("Invalid room id '{}'", room_id.trim()),
        )
    })?;

    let room = state
        .store
        .get_room(room_uuid)
        .await
        .map_err(|e| {
            error!("Failed to load room '{}': {}", room_uuid, e);
            err(StatusCode::INTERNAL_SERVER_ERROR, "Database error")
        })?
        .ok_or_else(|| {
            err(
                StatusCode::NOT_FOUND,
                format!("Room '{}' not found", room_uuid),
            )
        })?;

    let file_count = state.store.count_files(room_uuid).await.map_err(|e| {
        error!("Failed to count files for room '{}': {}", room_uuid, e);
        err(StatusCode::INTERNAL_SERVER_ERROR, "Database error")
    })?;

    let active_users = state.registry.count(&room_uuid.to_string()).await;

    Ok((
        StatusCode::OK,
        Json(RoomInfoResponse {
            room_id: room.id.to_string(),
            created_at: room.created_at,
            active_users,
            file_count,
        }),
    ))
}

/// Live participant list for a room, straight from the registry
pub async fn active_users(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<(StatusCode, Json<ActiveUsersResponse>), (StatusCode, Json<ErrorResponse>)> {
    let room_uuid = Uuid::parse_str(room_id.trim()).map_err(|_| {
        err(
            StatusCode::BAD_REQUEST,
            format!("Invalid room id '{}'", room_id.trim()),
        )
    })?;

    let room_key = room_uuid.to_string();
    let active_users = state.registry.participants(&room_key).await;
    let count = active_users.len();

    Ok((
        StatusCode::OK,
        Json(ActiveUsersResponse {
            room_id: room_key,
            active_users,
            count,
        }),
    ))
}
