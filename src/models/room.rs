use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Response for creating a room
#[derive(Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomResponse {
    pub room_id: String,
}

/// Response for fetching room info
#[derive(Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoomInfoResponse {
    pub room_id: String,
    pub created_at: DateTime<Utc>,
    pub active_users: usize,
    pub file_count: i64,
}

/// Response for the live participant list of a room
#[derive(Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActiveUsersResponse {
    pub room_id: String,
    pub active_users: Vec<String>,
    pub count: usize,
}
