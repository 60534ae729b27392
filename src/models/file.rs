use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A file inside a room
#[derive(Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileResponse {
    pub id: i32,
    pub filename: String,
    pub content: String,
    pub room_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to create a file
#[derive(Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateFileRequest {
    pub filename: String,
    pub room_id: String,
}

/// Request to replace a file's content
#[derive(Serialize, Deserialize, ToSchema)]
pub struct UpdateFileRequest {
    pub content: String,
}

/// Response for save/delete style operations
#[derive(Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    pub status: String,
}
