use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::{error, info};
use uuid::Uuid;

use crate::db::store::FileRow;
use crate::models::{err, CreateFileRequest, ErrorResponse, FileResponse, StatusResponse, UpdateFileRequest};
use crate::state::AppState;

fn to_response(row: FileRow) -> FileResponse {
    FileResponse {
        id: row.id,
        filename: row.filename,
        content: row.content,
        room_id: row.room_id,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

/// List the files of a room
pub async fn list_files(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<(StatusCode, Json<Vec<FileResponse>>), (StatusCode, Json<ErrorResponse>)> {
    let room_uuid = Uuid::parse_str(room_id.trim()).map_err(|_| {
        err(
            StatusCode::BAD_REQUEST,
            format!("Invalid room id '{}'", room_id.trim()),
        )
    })?;

    let files = state.store.list_files(room_uuid).await.map_err(|e| {
        error!("Failed to list files for room '{}': {}", room_uuid, e);
        err(StatusCode::INTERNAL_SERVER_ERROR, "Database error")
    })?;

    Ok((
        StatusCode::OK,
        Json(files.into_iter().map(to_response).collect()),
    ))
}

/// Create an empty file in a room
pub async fn create_file(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateFileRequest>,
) -> Result<(StatusCode, Json<FileResponse>), (StatusCode, Json<ErrorResponse>)> {
    let room_uuid = Uuid::parse_str(payload.room_id.trim()).map_err(|_| {
        err(
            StatusCode::BAD_REQUEST,
            format!("Invalid room id '{}'", payload.room_id.trim()),
        )
    })?;

    let exists = state.store.room_exists(room_uuid).await.map_err(|e| {
        error!("Failed to check room '{}': {}", room_uuid, e);
        err(StatusCode::INTERNAL_SERVER_ERROR, "Database error")
    })?;
    if !exists {
        return Err(err(
            StatusCode::NOT_FOUND,
            format!("Room '{}' not found", room_uuid),
        ));
    }

    let file = state
        .store
        .create_file(room_uuid, &payload.filename)
        .await
        .map_err(|e| {
            error!("Failed to create file in room '{}': {}", room_uuid, e);
            err(StatusCode::INTERNAL_SERVER_ERROR, "Database error")
        })?;

    info!("Created file {} in room {}", file.id, room_uuid);
    Ok((StatusCode::OK, Json(to_response(file))))
}

/// Replace a file's content
pub async fn update_file(
    State(state): State<Arc<AppState>>,
    Path(file_id): Path<i32>,
    Json(payload): Json<UpdateFileRequest>,
) -> Result<(StatusCode, Json<StatusResponse>), (StatusCode, Json<ErrorResponse>)> {
    let updated = state
        .store
        .update_file(file_id, &payload.content)
        .await
        .map_err(|e| {
            error!("Failed to update file {}: {}", file_id, e);
            err(StatusCode::INTERNAL_SERVER_ERROR, "Database error")
        })?;

    if !updated {
        return Err(err(
            StatusCode::NOT_FOUND,
            format!("File {} not found", file_id),
        ));
    }

    Ok((
        StatusCode::OK,
        Json(StatusResponse {
            status: "saved".to_string(),
        }),
    ))
}

/// Delete a file
pub async fn delete_file(
    State(state): State<Arc<AppState>>,
    Path(file_id): Path<i32>,
) -> Result<(StatusCode, Json<StatusResponse>), (StatusCode, Json<ErrorResponse>)> {
    let deleted = state.store.delete_file(file_id).await.map_err(|e| {
        error!("Failed to delete file {}: {}", file_id, e);
        err(StatusCode::INTERNAL_SERVER_ERROR, "Database error")
    })?;

    if !deleted {
        return Err(err(
            StatusCode::NOT_FOUND,
            format!("File {} not found", file_id),
        ));
    }

    Ok((
        StatusCode::OK,
        Json(StatusResponse {
            status: "deleted".to_string(),
        }),
    ))
}
