use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::{error, info};
use uuid::Uuid;

use crate::clients::runner::RunnerClient;
use crate::models::{
    err, ErrorResponse, ExecuteResponse, ExecutionRecord, RunCodeRequest, RunCodeResponse,
};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ExecutionsQuery {
    pub limit: Option<i64>,
}

fn runner_of(state: &AppState) -> Result<&RunnerClient, (StatusCode, Json<ErrorResponse>)> {
    state.runner.as_ref().ok_or_else(|| {
        err(
            StatusCode::SERVICE_UNAVAILABLE,
            "No execution runner configured",
        )
    })
}

/// Run a snippet without persisting anything
pub async fn run_code(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RunCodeRequest>,
) -> Result<(StatusCode, Json<RunCodeResponse>), (StatusCode, Json<ErrorResponse>)> {
    let runner = runner_of(&state)?;
    let outcome = runner.execute(&payload.code).await.map_err(|e| {
        error!("Runner request failed: {}", e);
        err(StatusCode::BAD_GATEWAY, "Execution service unavailable")
    })?;

    Ok((
        StatusCode::OK,
        Json(RunCodeResponse {
            output: outcome.output,
            error: outcome.error,
        }),
    ))
}

/// Run a snippet for a room and store the execution record
pub async fn execute_code(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
    Json(payload): Json<RunCodeRequest>,
) -> Result<(StatusCode, Json<ExecuteResponse>), (StatusCode, Json<ErrorResponse>)> {
    let room_uuid = Uuid::parse_str(room_id.trim()).map_err(|_| {
        err(
            StatusCode::BAD_REQUEST,
            format!("Invalid room id '{}'", room_id.trim()),
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

    let runner = runner_of(&state)?;
    let outcome = runner.execute(&payload.code).await.map_err(|e| {
        error!("Runner request failed for room '{}': {}", room_uuid, e);
        err(StatusCode::BAD_GATEWAY, "Execution service unavailable")
    })?;

    let execution_id = state
        .store
        .insert_execution(room_uuid, &payload.code, &outcome.output)
        .await
        .map_err(|e| {
            error!("Failed to store execution for room '{}': {}", room_uuid, e);
            err(StatusCode::INTERNAL_SERVER_ERROR, "Database error")
        })?;

    info!("Stored execution {} for room {}", execution_id, room_uuid);
    Ok((
        StatusCode::OK,
        Json(ExecuteResponse {
            output: outcome.output,
            execution_id,
        }),
    ))
}

/// Most recent executions for a room, newest first
pub async fn list_executions(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
    Query(query): Query<ExecutionsQuery>,
) -> Result<(StatusCode, Json<Vec<ExecutionRecord>>), (StatusCode, Json<ErrorResponse>)> {
    let room_uuid = Uuid::parse_str(room_id.trim()).map_err(|_| {
        err(
            StatusCode::BAD_REQUEST,
            format!("Invalid room id '{}'", room_id.trim()),
        )
    })?;

    let limit = query.limit.unwrap_or(10).clamp(1, 100);
    let executions = state
        .store
        .list_executions(room_uuid, limit)
        .await
        .map_err(|e| {
            error!("Failed to list executions for room '{}': {}", room_uuid, e);
            err(StatusCode::INTERNAL_SERVER_ERROR, "Database error")
        })?;

    let records = executions
        .into_iter()
        .map(|row| ExecutionRecord {
            id: row.id,
            code: row.code,
            output: row.output,
            executed_at: row.executed_at,
        })
        .collect();

    Ok((StatusCode::OK, Json(records)))
}
