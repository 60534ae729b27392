use std::sync::Arc;

use axum::{extract::State, Json};
use tracing::{debug, error};

use crate::models::{HealthResponse, RootResponse};
use crate::state::AppState;

/// Service root: entry points for humans poking at the API
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Welcome to the real-time pair-programming API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        docs: "/swagger".to_string(),
        websocket: "/ws/rooms/{room_id}".to_string(),
    })
}

/// Health check endpoint
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    debug!("Health check requested");
    let (status, database) = match state.store.ping().await {
        Ok(()) => ("healthy", "connected"),
        Err(e) => {
            error!("Health check database probe failed: {}", e);
            ("degraded", "unreachable")
        }
    };
    Json(HealthResponse {
        status: status.to_string(),
        database: database.to_string(),
    })
}
