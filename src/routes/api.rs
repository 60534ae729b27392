use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::handlers::{
    active_users, autocomplete, create_file, create_room, delete_file, diagnostics, execute_code,
    get_room, health_check, list_executions, list_files, root, run_code, update_file,
};
use crate::state::AppState;
use crate::ws::session::ws_handler;

/// Create API routes
pub fn create_api_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/diagnostics", get(diagnostics))
        .route("/rooms", post(create_room))
        .route("/rooms/:room_id", get(get_room))
        .route("/rooms/:room_id/files", get(list_files))
        .route("/rooms/:room_id/active-users", get(active_users))
        .route("/rooms/:room_id/execute", post(execute_code))
        .route("/rooms/:room_id/executions", get(list_executions))
        .route("/files", post(create_file))
        .route("/files/:file_id", put(update_file).delete(delete_file))
        .route("/run", post(run_code))
        .route("/autocomplete", post(autocomplete))
        .route("/ws/rooms/:room_id", get(ws_handler))
        .with_state(state)
}
